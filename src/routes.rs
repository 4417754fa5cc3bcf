//! Routing table
//!
//! Fixed mapping of pages to paths, plus resolution of an incoming path to
//! the page that should render.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Site root; always redirects to [`Route::Home`]
pub const ROOT: &str = "/";

/// Tabs that show the header tab bar
pub const HEADER_TABS: [Route; 4] = [
    Route::Home,
    Route::QuestionBank,
    Route::PdfBooks,
    Route::ShortQuiz,
];

/// Logical pages of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    Home,
    About,
    Join,
    PdfBooks,
    Profile,
    QuestionBank,
    Search,
    ShortQuiz,
    Moderator,
    BecomeInstructor,
    Blogs,
    Courses,
    HandNotes,
    JobCircular,
    PrivacyPolicy,
    ReportBug,
    ResetPassword,
    Tutorials,
}

/// Outcome of resolving a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    /// Render this page
    Page(Route),
    /// Navigate to this page instead
    Redirect(Route),
    /// No page handles the path
    NotFound,
}

impl Route {
    pub fn all() -> &'static [Route] {
        &[
            Route::Home,
            Route::About,
            Route::Join,
            Route::PdfBooks,
            Route::Profile,
            Route::QuestionBank,
            Route::Search,
            Route::ShortQuiz,
            Route::Moderator,
            Route::BecomeInstructor,
            Route::Blogs,
            Route::Courses,
            Route::HandNotes,
            Route::JobCircular,
            Route::PrivacyPolicy,
            Route::ReportBug,
            Route::ResetPassword,
            Route::Tutorials,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::About => "/about",
            Route::Join => "/join",
            Route::PdfBooks => "/pdfbooks",
            Route::Profile => "/profile",
            Route::QuestionBank => "/questionbank",
            Route::Search => "/search",
            Route::ShortQuiz => "/shortquiz",
            Route::Moderator => "/moderator",
            Route::BecomeInstructor => "/become-instructor",
            Route::Blogs => "/blogs",
            Route::Courses => "/courses",
            Route::HandNotes => "/handnotes",
            Route::JobCircular => "/jobcircular",
            Route::PrivacyPolicy => "/privacy-policy",
            Route::ReportBug => "/report-bug",
            Route::ResetPassword => "/reset-password",
            Route::Tutorials => "/tutorials",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Join => "Join",
            Route::PdfBooks => "PDF Books",
            Route::Profile => "Profile",
            Route::QuestionBank => "Question Bank",
            Route::Search => "Search",
            Route::ShortQuiz => "Short Quiz",
            Route::Moderator => "Moderator",
            Route::BecomeInstructor => "Become an Instructor",
            Route::Blogs => "Blogs",
            Route::Courses => "Courses",
            Route::HandNotes => "Hand Notes",
            Route::JobCircular => "Job Circular",
            Route::PrivacyPolicy => "Privacy Policy",
            Route::ReportBug => "Report a Bug",
            Route::ResetPassword => "Reset Password",
            Route::Tutorials => "Tutorials",
        }
    }

    /// First path segment, used as the active tab key
    pub fn tab(&self) -> &'static str {
        first_segment(self.path())
    }

    /// Whether a page is currently served. Unmounted routes resolve to not-found.
    pub fn is_mounted(&self) -> bool {
        matches!(
            self,
            Route::Home
                | Route::About
                | Route::Join
                | Route::PdfBooks
                | Route::Profile
                | Route::QuestionBank
                | Route::Search
                | Route::ShortQuiz
                | Route::Moderator
        )
    }

    /// API collection listed by this page, if it is a listing page
    pub fn collection(&self) -> Option<&'static str> {
        match self {
            Route::PdfBooks => Some("/books"),
            Route::QuestionBank => Some("/questions"),
            Route::Tutorials => Some("/tutorials"),
            Route::JobCircular => Some("/jobs"),
            Route::Blogs => Some("/blogs"),
            Route::Courses => Some("/courses"),
            _ => None,
        }
    }

    /// Look up a route by its logical name (`pdfBooks`, `questionbank`, ...)
    pub fn from_name(name: &str) -> Option<Route> {
        let wanted = name.trim().trim_start_matches('/').to_lowercase().replace(['-', '_'], "");
        Route::all()
            .iter()
            .copied()
            .find(|r| r.tab().replace('-', "") == wanted || format!("{:?}", r).to_lowercase() == wanted)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/')
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
}

/// Resolve a path to the page that renders it
pub fn resolve(path: &str) -> RouteMatch {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == ROOT {
        return RouteMatch::Redirect(Route::Home);
    }

    let segment = first_segment(trimmed).to_lowercase();
    Route::all()
        .iter()
        .copied()
        .find(|r| r.is_mounted() && r.tab() == segment)
        .map(RouteMatch::Page)
        .unwrap_or(RouteMatch::NotFound)
}

/// Whether the header tab bar is shown for the active tab key
pub fn has_header_tabs(active_tab: &str) -> bool {
    HEADER_TABS.iter().any(|r| r.tab() == active_tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_home() {
        assert_eq!(resolve("/"), RouteMatch::Redirect(Route::Home));
        assert_eq!(resolve(""), RouteMatch::Redirect(Route::Home));
    }

    #[test]
    fn test_mounted_paths_and_subpaths() {
        assert_eq!(resolve("/pdfbooks"), RouteMatch::Page(Route::PdfBooks));
        assert_eq!(resolve("/profile/settings"), RouteMatch::Page(Route::Profile));
        assert_eq!(resolve("/search?q=rust"), RouteMatch::Page(Route::Search));
        assert_eq!(resolve("/QuestionBank"), RouteMatch::Page(Route::QuestionBank));
    }

    #[test]
    fn test_unknown_and_unmounted_are_not_found() {
        assert_eq!(resolve("/nowhere"), RouteMatch::NotFound);
        assert_eq!(resolve("/blogs"), RouteMatch::NotFound);
        assert_eq!(resolve("/tutorials/rust"), RouteMatch::NotFound);
    }

    #[test]
    fn test_header_tabs() {
        assert!(has_header_tabs("home"));
        assert!(has_header_tabs("questionbank"));
        assert!(has_header_tabs("pdfbooks"));
        assert!(has_header_tabs("shortquiz"));
        assert!(!has_header_tabs("profile"));
        assert!(!has_header_tabs("search"));
        assert!(!has_header_tabs(""));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Route::from_name("pdfBooks"), Some(Route::PdfBooks));
        assert_eq!(Route::from_name("/shortquiz"), Some(Route::ShortQuiz));
        assert_eq!(Route::from_name("privacy-policy"), Some(Route::PrivacyPolicy));
        assert_eq!(Route::from_name("jobCircular"), Some(Route::JobCircular));
        assert_eq!(Route::from_name("nope"), None);
    }
}
