//! Root coordinator
//!
//! Wires the theme, alert, countdown and notification state together and
//! hands pages the two context channels they are allowed to use: the user
//! session and the alert/countdown handle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{AlertChannel, AlertState, CloseReason, Severity};
use crate::core::storage::PreferenceStore;
use crate::countdown::{CountdownState, CountdownTimer};
use crate::error::PortalError;
use crate::notifications::NotificationList;
use crate::routes::{self, Route, RouteMatch};
use crate::theme::{ColorSchemeSignal, ThemeCoordinator};

/// Signed-in user as returned by the portal API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Default)]
struct Session {
    user: User,
    quiz_answers: Vec<String>,
}

/// User-session channel shared with pages
#[derive(Clone, Default)]
pub struct UserContext {
    session: Arc<Mutex<Session>>,
}

impl UserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> User {
        self.lock().user.clone()
    }

    pub fn set_user(&self, user: User) {
        tracing::debug!("Session user set to '{}'", user.user_name);
        self.lock().user = user;
    }

    pub fn is_logged_in(&self) -> bool {
        !self.lock().user.user_name.is_empty()
    }

    /// Answers picked so far in the running quiz
    pub fn quiz_answers(&self) -> Vec<String> {
        self.lock().quiz_answers.clone()
    }

    pub fn set_quiz_answers(&self, answers: Vec<String>) {
        self.lock().quiz_answers = answers;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Alert/countdown channel shared with pages
#[derive(Clone, Default)]
pub struct AlertContext {
    alerts: AlertChannel,
    countdown: CountdownTimer,
}

impl AlertContext {
    pub fn new(alerts: AlertChannel, countdown: CountdownTimer) -> Self {
        Self { alerts, countdown }
    }

    pub fn alerts(&self) -> &AlertChannel {
        &self.alerts
    }

    pub fn countdown(&self) -> &CountdownTimer {
        &self.countdown
    }

    pub fn publish(&self, message: impl Into<String>, severity: Severity) {
        self.alerts.publish(message, severity);
    }

    pub fn publish_error(&self, err: &PortalError) {
        self.alerts.publish_error(err);
    }

    pub fn dismiss(&self) {
        self.alerts.close(CloseReason::Dismissed);
    }

    pub fn alert_state(&self) -> AlertState {
        self.alerts.state()
    }

    pub fn start(&self, target: DateTime<Utc>, navigation_target: Route) {
        self.countdown.start(target, navigation_target);
    }

    pub fn start_in(&self, duration: Duration, navigation_target: Route) {
        self.countdown.start_in(duration, navigation_target);
    }

    pub fn stop(&self) {
        self.countdown.stop();
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.state()
    }
}

/// Application root
pub struct Portal {
    theme: ThemeCoordinator,
    alert_context: AlertContext,
    user_context: UserContext,
    notifications: NotificationList,
    current_route: Option<Route>,
    active_tab: String,
    header_tabs: bool,
}

impl Portal {
    /// Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn PreferenceStore>, signal: ColorSchemeSignal) -> Self {
        let mut portal = Self {
            theme: ThemeCoordinator::new(store, signal),
            alert_context: AlertContext::default(),
            user_context: UserContext::new(),
            notifications: NotificationList::demo(),
            current_route: None,
            active_tab: String::new(),
            header_tabs: false,
        };
        portal.navigate(routes::ROOT);
        portal
    }

    pub fn theme(&self) -> &ThemeCoordinator {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeCoordinator {
        &mut self.theme
    }

    pub fn alert_context(&self) -> AlertContext {
        self.alert_context.clone()
    }

    pub fn user_context(&self) -> UserContext {
        self.user_context.clone()
    }

    pub fn notifications(&self) -> &NotificationList {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationList {
        &mut self.notifications
    }

    /// Page currently shown, `None` on the not-found page
    pub fn current_route(&self) -> Option<Route> {
        self.current_route
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn has_header_tabs(&self) -> bool {
        self.header_tabs
    }

    /// Resolve and show a path. Redirects are followed.
    pub fn navigate(&mut self, path: &str) -> RouteMatch {
        let matched = routes::resolve(path);
        match matched {
            RouteMatch::Page(route) | RouteMatch::Redirect(route) => {
                self.current_route = Some(route);
                self.active_tab = route.tab().to_string();
            }
            RouteMatch::NotFound => {
                self.current_route = None;
                self.active_tab = path
                    .trim()
                    .trim_start_matches('/')
                    .split(['/', '?', '#'])
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
            }
        }
        self.header_tabs = routes::has_header_tabs(&self.active_tab);
        tracing::debug!("Navigated to '{}' -> {:?}", path, matched);
        matched
    }

    /// Act on the countdown surface: hide it and go to its target page
    pub fn follow_countdown(&mut self) -> RouteMatch {
        let target = self.alert_context.countdown().state().navigation_target;
        self.alert_context.countdown().close(CloseReason::Dismissed);
        self.navigate(target.path())
    }

    /// Release the theme listener and all pending timers
    pub fn shutdown(&mut self) {
        self.theme.shutdown();
        self.alert_context.alerts().shutdown();
        self.alert_context.countdown().shutdown();
        tracing::debug!("Portal shut down");
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    fn portal() -> Portal {
        Portal::new(Arc::new(MemoryStore::new()), ColorSchemeSignal::new(false))
    }

    #[tokio::test]
    async fn test_starts_on_home() {
        let portal = portal();
        assert_eq!(portal.current_route(), Some(Route::Home));
        assert_eq!(portal.active_tab(), "home");
        assert!(portal.has_header_tabs());
        assert_eq!(portal.notifications().unseen_count(), 5);
    }

    #[tokio::test]
    async fn test_navigate_updates_header_tabs() {
        let mut portal = portal();

        assert_eq!(portal.navigate("/profile"), RouteMatch::Page(Route::Profile));
        assert!(!portal.has_header_tabs());

        portal.navigate("/shortquiz");
        assert!(portal.has_header_tabs());

        assert_eq!(portal.navigate("/blogs"), RouteMatch::NotFound);
        assert_eq!(portal.current_route(), None);
        assert_eq!(portal.active_tab(), "blogs");
        assert!(!portal.has_header_tabs());

        assert_eq!(portal.navigate("/"), RouteMatch::Redirect(Route::Home));
        assert_eq!(portal.current_route(), Some(Route::Home));
    }

    #[test]
    fn test_user_context() {
        let users = UserContext::new();
        assert!(!users.is_logged_in());

        let shared = users.clone();
        shared.set_user(User {
            user_name: "hadi".into(),
            full_name: "Hadi Himel".into(),
            photo: None,
        });
        assert!(users.is_logged_in());
        assert_eq!(users.user().full_name, "Hadi Himel");

        users.set_quiz_answers(vec!["b".into(), "d".into()]);
        assert_eq!(shared.quiz_answers(), vec!["b", "d"]);
    }

    #[test]
    fn test_user_from_api_json() {
        let user: User =
            serde_json::from_str(r#"{"userName":"ahsan","fullName":"Ahsan Habib"}"#).unwrap();
        assert_eq!(user.user_name, "ahsan");
        assert_eq!(user.photo, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_context_shares_state() {
        let portal = portal();
        let page_handle = portal.alert_context();
        page_handle.publish("saved", Severity::Success);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(portal.alert_context().alert_state().is_open);

        page_handle.dismiss();
        assert!(!portal.alert_context().alert_state().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_countdown() {
        let mut portal = portal();
        portal
            .alert_context()
            .start_in(Duration::from_secs(60), Route::ShortQuiz);

        let matched = portal.follow_countdown();
        assert_eq!(matched, RouteMatch::Page(Route::ShortQuiz));
        assert!(!portal.alert_context().countdown_state().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_timers() {
        let mut portal = portal();
        let alerts = portal.alert_context();
        alerts.start_in(Duration::from_secs(5), Route::Home);
        alerts.publish("bye", Severity::Info);

        portal.shutdown();
        assert!(!portal.theme().is_listening());

        tokio::time::sleep(Duration::from_secs(10)).await;
        let countdown = alerts.countdown_state();
        assert!(!countdown.is_expired);
        assert_eq!(countdown.remaining_text, "0h 0m 5s");
        assert!(!alerts.alert_state().is_open);
    }
}
