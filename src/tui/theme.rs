//! TUI theme and styles
//!
//! Terminal colors are taken from the resolved portal palette.

use ratatui::style::{Color, Modifier, Style};

use crate::alert::Severity;
use crate::theme::palette::parse_hex;
use crate::theme::ResolvedTheme;

/// Application color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub on_primary: Color,
    pub secondary: Color,
    pub on_secondary: Color,
    /// Popup and card surface
    pub paper: Color,
    /// Page background
    pub background: Color,
    /// Body text
    pub text: Color,
}

impl Theme {
    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Warning color
    pub const WARNING: Color = Color::Yellow;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGray;

    pub fn from_resolved(theme: &ResolvedTheme) -> Self {
        let text = if theme.is_dark() {
            Color::White
        } else {
            Color::Black
        };
        Self {
            primary: rgb(theme.primary.main, Color::Cyan),
            on_primary: rgb(theme.primary.contrast_text, Color::Black),
            secondary: rgb(theme.secondary.main, Color::Yellow),
            on_secondary: rgb(theme.secondary.contrast_text, Color::Black),
            paper: rgb(theme.background.paper, Color::Reset),
            background: rgb(theme.background.default, Color::Reset),
            text,
        }
    }

    /// Base style for the whole screen
    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    /// Header style
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Active header tab
    pub fn active_tab(&self) -> Style {
        Style::default()
            .bg(self.primary)
            .fg(self.on_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Status bar style
    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.paper).fg(self.text)
    }

    /// Selected item style
    pub fn selected(&self) -> Style {
        Style::default().bg(self.primary).fg(self.on_primary)
    }

    /// Unseen-notifications badge
    pub fn badge(&self) -> Style {
        Style::default()
            .bg(self.secondary)
            .fg(self.on_secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Popup body
    pub fn popup(&self) -> Style {
        Style::default().bg(self.paper).fg(self.text)
    }

    /// Muted text style
    pub fn muted(&self) -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Border color for an alert
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.primary,
            Severity::Success => Self::SUCCESS,
            Severity::Warning => Self::WARNING,
            Severity::Error => Self::ERROR,
        }
    }
}

fn rgb(token: &str, fallback: Color) -> Color {
    parse_hex(token)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{derive_theme, BackgroundChoice, PrimaryHue, SecondaryHue};

    #[test]
    fn test_colors_follow_palette() {
        let resolved = derive_theme(
            BackgroundChoice::Dark,
            PrimaryHue::Green,
            SecondaryHue::Pink,
            false,
        );
        let theme = Theme::from_resolved(&resolved);
        assert_eq!(theme.primary, Color::Rgb(0x66, 0xbb, 0x6a));
        assert_eq!(theme.secondary, Color::Rgb(0xff, 0x5c, 0x86));
        assert_eq!(theme.background, Color::Rgb(0x21, 0x21, 0x21));
        assert_eq!(theme.on_primary, Color::Rgb(0, 0, 0));
        assert_eq!(theme.text, Color::White);
    }

    #[test]
    fn test_severity_colors() {
        let resolved = derive_theme(
            BackgroundChoice::Light,
            PrimaryHue::Blue,
            SecondaryHue::Amber,
            false,
        );
        let theme = Theme::from_resolved(&resolved);
        assert_eq!(theme.severity(Severity::Error), Theme::ERROR);
        assert_eq!(theme.severity(Severity::Info), theme.primary);
    }
}
