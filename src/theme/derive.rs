//! Theme derivation
//!
//! `derive_theme` is a total, side-effect free function of the preference
//! triple and the OS dark-mode flag.

use serde::{Deserialize, Serialize};

use crate::theme::palette::{
    background_palette, primary_palette, secondary_palette, BackgroundChoice, BackgroundPalette,
    Breakpoints, Mode, Palette, PrimaryHue, SecondaryHue, Shape, Typography,
};

/// The user's persisted theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ThemePreference {
    #[serde(default)]
    pub background: BackgroundChoice,
    #[serde(default)]
    pub primary: PrimaryHue,
    #[serde(default)]
    pub secondary: SecondaryHue,
}

impl ThemePreference {
    pub fn new(background: BackgroundChoice, primary: PrimaryHue, secondary: SecondaryHue) -> Self {
        Self {
            background,
            primary,
            secondary,
        }
    }

    /// Whether this preference tracks the OS dark-mode setting
    pub fn follows_system(&self) -> bool {
        self.background == BackgroundChoice::Auto
    }
}

/// Fully computed visual theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    pub mode: Mode,
    pub primary: Palette,
    pub secondary: Palette,
    pub background: BackgroundPalette,
    pub breakpoints: Breakpoints,
    pub typography: Typography,
    pub shape: Shape,
}

/// Resolve the palette mode. `Auto` defers to the OS signal.
pub fn resolve_mode(background: BackgroundChoice, is_os_dark: bool) -> Mode {
    match background {
        BackgroundChoice::Dark => Mode::Dark,
        BackgroundChoice::Light => Mode::Light,
        BackgroundChoice::Auto if is_os_dark => Mode::Dark,
        BackgroundChoice::Auto => Mode::Light,
    }
}

/// Derive the resolved theme for a preference triple
pub fn derive_theme(
    background: BackgroundChoice,
    primary: PrimaryHue,
    secondary: SecondaryHue,
    is_os_dark: bool,
) -> ResolvedTheme {
    let mode = resolve_mode(background, is_os_dark);

    ResolvedTheme {
        mode,
        primary: primary_palette(mode, primary),
        secondary: secondary_palette(mode, secondary),
        background: background_palette(mode),
        breakpoints: Breakpoints::STANDARD,
        typography: Typography::STANDARD,
        shape: Shape::STANDARD,
    }
}

impl ResolvedTheme {
    /// Derive from a stored preference
    pub fn from_preference(preference: &ThemePreference, is_os_dark: bool) -> Self {
        derive_theme(
            preference.background,
            preference.primary,
            preference.secondary,
            is_os_dark,
        )
    }

    pub fn is_dark(&self) -> bool {
        self.mode == Mode::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_triples() -> Vec<(BackgroundChoice, PrimaryHue, SecondaryHue)> {
        let mut triples = Vec::new();
        for b in BackgroundChoice::all() {
            for p in PrimaryHue::all() {
                for s in SecondaryHue::all() {
                    triples.push((*b, *p, *s));
                }
            }
        }
        triples
    }

    #[test]
    fn test_derivation_is_repeatable() {
        for (b, p, s) in all_triples() {
            for dark in [false, true] {
                assert_eq!(derive_theme(b, p, s, dark), derive_theme(b, p, s, dark));
            }
        }
    }

    #[test]
    fn test_auto_follows_os_signal() {
        for p in PrimaryHue::all() {
            for s in SecondaryHue::all() {
                let dark = derive_theme(BackgroundChoice::Auto, *p, *s, true);
                let light = derive_theme(BackgroundChoice::Auto, *p, *s, false);
                assert_eq!(dark.mode, Mode::Dark);
                assert_eq!(light.mode, Mode::Light);
            }
        }
    }

    #[test]
    fn test_explicit_background_ignores_os_signal() {
        for (b, p, s) in all_triples() {
            if b == BackgroundChoice::Auto {
                continue;
            }
            assert_eq!(derive_theme(b, p, s, false), derive_theme(b, p, s, true));
        }
    }

    #[test]
    fn test_unknown_hues_resolve_to_blue_amber() {
        for mode_choice in [BackgroundChoice::Light, BackgroundChoice::Dark] {
            let fallback = derive_theme(
                mode_choice,
                PrimaryHue::parse("crimson"),
                SecondaryHue::parse("teal"),
                false,
            );
            let canonical =
                derive_theme(mode_choice, PrimaryHue::Blue, SecondaryHue::Amber, false);
            assert_eq!(fallback, canonical);
        }
    }

    #[test]
    fn test_dark_green_pink_tokens() {
        let theme = derive_theme(
            BackgroundChoice::Dark,
            PrimaryHue::Green,
            SecondaryHue::Pink,
            false,
        );
        assert_eq!(theme.mode, Mode::Dark);
        assert_eq!(theme.primary.main, "#66bb6a");
        assert_eq!(theme.primary.contrast_text, "#000");
        assert_eq!(theme.secondary.main, "#ff5c86");
        assert_eq!(theme.background.paper, "#35363a");
    }

    #[test]
    fn test_static_configuration() {
        let theme = ResolvedTheme::from_preference(&ThemePreference::default(), false);
        assert_eq!(theme.breakpoints.xs, 414);
        assert_eq!(theme.breakpoints.xxl, 1400);
        assert_eq!(theme.shape.border_radius, 8);
        assert_eq!(theme.typography.h1_font_size, "5rem");
        assert_eq!(theme.primary.main, "#039be5");
        assert_eq!(theme.secondary.main, "#f57c00");
    }

    #[test]
    fn test_preference_json_shape() {
        let pref = ThemePreference::default();
        assert_eq!(
            serde_json::to_string(&pref).unwrap(),
            r#"{"background":"auto","primary":"blue","secondary":"amber"}"#
        );

        let partial: ThemePreference = serde_json::from_str(r#"{"primary":"violet"}"#).unwrap();
        assert_eq!(
            partial,
            ThemePreference::new(
                BackgroundChoice::Auto,
                PrimaryHue::Violet,
                SecondaryHue::Amber
            )
        );
    }
}
