//! Theme choices and color tables
//!
//! Every (mode, hue) pair has its own entry; nothing falls through to an
//! implicit default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Background preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BackgroundChoice {
    /// Follow the OS dark-mode setting
    #[default]
    Auto,
    Light,
    Dark,
}

/// Primary accent hue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PrimaryHue {
    #[default]
    Blue,
    Green,
    Violet,
}

/// Secondary accent hue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SecondaryHue {
    #[default]
    Amber,
    Orange,
    Pink,
}

/// Resolved palette type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl BackgroundChoice {
    /// Parse a stored value. Anything unrecognised resolves to `Light`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => BackgroundChoice::Auto,
            "dark" => BackgroundChoice::Dark,
            _ => BackgroundChoice::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundChoice::Auto => "auto",
            BackgroundChoice::Light => "light",
            BackgroundChoice::Dark => "dark",
        }
    }

    pub fn all() -> &'static [BackgroundChoice] {
        &[
            BackgroundChoice::Auto,
            BackgroundChoice::Light,
            BackgroundChoice::Dark,
        ]
    }
}

impl PrimaryHue {
    /// Parse a stored value. Anything unrecognised resolves to `Blue`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => PrimaryHue::Green,
            "violet" => PrimaryHue::Violet,
            _ => PrimaryHue::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryHue::Blue => "blue",
            PrimaryHue::Green => "green",
            PrimaryHue::Violet => "violet",
        }
    }

    pub fn all() -> &'static [PrimaryHue] {
        &[PrimaryHue::Blue, PrimaryHue::Green, PrimaryHue::Violet]
    }
}

impl SecondaryHue {
    /// Parse a stored value. Anything unrecognised resolves to `Amber`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "orange" => SecondaryHue::Orange,
            "pink" => SecondaryHue::Pink,
            _ => SecondaryHue::Amber,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecondaryHue::Amber => "amber",
            SecondaryHue::Orange => "orange",
            SecondaryHue::Pink => "pink",
        }
    }

    pub fn all() -> &'static [SecondaryHue] {
        &[SecondaryHue::Amber, SecondaryHue::Orange, SecondaryHue::Pink]
    }
}

impl From<String> for BackgroundChoice {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<String> for PrimaryHue {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<String> for SecondaryHue {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for BackgroundChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PrimaryHue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SecondaryHue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Light => f.write_str("light"),
            Mode::Dark => f.write_str("dark"),
        }
    }
}

/// Accent color token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub main: &'static str,
    pub contrast_text: &'static str,
}

/// Surface color token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundPalette {
    pub paper: &'static str,
    pub default: &'static str,
}

const fn palette(main: &'static str, contrast_text: &'static str) -> Palette {
    Palette {
        main,
        contrast_text,
    }
}

/// Primary color for a mode/hue pair
pub fn primary_palette(mode: Mode, hue: PrimaryHue) -> Palette {
    match (mode, hue) {
        (Mode::Light, PrimaryHue::Blue) => palette("#039be5", "#fff"),
        (Mode::Light, PrimaryHue::Green) => palette("#4caf50", "#fff"),
        (Mode::Light, PrimaryHue::Violet) => palette("#9050ff", "#fff"),
        (Mode::Dark, PrimaryHue::Blue) => palette("#29b6f6", "#000"),
        (Mode::Dark, PrimaryHue::Green) => palette("#66bb6a", "#000"),
        (Mode::Dark, PrimaryHue::Violet) => palette("#b279ff", "#000"),
    }
}

/// Secondary color for a mode/hue pair
pub fn secondary_palette(mode: Mode, hue: SecondaryHue) -> Palette {
    match (mode, hue) {
        (Mode::Light, SecondaryHue::Amber) => palette("#f57c00", "#fff"),
        (Mode::Light, SecondaryHue::Orange) => palette("#ff5722", "#fff"),
        (Mode::Light, SecondaryHue::Pink) => palette("#f40658", "#fff"),
        (Mode::Dark, SecondaryHue::Amber) => palette("#ff9800", "#000"),
        (Mode::Dark, SecondaryHue::Orange) => palette("#ff7043", "#000"),
        (Mode::Dark, SecondaryHue::Pink) => palette("#ff5c86", "#000"),
    }
}

/// Surface colors for a mode
pub fn background_palette(mode: Mode) -> BackgroundPalette {
    match mode {
        Mode::Light => BackgroundPalette {
            paper: "#fff",
            default: "#f5f5f5",
        },
        Mode::Dark => BackgroundPalette {
            paper: "#35363a",
            default: "#212121",
        },
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((digits.next()??, digits.next()??, digits.next()??))
        }
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Named layout breakpoints in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoints {
    pub xxs: u32,
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
    pub xxl: u32,
}

impl Breakpoints {
    pub const STANDARD: Breakpoints = Breakpoints {
        xxs: 0,
        xs: 414,
        sm: 576,
        md: 768,
        lg: 992,
        xl: 1200,
        xxl: 1400,
    };

    /// Breakpoints in ascending order
    pub fn entries(&self) -> [(&'static str, u32); 7] {
        [
            ("xxs", self.xxs),
            ("xs", self.xs),
            ("sm", self.sm),
            ("md", self.md),
            ("lg", self.lg),
            ("xl", self.xl),
            ("xxl", self.xxl),
        ]
    }

    /// Largest breakpoint whose lower bound is <= `width`
    pub fn key_for_width(&self, width: u32) -> &'static str {
        self.entries()
            .iter()
            .rev()
            .find(|(_, min)| width >= *min)
            .map(|(key, _)| *key)
            .unwrap_or("xxs")
    }
}

/// Font configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: &'static str,
    /// Used for h1-h6
    pub heading_font_family: &'static str,
    pub h1_font_size: &'static str,
}

impl Typography {
    pub const STANDARD: Typography = Typography {
        font_family: "'Roboto', 'Baloo Da 2', sans-serif",
        heading_font_family: "'Poppins', 'Baloo Da 2', sans-serif",
        h1_font_size: "5rem",
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub border_radius: u8,
}

impl Shape {
    pub const STANDARD: Shape = Shape { border_radius: 8 };
}
