//! Theming
//!
//! - Preference choices and color tables
//! - Pure theme derivation
//! - OS dark-mode signal
//! - The coordinator tying preference, storage and signal together

pub mod coordinator;
pub mod derive;
pub mod palette;
pub mod system;

pub use coordinator::{ThemeCoordinator, THEME_STORAGE_KEY};
pub use derive::{derive_theme, ResolvedTheme, ThemePreference};
pub use palette::{BackgroundChoice, Mode, Palette, PrimaryHue, SecondaryHue};
pub use system::ColorSchemeSignal;
