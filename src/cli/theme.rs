//! Theme CLI command handlers

use std::sync::Arc;

use crate::cli::commands::ThemeCommand;
use crate::core::storage::{FileStore, PreferenceStore};
use crate::error::Result;
use crate::theme::{
    BackgroundChoice, ColorSchemeSignal, PrimaryHue, ResolvedTheme, SecondaryHue,
    ThemeCoordinator, ThemePreference,
};

/// Handle theme commands
pub async fn handle_theme(command: ThemeCommand) -> Result<()> {
    let store: Arc<dyn PreferenceStore> = Arc::new(FileStore::open_default()?);
    let signal = ColorSchemeSignal::detect().await;
    let mut coordinator = ThemeCoordinator::new(store, signal);

    let result = match command {
        ThemeCommand::Show => {
            print_theme(&coordinator);
            Ok(())
        }
        ThemeCommand::Set {
            background,
            primary,
            secondary,
        } => {
            let preference = apply_changes(
                coordinator.preference(),
                background.as_deref(),
                primary.as_deref(),
                secondary.as_deref(),
            );
            coordinator.set_preference(preference).map(|()| {
                println!("Theme updated.");
                println!();
                print_theme(&coordinator);
            })
        }
        ThemeCommand::Reset => coordinator.reset().map(|()| {
            println!("Theme reset to defaults.");
            println!();
            print_theme(&coordinator);
        }),
    };

    coordinator.shutdown();
    result
}

/// Overlay the given choices on the current preference
fn apply_changes(
    current: ThemePreference,
    background: Option<&str>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> ThemePreference {
    ThemePreference::new(
        background.map_or(current.background, BackgroundChoice::parse),
        primary.map_or(current.primary, PrimaryHue::parse),
        secondary.map_or(current.secondary, SecondaryHue::parse),
    )
}

fn print_theme(coordinator: &ThemeCoordinator) {
    let preference = coordinator.preference();
    let theme = coordinator.theme();

    if preference.follows_system() {
        println!(
            "Background: {} (system is {})",
            preference.background,
            if coordinator.signal().is_dark() { "dark" } else { "light" }
        );
    } else {
        println!("Background: {}", preference.background);
    }
    println!("Primary:    {}", preference.primary);
    println!("Secondary:  {}", preference.secondary);
    println!();
    print_tokens(&theme);
}

fn print_tokens(theme: &ResolvedTheme) {
    println!("Resolved palette ({} mode)", theme.mode);
    println!(
        "  primary     {:<8} text {}",
        theme.primary.main, theme.primary.contrast_text
    );
    println!(
        "  secondary   {:<8} text {}",
        theme.secondary.main, theme.secondary.contrast_text
    );
    println!("  paper       {}", theme.background.paper);
    println!("  default     {}", theme.background.default);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_changes_keeps_unset_fields() {
        let current = ThemePreference::new(
            BackgroundChoice::Dark,
            PrimaryHue::Green,
            SecondaryHue::Pink,
        );
        let updated = apply_changes(current, None, Some("violet"), None);
        assert_eq!(updated.background, BackgroundChoice::Dark);
        assert_eq!(updated.primary, PrimaryHue::Violet);
        assert_eq!(updated.secondary, SecondaryHue::Pink);
    }

    #[test]
    fn test_apply_no_changes() {
        let current = ThemePreference::default();
        assert_eq!(apply_changes(current, None, None, None), current);
    }
}
