//! CLI command definitions using clap
//!
//! Defines the command structure for the `edu` CLI tool.

use clap::{Parser, Subcommand, ValueEnum};

/// eduportal - Education portal client
///
/// Terminal client for the education portal.
/// Run without arguments to launch the TUI mode.
#[derive(Parser, Debug)]
#[command(name = "edu", version, about, long_about = None)]
pub struct Cli {
    /// Portal API address (overrides the configured one)
    #[arg(long, env = "EDUPORTAL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or change the theme preference
    Theme(ThemeArgs),

    /// Print the routing table
    Routes,

    /// Run a countdown in the terminal
    Countdown(CountdownArgs),

    /// Fetch a list endpoint from the portal API
    Fetch(FetchArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Theme commands
#[derive(Parser, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    /// Show the stored preference and the resolved palette
    Show,

    /// Change one or more theme choices
    Set {
        /// Background mode
        #[arg(long, value_parser = ["auto", "light", "dark"])]
        background: Option<String>,

        /// Primary hue
        #[arg(long, value_parser = ["blue", "green", "violet"])]
        primary: Option<String>,

        /// Secondary hue
        #[arg(long, value_parser = ["amber", "orange", "pink"])]
        secondary: Option<String>,
    },

    /// Restore the default theme
    Reset,
}

// ─────────────────────────────────────────────────────────────────────────────
// Countdown Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Countdown arguments
#[derive(Parser, Debug)]
pub struct CountdownArgs {
    /// Seconds until expiry
    pub seconds: u64,

    /// Page the countdown links to
    #[arg(long, short, default_value = "home")]
    pub target: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fetch Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch arguments
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// API path (`/books`) or page name (`pdfbooks`)
    pub path: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Portal API base address
    #[value(name = "api-url")]
    ApiUrl,

    /// Request timeout in seconds
    #[value(name = "timeout")]
    Timeout,

    /// OS color scheme polling period in seconds
    #[value(name = "color-poll")]
    ColorPoll,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["edu"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_theme_set_rejects_unknown_hue() {
        let result = Cli::try_parse_from(["edu", "theme", "set", "--primary", "red"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_countdown_defaults_to_home() {
        let cli = Cli::try_parse_from(["edu", "countdown", "30"]).unwrap();
        match cli.command {
            Some(Commands::Countdown(args)) => {
                assert_eq!(args.seconds, 30);
                assert_eq!(args.target, "home");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
