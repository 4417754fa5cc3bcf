//! eduportal - Education portal terminal client
//!
//! Run without arguments to launch the TUI, or use subcommands for CLI mode.
//!
//! Available as the `edu` command.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eduportal::cli::commands::{Cli, Commands};
use eduportal::cli::{config, countdown, fetch, routes, theme};
use eduportal::core::config::Config;
use eduportal::error::{PortalError, Result};
use eduportal::tui::App;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(e: PortalError) {
    eprintln!("Error: {}", e);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // No subcommand - launch TUI mode
        None => {
            let config = load_config(cli.api_url.as_deref())?;
            run_tui(config).await
        }
        Some(Commands::Theme(args)) => theme::handle_theme(args.command).await,
        Some(Commands::Routes) => {
            routes::handle_routes();
            Ok(())
        }
        Some(Commands::Countdown(args)) => countdown::handle_countdown(args).await,
        Some(Commands::Fetch(args)) => {
            let config = load_config(cli.api_url.as_deref())?;
            fetch::handle_fetch(args, &config).await
        }
        Some(Commands::Config(args)) => config::handle_config(args.command),
    }
}

/// Load the configuration, applying the command-line API address override
fn load_config(api_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = api_url {
        config.set_api_base_url(url)?;
    }
    Ok(config)
}

/// Run the TUI application
async fn run_tui(config: Config) -> Result<()> {
    let mut app = App::new(config).await?;
    app.run().await
}
