//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::Config;
use crate::error::{PortalError, Result};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        ConfigKey::ApiUrl => {
            config.set_api_base_url(&value)?;
            config.save()?;
            println!("API address set to: {}", config.api_base_url);
        }
        ConfigKey::Timeout => {
            config.request_timeout_secs = parse_seconds(&value)?;
            config.save()?;
            println!("Request timeout set to: {}s", config.request_timeout_secs);
        }
        ConfigKey::ColorPoll => {
            config.color_scheme_poll_secs = parse_seconds(&value)?;
            config.save()?;
            println!(
                "Color scheme polling set to: {}s",
                config.color_scheme_poll_secs
            );
        }
    }
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    match key {
        ConfigKey::ApiUrl => println!("API address: {}", config.api_base_url),
        ConfigKey::Timeout => println!("Request timeout: {}s", config.request_timeout_secs),
        ConfigKey::ColorPoll => {
            println!("Color scheme polling: {}s", config.color_scheme_poll_secs)
        }
    }
    Ok(())
}

/// Handle resetting a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    let defaults = Config::default();
    match key {
        ConfigKey::ApiUrl => config.api_base_url = defaults.api_base_url,
        ConfigKey::Timeout => config.request_timeout_secs = defaults.request_timeout_secs,
        ConfigKey::ColorPoll => config.color_scheme_poll_secs = defaults.color_scheme_poll_secs,
    }
    config.save()?;
    println!("Configuration value reset to default.");
    Ok(())
}

fn parse_seconds(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(PortalError::InvalidInput(format!(
            "Invalid number of seconds '{}'. Expected a positive integer.",
            value
        ))),
    }
}
