//! Countdown CLI command handler

use std::io::{self, Write};
use std::time::Duration;

use crate::cli::commands::CountdownArgs;
use crate::countdown::{CountdownPhase, CountdownTimer};
use crate::error::{PortalError, Result};
use crate::routes::Route;

/// Run a countdown, printing every tick until it expires or Ctrl-C
pub async fn handle_countdown(args: CountdownArgs) -> Result<()> {
    let target = Route::from_name(&args.target).ok_or_else(|| {
        PortalError::InvalidInput(format!(
            "Unknown page '{}'. Run 'edu routes' to list pages.",
            args.target
        ))
    })?;

    let countdown = CountdownTimer::new();
    let mut rx = countdown.subscribe();
    countdown.start_in(Duration::from_secs(args.seconds), target);

    loop {
        let state = rx.borrow_and_update().clone();
        match state.phase {
            CountdownPhase::Expired => {
                println!("\rTime is up! Continue at {}            ", target);
                return Ok(());
            }
            CountdownPhase::Stopped => {
                println!();
                println!("Countdown stopped at {}", state.remaining_text);
                return Ok(());
            }
            _ => {
                let marker = if state.is_warning { " (hurry!)" } else { "" };
                print!("\r{}{}        ", state.remaining_text, marker);
                io::stdout().flush().ok();
            }
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => countdown.stop(),
        }
    }
}
