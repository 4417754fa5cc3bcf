//! OS dark-mode signal
//!
//! [`ColorSchemeSignal`] is the in-process equivalent of a
//! `prefers-color-scheme: dark` media query: a boolean with change
//! notifications. A background watcher samples the desktop setting and
//! feeds the signal.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use tokio::process::Command;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::core::schedule::TaskHandle;

/// Environment override, `dark` or `light`
pub const COLOR_SCHEME_ENV: &str = "EDUPORTAL_COLOR_SCHEME";

/// Matches GNOME `color-scheme` values and dark GTK theme names
static DARK_SETTING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)prefer-dark|[-_:]dark\b").expect("Invalid regex pattern for dark setting")
});

/// Live OS dark-mode flag with change notifications
#[derive(Debug, Clone)]
pub struct ColorSchemeSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ColorSchemeSignal {
    pub fn new(is_dark: bool) -> Self {
        let (tx, _rx) = watch::channel(is_dark);
        Self { tx: Arc::new(tx) }
    }

    /// Seed from the desktop setting, light when it cannot be read
    pub async fn detect() -> Self {
        Self::new(detect_system_dark_mode().await.unwrap_or(false))
    }

    /// Current value
    pub fn is_dark(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the value; listeners are only notified on an actual change
    pub fn set_dark(&self, is_dark: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == is_dark {
                false
            } else {
                *current = is_dark;
                true
            }
        });
        if changed {
            tracing::debug!("OS color scheme changed, dark = {}", is_dark);
        }
        changed
    }

    /// Register a listener
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ColorSchemeSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Interpret a desktop setting string
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn is_dark_setting(value: &str) -> bool {
    DARK_SETTING_PATTERN.is_match(value.trim())
}

/// Read the environment override, if set to a recognised value
fn env_override() -> Option<bool> {
    match std::env::var(COLOR_SCHEME_ENV).ok()?.trim().to_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

/// Ask the desktop environment whether dark mode is on.
///
/// Returns `None` when it cannot be determined.
pub async fn detect_system_dark_mode() -> Option<bool> {
    if let Some(value) = env_override() {
        return Some(value);
    }

    #[cfg(target_os = "macos")]
    {
        // The key only exists while dark mode is active
        let output = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .await
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Some(output.status.success() && stdout.trim().eq_ignore_ascii_case("dark"))
    }
    #[cfg(target_os = "linux")]
    {
        for key in ["color-scheme", "gtk-theme"] {
            let output = Command::new("gsettings")
                .args(["get", "org.gnome.desktop.interface", key])
                .output()
                .await
                .ok()?;
            if !output.status.success() {
                continue;
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            if is_dark_setting(&stdout) {
                return Some(true);
            }
            if key == "color-scheme" && stdout.contains("prefer-light") {
                return Some(false);
            }
        }
        Some(false)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

/// Poll the desktop setting every `period` and feed `signal`
pub fn spawn_system_watcher(signal: ColorSchemeSignal, period: Duration) -> TaskHandle {
    TaskHandle::spawn(move |token| async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if token.is_cancelled() {
                break;
            }
            if let Some(is_dark) = detect_system_dark_mode().await {
                signal.set_dark(is_dark);
            }
        }
    })
}
