//! Alert channel
//!
//! Process-wide, single-slot notification sink. A published alert becomes
//! visible after a short delay (so a burst of failures settles into one
//! alert) and hides itself after a length-dependent timeout.
//!
//! A new publish always replaces the current alert and restarts both
//! timers, even if the previous alert is already on screen.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::schedule::{TaskHandle, TimerSlot};
use crate::error::{PortalError, Result};

/// Delay between publish and the alert becoming visible
pub const OPEN_DELAY: Duration = Duration::from_millis(250);

/// Visible time for short messages
pub const SHORT_AUTO_HIDE: Duration = Duration::from_millis(5000);

/// Visible time for messages longer than [`LONG_MESSAGE_CHARS`] UTF-16 units
pub const LONG_AUTO_HIDE: Duration = Duration::from_millis(10000);

pub const LONG_MESSAGE_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Success => f.write_str("success"),
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Why a transient surface is being asked to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Interaction outside the surface; never closes it
    ClickAway,
    /// The surface's own close affordance
    Dismissed,
    /// Auto-hide timer
    Timeout,
}

/// Snapshot of the current alert
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertState {
    /// Empty when there is no alert
    pub message: String,
    pub severity: Severity,
    pub is_open: bool,
}

/// How long an alert stays visible
pub fn auto_hide_duration(message: &str) -> Duration {
    if message.encode_utf16().count() > LONG_MESSAGE_CHARS {
        LONG_AUTO_HIDE
    } else {
        SHORT_AUTO_HIDE
    }
}

/// Format an error the way it is shown to the user
pub fn error_message(err: &PortalError) -> String {
    format!("{}: {}", err.name(), err.summary())
}

/// Shared handle to the alert slot. Cloning shares the same slot.
#[derive(Clone)]
pub struct AlertChannel {
    state_tx: Arc<watch::Sender<AlertState>>,
    timer: TimerSlot,
}

impl AlertChannel {
    pub fn new() -> Self {
        let (state_tx, _rx) = watch::channel(AlertState::default());
        Self {
            state_tx: Arc::new(state_tx),
            timer: TimerSlot::new(),
        }
    }

    /// Current alert
    pub fn state(&self) -> AlertState {
        self.state_tx.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.state_tx.subscribe()
    }

    /// Replace the current alert. Must be called inside a tokio runtime.
    ///
    /// An empty message just closes the surface.
    pub fn publish(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        let hide_after = auto_hide_duration(&message);
        tracing::debug!("Alert published ({}): {}", severity, message);

        let state = AlertState {
            message,
            severity,
            is_open: false,
        };
        if state.message.is_empty() {
            self.timer.clear(|| {
                self.state_tx.send_replace(state);
            });
            return;
        }

        let state_tx = Arc::clone(&self.state_tx);
        self.timer.replace(
            || {
                self.state_tx.send_replace(state);
            },
            |ticket| {
                TaskHandle::spawn(move |_| async move {
                    tokio::time::sleep(OPEN_DELAY).await;
                    let opened = ticket.run_if_current(|| {
                        state_tx.send_modify(|state| state.is_open = true)
                    });
                    if opened.is_none() {
                        return;
                    }

                    tokio::time::sleep(hide_after).await;
                    ticket.run_if_current(|| state_tx.send_modify(|state| state.is_open = false));
                })
            },
        );
    }

    /// Publish an error with severity `error`
    pub fn publish_error(&self, err: &PortalError) {
        self.publish(error_message(err), Severity::Error);
    }

    /// Hide the alert, keeping its message and severity
    pub fn dismiss(&self) {
        self.timer.clear(|| {
            self.state_tx.send_if_modified(|state| {
                let was_open = state.is_open;
                state.is_open = false;
                was_open
            })
        });
    }

    /// Close request from the surface. Click-away is ignored.
    pub fn close(&self, reason: CloseReason) {
        if reason == CloseReason::ClickAway {
            return;
        }
        self.dismiss();
    }

    /// Last-resort sink for failures nobody handled
    pub fn report_unhandled(&self, err: &PortalError) {
        tracing::error!("Unhandled failure: {:?}", err);
        self.publish(
            format!(
                "Unhandled Rejection occurred - {}: {}",
                err.name(),
                err.summary()
            ),
            Severity::Error,
        );
    }

    /// Forward a background task's error or panic to [`Self::report_unhandled`]
    pub fn watch_task(&self, handle: JoinHandle<Result<()>>) -> JoinHandle<()> {
        let channel = self.clone();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => channel.report_unhandled(&err),
                Err(join_err) if join_err.is_panic() => {
                    channel.report_unhandled(&PortalError::Task("task panicked".into()))
                }
                Err(_) => {}
            }
        })
    }

    /// Spawn a fallible task whose failure ends up in this channel
    pub fn spawn_reported<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.watch_task(tokio::spawn(future))
    }

    /// Cancel pending timers
    pub fn shutdown(&self) {
        self.timer.clear(|| ());
    }
}

impl Default for AlertChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_alert_lifecycle() {
        let alerts = AlertChannel::new();
        alerts.publish("error msg", Severity::Error);

        let state = alerts.state();
        assert!(!state.is_open);
        assert_eq!(state.message, "error msg");
        assert_eq!(state.severity, Severity::Error);

        sleep(ms(249)).await;
        assert!(!alerts.state().is_open);

        sleep(ms(2)).await;
        assert!(alerts.state().is_open);

        sleep(ms(4997)).await; // t = 5248
        assert!(alerts.state().is_open);

        sleep(ms(3)).await; // t = 5251
        let state = alerts.state();
        assert!(!state.is_open);
        assert_eq!(state.message, "error msg");
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_alert_stays_ten_seconds() {
        let alerts = AlertChannel::new();
        let long_message = "x".repeat(60);
        alerts.publish(long_message.clone(), Severity::Warning);

        sleep(ms(5251)).await;
        assert!(alerts.state().is_open);

        sleep(ms(4998)).await; // t = 10249
        assert!(alerts.state().is_open);

        sleep(ms(2)).await; // t = 10251
        assert!(!alerts.state().is_open);
    }

    #[test]
    fn test_auto_hide_threshold() {
        assert_eq!(auto_hide_duration(&"a".repeat(50)), SHORT_AUTO_HIDE);
        assert_eq!(auto_hide_duration(&"a".repeat(51)), LONG_AUTO_HIDE);
        assert_eq!(auto_hide_duration(""), SHORT_AUTO_HIDE);
        // 26 characters, 52 UTF-16 units
        assert_eq!(auto_hide_duration(&"\u{1F600}".repeat(26)), LONG_AUTO_HIDE);
        assert_eq!(auto_hide_duration(&"\u{e9}".repeat(50)), SHORT_AUTO_HIDE);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replacement_is_never_opened_early() {
        let alerts = AlertChannel::new();
        for round in 0..8 {
            alerts.publish(format!("old {}", round), Severity::Error);
            sleep(OPEN_DELAY).await;
            alerts.publish(format!("new {}", round), Severity::Error);

            let state = alerts.state();
            assert_eq!(state.message, format!("new {}", round));
            assert!(!state.is_open);

            sleep(ms(100)).await;
            assert!(!alerts.state().is_open, "round {} opened early", round);
        }
        alerts.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_into_latest() {
        let alerts = AlertChannel::new();

        alerts.publish("first", Severity::Error);
        sleep(ms(100)).await;
        alerts.publish("second", Severity::Error);
        sleep(ms(200)).await; // first would have opened at 250

        let state = alerts.state();
        assert!(!state.is_open);
        assert_eq!(state.message, "second");

        sleep(ms(51)).await; // second opens at 350
        let state = alerts.state();
        assert!(state.is_open);
        assert_eq!(state.message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_while_open_resets_delay() {
        let alerts = AlertChannel::new();
        alerts.publish("first", Severity::Info);
        sleep(ms(1000)).await;
        assert!(alerts.state().is_open);

        alerts.publish("second", Severity::Success);
        assert!(!alerts.state().is_open);

        sleep(ms(251)).await;
        let state = alerts.state();
        assert!(state.is_open);
        assert_eq!(state.severity, Severity::Success);

        // first's auto-hide (t = 5250) must not close the replacement
        sleep(ms(4100)).await; // t = 5351
        assert!(alerts.state().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_keeps_content() {
        let alerts = AlertChannel::new();
        alerts.publish("saved", Severity::Success);
        sleep(ms(300)).await;

        alerts.dismiss();
        let state = alerts.state();
        assert!(!state.is_open);
        assert_eq!(state.message, "saved");
        assert_eq!(state.severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_away_is_ignored() {
        let alerts = AlertChannel::new();
        alerts.publish("stay", Severity::Info);
        sleep(ms(300)).await;

        alerts.close(CloseReason::ClickAway);
        assert!(alerts.state().is_open);

        alerts.close(CloseReason::Dismissed);
        assert!(!alerts.state().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_message_closes() {
        let alerts = AlertChannel::new();
        alerts.publish("something", Severity::Info);
        sleep(ms(300)).await;

        alerts.publish("", Severity::Info);
        sleep(ms(300)).await;
        assert!(!alerts.state().is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_error_format() {
        let alerts = AlertChannel::new();
        alerts.publish_error(&PortalError::Connection("localhost:5000".into()));
        let state = alerts.state();
        assert_eq!(state.severity, Severity::Error);
        assert_eq!(
            state.message,
            "ConnectionError: Could not connect to the server: localhost:5000"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_task_reaches_backstop() {
        let alerts = AlertChannel::new();
        let watcher =
            alerts.spawn_reported(async { Err::<(), _>(PortalError::Timeout("GET /books".into())) });
        watcher.await.unwrap();

        let state = alerts.state();
        assert_eq!(state.severity, Severity::Error);
        assert!(state
            .message
            .starts_with("Unhandled Rejection occurred - TimeoutError: The request timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_task_is_silent() {
        let alerts = AlertChannel::new();
        alerts.spawn_reported(async { Ok::<(), PortalError>(()) }).await.unwrap();
        assert_eq!(alerts.state(), AlertState::default());
    }
}
