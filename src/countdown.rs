//! Countdown timer
//!
//! A single process-wide countdown towards an absolute deadline, ticking once
//! per second while running.
//!
//! ```text
//! Idle ──start──▶ Running ──distance <= 0──▶ Expired
//!                   │  ▲
//!                stop  start (replaces the running timer)
//!                   ▼  │
//!                 Stopped
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::alert::CloseReason;
use crate::core::schedule::{spawn_repeating, TimerSlot};
use crate::routes::Route;

/// Tick period
pub const TICK: Duration = Duration::from_secs(1);

/// Remaining time at or below which the countdown is in warning state
pub const WARNING_THRESHOLD_MS: i64 = 10_000;

/// Longest accepted countdown; later deadlines are clamped to it
pub const MAX_DURATION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Expired,
    Stopped,
}

/// Snapshot of the countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    /// Wall-clock deadline of the last start
    pub target: Option<DateTime<Utc>>,
    /// `"{h}h {m}m {s}s"`
    pub remaining_text: String,
    pub is_warning: bool,
    pub is_expired: bool,
    /// Whether the countdown surface is shown
    pub is_open: bool,
    /// Page the surface links to
    pub navigation_target: Route,
    pub phase: CountdownPhase,
}

impl Default for CountdownState {
    fn default() -> Self {
        Self {
            target: None,
            remaining_text: String::new(),
            is_warning: false,
            is_expired: false,
            is_open: false,
            navigation_target: Route::Home,
            phase: CountdownPhase::Idle,
        }
    }
}

/// Format a positive distance in milliseconds. Hours wrap at 24.
pub fn format_remaining(distance_ms: i64) -> String {
    let distance = distance_ms.max(0);
    let hours = (distance % 86_400_000) / 3_600_000;
    let minutes = (distance % 3_600_000) / 60_000;
    let seconds = (distance % 60_000) / 1000;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Signed milliseconds from now until `deadline`
fn millis_until(deadline: Instant) -> i64 {
    let now = Instant::now();
    if deadline >= now {
        (deadline - now).as_millis() as i64
    } else {
        -((now - deadline).as_millis() as i64)
    }
}

/// `now + duration`, saturating at [`MAX_DURATION`]
fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(duration)
        .or_else(|| now.checked_add(MAX_DURATION))
        .unwrap_or(now)
}

/// One second's update. Breaks once the deadline has passed.
fn tick(state_tx: &watch::Sender<CountdownState>, deadline: Instant) -> ControlFlow<()> {
    let distance = millis_until(deadline);
    let mut flow = ControlFlow::Continue(());

    state_tx.send_modify(|state| {
        state.is_expired = false;
        if distance <= 0 {
            state.is_open = false;
            state.is_warning = false;
            state.is_expired = true;
            state.phase = CountdownPhase::Expired;
            flow = ControlFlow::Break(());
            return;
        }
        state.is_warning = distance <= WARNING_THRESHOLD_MS;
        state.remaining_text = format_remaining(distance);
    });

    if flow.is_break() {
        tracing::debug!("Countdown expired");
    }
    flow
}

/// Shared handle to the countdown. Cloning shares the same countdown.
#[derive(Clone)]
pub struct CountdownTimer {
    state_tx: Arc<watch::Sender<CountdownState>>,
    task: TimerSlot,
}

impl CountdownTimer {
    pub fn new() -> Self {
        let (state_tx, _rx) = watch::channel(CountdownState::default());
        Self {
            state_tx: Arc::new(state_tx),
            task: TimerSlot::new(),
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state_tx.borrow().phase == CountdownPhase::Running
    }

    /// Start counting down to a wall-clock deadline.
    ///
    /// The deadline is pinned to the monotonic clock once, here. Deadlines
    /// further out than [`MAX_DURATION`] are clamped.
    pub fn start(&self, target: DateTime<Utc>, navigation_target: Route) {
        let remaining = (target - Utc::now()).num_milliseconds().max(0) as u64;
        let duration = Duration::from_millis(remaining).min(MAX_DURATION);
        self.start_at(deadline_after(duration), Some(target), navigation_target);
    }

    /// Start counting down `duration` from now, clamped to [`MAX_DURATION`]
    pub fn start_in(&self, duration: Duration, navigation_target: Route) {
        let duration = duration.min(MAX_DURATION);
        let target = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d));
        self.start_at(deadline_after(duration), target, navigation_target);
    }

    fn start_at(&self, deadline: Instant, target: Option<DateTime<Utc>>, navigation_target: Route) {
        let state_tx = Arc::clone(&self.state_tx);
        self.task.replace(
            || {
                self.state_tx.send_modify(|state| {
                    state.target = target;
                    state.remaining_text = format_remaining(millis_until(deadline));
                    state.is_warning = false;
                    state.is_expired = false;
                    state.is_open = true;
                    state.navigation_target = navigation_target;
                    state.phase = CountdownPhase::Running;
                });
            },
            |ticket| {
                spawn_repeating(TICK, move || {
                    ticket
                        .run_if_current(|| tick(&state_tx, deadline))
                        .unwrap_or(ControlFlow::Break(()))
                })
            },
        );
        tracing::debug!("Countdown started, target = {:?}", target);
    }

    /// Cancel ticking. Displayed values are left as they are.
    pub fn stop(&self) {
        self.task.clear(|| {
            self.state_tx
                .send_modify(|state| state.phase = CountdownPhase::Stopped);
        });
    }

    /// Hide the surface without stopping the timer. Click-away is ignored.
    pub fn close(&self, reason: CloseReason) {
        if reason == CloseReason::ClickAway {
            return;
        }
        self.state_tx.send_modify(|state| state.is_open = false);
    }

    /// Clear the expired flag once the consumer has reacted to it
    pub fn acknowledge_expiry(&self) {
        self.state_tx.send_modify(|state| state.is_expired = false);
    }

    /// Cancel the tick task without touching state
    pub fn shutdown(&self) {
        self.task.clear(|| ());
    }
}

impl Default for CountdownTimer {
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

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "0h 0m 0s");
        assert_eq!(format_remaining(999), "0h 0m 0s");
        assert_eq!(format_remaining(3_599_999), "0h 59m 59s");
        assert_eq!(format_remaining(3_723_000), "1h 2m 3s");
        // one day, one hour, one minute, one second: hours wrap at 24
        assert_eq!(format_remaining(90_061_000), "1h 1m 1s");
        assert_eq!(format_remaining(-5), "0h 0m 0s");
    }

    #[test]
    fn test_initial_state() {
        let state = CountdownState::default();
        assert_eq!(state.phase, CountdownPhase::Idle);
        assert_eq!(state.navigation_target, Route::Home);
        assert!(!state.is_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_on_fifth_tick() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(5000), Route::ShortQuiz);

        let state = countdown.state();
        assert!(state.is_open);
        assert_eq!(state.phase, CountdownPhase::Running);
        assert_eq!(state.navigation_target, Route::ShortQuiz);

        sleep(ms(1001)).await;
        assert_eq!(countdown.state().remaining_text, "0h 0m 4s");

        sleep(ms(3000)).await; // four ticks
        let state = countdown.state();
        assert!(!state.is_expired);
        assert_eq!(state.phase, CountdownPhase::Running);
        assert_eq!(state.remaining_text, "0h 0m 1s");

        sleep(ms(1000)).await; // fifth tick
        let state = countdown.state();
        assert!(state.is_expired);
        assert!(!state.is_warning);
        assert!(!state.is_open);
        assert_eq!(state.phase, CountdownPhase::Expired);
        assert_eq!(state.remaining_text, "0h 0m 1s");

        let mut rx = countdown.subscribe();
        rx.borrow_and_update();
        sleep(ms(5000)).await;
        assert!(!rx.has_changed().unwrap(), "ticked after expiry");
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_threshold() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(15_000), Route::ShortQuiz);

        sleep(ms(4001)).await; // distance 11000
        assert!(!countdown.state().is_warning);

        sleep(ms(1000)).await; // distance 10000
        assert!(countdown.state().is_warning);

        sleep(ms(9000)).await; // distance 1000
        let state = countdown.state();
        assert!(state.is_warning);
        assert!(!state.is_expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_clock_target() {
        let countdown = CountdownTimer::new();
        countdown.start(Utc::now() + chrono::Duration::seconds(3), Route::Home);

        sleep(ms(2001)).await;
        assert_eq!(countdown.state().phase, CountdownPhase::Running);

        sleep(ms(1000)).await;
        assert!(countdown.state().is_expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_target_expires_on_first_tick() {
        let countdown = CountdownTimer::new();
        countdown.start(Utc::now() - chrono::Duration::seconds(30), Route::Home);
        assert_eq!(countdown.state().remaining_text, "0h 0m 0s");

        sleep(ms(1001)).await;
        assert!(countdown.state().is_expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_keeps_values() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(10_000), Route::QuestionBank);
        sleep(ms(2500)).await;

        countdown.stop();
        let stopped = countdown.state();
        assert_eq!(stopped.phase, CountdownPhase::Stopped);
        assert_eq!(stopped.remaining_text, "0h 0m 8s");
        assert!(stopped.is_open);

        sleep(ms(10_000)).await;
        let later = countdown.state();
        assert_eq!(later, stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_running_timer() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(100_000), Route::Home);
        sleep(ms(1500)).await;

        countdown.start_in(ms(3000), Route::PdfBooks);
        sleep(ms(1001)).await;
        assert_eq!(countdown.state().remaining_text, "0h 0m 2s");

        sleep(ms(2000)).await;
        let state = countdown.state();
        assert!(state.is_expired);
        assert_eq!(state.navigation_target, Route::PdfBooks);

        // The replaced timer must not wake up and overwrite anything
        sleep(ms(5000)).await;
        assert_eq!(countdown.state(), state);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_ignores_click_away() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(60_000), Route::Home);

        countdown.close(CloseReason::ClickAway);
        assert!(countdown.state().is_open);

        countdown.close(CloseReason::Dismissed);
        assert!(!countdown.state().is_open);
        assert!(countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_expiry() {
        let countdown = CountdownTimer::new();
        countdown.start_in(ms(1000), Route::Home);
        sleep(ms(1001)).await;
        assert!(countdown.state().is_expired);

        countdown.acknowledge_expiry();
        assert!(!countdown.state().is_expired);
        assert_eq!(countdown.state().phase, CountdownPhase::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_duration_is_clamped() {
        let countdown = CountdownTimer::new();
        countdown.start_in(Duration::from_secs(u64::MAX), Route::Home);

        let state = countdown.state();
        assert_eq!(state.phase, CountdownPhase::Running);
        assert!(state.is_open);
        assert!(state.target.is_some());

        sleep(ms(3001)).await;
        let state = countdown.state();
        assert_eq!(state.phase, CountdownPhase::Running);
        assert!(!state.is_warning);
        assert!(!state.is_expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_far_wall_clock_target_is_clamped() {
        let countdown = CountdownTimer::new();
        countdown.start(DateTime::<Utc>::MAX_UTC, Route::Home);
        sleep(ms(1001)).await;
        assert_eq!(countdown.state().phase, CountdownPhase::Running);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_restart_at_tick_boundary_is_not_expired_by_old_timer() {
        let countdown = CountdownTimer::new();
        for _ in 0..3 {
            countdown.start_in(ms(1000), Route::Home);
            sleep(ms(1000)).await;
            countdown.start_in(ms(60_000), Route::Profile);

            sleep(ms(100)).await;
            let state = countdown.state();
            assert_eq!(state.phase, CountdownPhase::Running);
            assert!(!state.is_expired);
            assert!(state.is_open);
            assert_eq!(state.navigation_target, Route::Profile);
        }
        countdown.shutdown();
    }
}
