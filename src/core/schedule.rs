//! Cancellable scheduled tasks
//!
//! Timers used by the alert and countdown surfaces. Every task is owned by a
//! [`TaskHandle`]; dropping or cancelling the handle stops the task.
//!
//! Aborting does not reach a task that is already past its last await on
//! another worker, so replaceable timers live in a [`TimerSlot`]. The slot
//! bumps a generation under its lock on every replace or clear, and a task
//! only publishes through a [`SlotTicket`] whose generation is still current.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Explicit cancellation flag shared between a handle and its task
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owning handle for a spawned timer task
#[derive(Debug)]
pub struct TaskHandle {
    token: CancelToken,
    task: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn a future whose lifetime is bound to the returned handle.
    ///
    /// The future receives the handle's token and should check it before
    /// publishing any state.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancelToken::new();
        let task = tokio::spawn(f(token.clone()));
        Self { token, task }
    }

    /// Cancel the task. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the task has returned or was aborted
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `tick` every `period`, first call one full period from now.
///
/// The task ends when `tick` returns `ControlFlow::Break` or the handle is
/// cancelled.
pub fn spawn_repeating<F>(period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let first = Instant::now() + period;
    TaskHandle::spawn(move |token| async move {
        let mut ticker = interval_at(first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if token.is_cancelled() {
                break;
            }
            if tick().is_break() {
                break;
            }
        }
    })
}

/// Run `f` once after `delay`, unless cancelled first
pub fn spawn_delayed<F>(delay: Duration, f: F) -> TaskHandle
where
    F: FnOnce() + Send + 'static,
{
    TaskHandle::spawn(move |token| async move {
        tokio::time::sleep(delay).await;
        if !token.is_cancelled() {
            f();
        }
    })
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    task: Option<TaskHandle>,
}

/// Holder for at most one replaceable timer task
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    inner: Arc<Mutex<SlotInner>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Retire the current task, run `publish` and install the task built by
    /// `spawn`. Everything happens under the slot's lock.
    pub fn replace<P, S>(&self, publish: P, spawn: S)
    where
        P: FnOnce(),
        S: FnOnce(SlotTicket) -> TaskHandle,
    {
        let mut inner = self.lock();
        let generation = retire(&mut inner);
        publish();
        let ticket = SlotTicket {
            inner: Arc::downgrade(&self.inner),
            generation,
        };
        inner.task = Some(spawn(ticket));
    }

    /// Retire the current task and run `publish` under the slot's lock
    pub fn clear<R>(&self, publish: impl FnOnce() -> R) -> R {
        let mut inner = self.lock();
        retire(&mut inner);
        publish()
    }

    /// Run `f` under the slot's lock without retiring anything
    pub fn locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let _inner = self.lock();
        f()
    }

    /// Whether a task is installed
    pub fn is_occupied(&self) -> bool {
        self.lock().task.is_some()
    }
}

fn retire(inner: &mut SlotInner) -> u64 {
    inner.generation = inner.generation.wrapping_add(1);
    if let Some(task) = inner.task.take() {
        task.cancel();
    }
    inner.generation
}

/// A task's permission to publish, valid until its slot is replaced or cleared
#[derive(Debug, Clone)]
pub struct SlotTicket {
    inner: Weak<Mutex<SlotInner>>,
    generation: u64,
}

impl SlotTicket {
    /// Run `f` under the slot's lock if this ticket is still current.
    ///
    /// Returns `None` once the slot was replaced, cleared or dropped.
    pub fn run_if_current<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let inner = self.inner.upgrade()?;
        let guard = inner.lock().unwrap_or_else(|e| e.into_inner());
        if guard.generation != self.generation {
            return None;
        }
        Some(f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_repeating_first_tick_after_one_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _handle = spawn_repeating(Duration::from_secs(1), move || {
            c.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_stops_on_break() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = spawn_repeating(Duration::from_secs(1), move || {
            if c.fetch_add(1, Ordering::SeqCst) + 1 >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = spawn_repeating(Duration::from_secs(1), move || {
            c.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_cancel_before_fire() {
        let fired = Arc::new(AtomicBool::new(false));
        let f = fired.clone();
        let handle = spawn_delayed(Duration::from_millis(250), move || {
            f.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_replaced_ticket_cannot_publish() {
        let slot = TimerSlot::new();
        let mut first = None;
        slot.replace(
            || {},
            |ticket| {
                first = Some(ticket);
                TaskHandle::spawn(|_| async {})
            },
        );
        let first = first.unwrap();
        assert_eq!(first.run_if_current(|| 0), Some(0));
        assert!(slot.is_occupied());

        let mut second = None;
        slot.replace(
            || {},
            |ticket| {
                second = Some(ticket);
                TaskHandle::spawn(|_| async {})
            },
        );
        assert_eq!(first.run_if_current(|| 1), None);
        assert_eq!(second.unwrap().run_if_current(|| 2), Some(2));
    }

    #[tokio::test]
    async fn test_cleared_or_dropped_slot_invalidates_ticket() {
        let slot = TimerSlot::new();
        let mut ticket = None;
        slot.replace(
            || {},
            |t| {
                ticket = Some(t);
                TaskHandle::spawn(|_| async {})
            },
        );
        let ticket = ticket.unwrap();
        assert_eq!(slot.clear(|| "cleared"), "cleared");
        assert!(!slot.is_occupied());
        assert_eq!(ticket.run_if_current(|| ()), None);

        let other = TimerSlot::new();
        let mut orphan = None;
        other.replace(
            || {},
            |t| {
                orphan = Some(t);
                TaskHandle::spawn(|_| async {})
            },
        );
        drop(other);
        assert_eq!(orphan.unwrap().run_if_current(|| ()), None);
    }
}
