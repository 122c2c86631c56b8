//! Deferred and recurring callback scheduling

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::AbortHandle,
    time::{interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::debug;

/// A callback run once after a delay
pub type OnceTask = Box<dyn FnOnce() + Send + 'static>;
/// A callback run on every period of a recurring timer
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Capability to run callbacks later.
///
/// Both operations return a [`TimerHandle`]; once the handle is cancelled
/// the callback never runs again, even if its timer already expired.
/// Callbacks never run inside the scheduling call itself.
pub trait Scheduler: fmt::Debug + Send + Sync {
    /// Run `task` once, `delay` after this call.
    fn once(&self, delay: Duration, task: OnceTask) -> TimerHandle;

    /// Run `task` every `period`, the first run one period after this call.
    fn every(&self, period: Duration, task: RepeatingTask) -> TimerHandle;
}

/// Cancelable handle to a scheduled callback
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl TimerHandle {
    fn with_abort(cancelled: Arc<AtomicBool>, abort: AbortHandle) -> Self {
        Self {
            cancelled,
            abort,
        }
    }

    /// Cancel the callback. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.abort.abort();
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler backed by tasks on a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Create a scheduler spawning onto the given runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler for the runtime this call runs on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn once(&self, delay: Duration, task: OnceTask) -> TimerHandle {
        // The deadline is fixed now, not when the task is first polled
        let deadline = Instant::now() + delay;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let join = self.handle.spawn(async move {
            sleep_until(deadline).await;
            if cancelled.load(Ordering::SeqCst) {
                debug!("Skipping cancelled one-shot timer");
                return;
            }
            task();
        });

        TimerHandle::with_abort(flag, join.abort_handle())
    }

    fn every(&self, period: Duration, mut task: RepeatingTask) -> TimerHandle {
        let start = Instant::now() + period;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let join = self.handle.spawn(async move {
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if cancelled.load(Ordering::SeqCst) {
                    debug!("Stopping cancelled recurring timer");
                    break;
                }
                task();
            }
        });

        TimerHandle::with_abort(flag, join.abort_handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (Arc::clone(&count), count)
    }

    #[tokio::test(start_paused = true)]
    async fn once_runs_after_delay() {
        let scheduler = TokioScheduler::current();
        let (count, seen) = counter();

        scheduler.once(
            Duration::from_millis(500),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        sleep(Duration::from_millis(499)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_once_never_runs() {
        let scheduler = TokioScheduler::current();
        let (count, seen) = counter();

        let handle = scheduler.once(
            Duration::from_millis(100),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );
        handle.cancel();
        assert!(handle.is_cancelled());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn every_first_fires_after_one_period() {
        let scheduler = TokioScheduler::current();
        let (count, seen) = counter();

        let handle = scheduler.every(
            Duration::from_secs(1),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        sleep(Duration::from_millis(999)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2_002)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);

        handle.cancel();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
