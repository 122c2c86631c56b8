//! Progress bars that jump to their target after a start delay

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Notifier;
use crate::{
    runtime::{Scheduler, TimerHandle},
    utils::lock,
};

/// Observable state of one progress bar.
///
/// `displayed` is the endpoint the renderer eases towards: 0 before the
/// track starts, `target` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTrack {
    pub target: u8,
    pub displayed: u8,
    pub started: bool,
}

impl ProgressTrack {
    fn new(target: u8) -> Self {
        Self {
            target: target.min(100),
            displayed: 0,
            started: false,
        }
    }
}

#[derive(Debug)]
struct ProgressInner {
    track: Mutex<ProgressTrack>,
    delay: Duration,
    scheduler: Arc<dyn Scheduler>,
    pending: Mutex<Option<TimerHandle>>,
    cancelled: AtomicBool,
    notifier: Notifier,
}

impl ProgressInner {
    fn begin(self: &Arc<Self>) {
        if self.cancelled.load(Ordering::SeqCst) {
            debug!("Begin on cancelled progress track ignored");
            return;
        }
        if lock(&self.track).started {
            return;
        }

        let mut pending = lock(&self.pending);
        if pending.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        *pending = Some(self.scheduler.once(
            self.delay,
            Box::new(move || match weak.upgrade() {
                Some(inner) => inner.complete(),
                None => debug!("Progress start after teardown ignored"),
            }),
        ));
    }

    fn complete(&self) {
        if self.cancelled.load(Ordering::SeqCst) {
            debug!("Progress start after cancel ignored");
            return;
        }

        let mut track = lock(&self.track);
        if track.started {
            return;
        }
        track.started = true;
        track.displayed = track.target;
        let target = track.target;
        drop(track);

        lock(&self.pending).take();
        info!("Progress track started: target={}%", target);
        self.notifier.notify();
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = lock(&self.pending).take() {
            handle.cancel();
        }
    }
}

/// Animated progress bar: 0 until begun, then `target` once the start
/// delay has elapsed.
#[derive(Debug)]
pub struct ProgressAnimator {
    inner: Arc<ProgressInner>,
}

impl ProgressAnimator {
    /// Create an unstarted track. Targets above 100 are clamped.
    pub fn new(
        target: u8,
        delay: Duration,
        scheduler: Arc<dyn Scheduler>,
        notifier: Notifier,
    ) -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                track: Mutex::new(ProgressTrack::new(target)),
                delay,
                scheduler,
                pending: Mutex::new(None),
                cancelled: AtomicBool::new(false),
                notifier,
            }),
        }
    }

    /// Schedule the jump to `target` after the start delay.
    ///
    /// Calling again while pending or after the track started does nothing.
    pub fn begin(&self) {
        self.inner.begin();
    }

    /// Cancel a pending start; the track keeps its current values forever
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Weak handle that can begin this track from another component
    pub fn starter(&self) -> ProgressStarter {
        ProgressStarter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn track(&self) -> ProgressTrack {
        *lock(&self.inner.track)
    }

    pub fn displayed(&self) -> u8 {
        self.track().displayed
    }

    pub fn target(&self) -> u8 {
        self.track().target
    }
}

impl Drop for ProgressAnimator {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

/// Non-owning trigger for a [`ProgressAnimator`].
///
/// Beginning through a starter whose animator was dropped does nothing.
#[derive(Debug, Clone)]
pub struct ProgressStarter {
    inner: Weak<ProgressInner>,
}

impl ProgressStarter {
    pub fn begin(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.begin();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TokioScheduler;
    use tokio::time::sleep;

    fn animator(target: u8, delay_ms: u64) -> ProgressAnimator {
        ProgressAnimator::new(
            target,
            Duration::from_millis(delay_ms),
            Arc::new(TokioScheduler::current()),
            Notifier::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn jumps_to_target_after_delay() {
        let bar = animator(67, 500);
        assert_eq!(bar.displayed(), 0);

        bar.begin();
        sleep(Duration::from_millis(499)).await;
        assert_eq!(bar.displayed(), 0);
        assert!(!bar.track().started);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(bar.displayed(), 67);
        assert!(bar.track().started);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_begin_is_idempotent() {
        let notifier = Notifier::new();
        let bar = ProgressAnimator::new(
            40,
            Duration::from_millis(200),
            Arc::new(TokioScheduler::current()),
            notifier.clone(),
        );

        bar.begin();
        sleep(Duration::from_millis(100)).await;
        bar.begin();
        sleep(Duration::from_millis(150)).await;
        assert_eq!(bar.displayed(), 40);
        assert_eq!(notifier.revision(), 1);

        bar.begin();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(bar.displayed(), 40);
        assert_eq!(notifier.revision(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_delay_prevents_write() {
        let bar = animator(75, 300);
        bar.begin();
        sleep(Duration::from_millis(100)).await;
        bar.cancel();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(bar.track(), ProgressTrack::new(75));

        bar.begin();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(bar.displayed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn starter_outliving_animator_is_noop() {
        let bar = animator(10, 0);
        let starter = bar.starter();
        drop(bar);
        starter.begin();
        sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn target_is_clamped_to_hundred() {
        let bar = animator(250, 0);
        assert_eq!(bar.target(), 100);
        bar.starter().begin();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(bar.displayed(), 100);
    }
}
