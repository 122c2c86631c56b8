//! Scroll-triggered staggered reveal of list items

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Notifier;
use crate::{
    runtime::{ContainerId, Observation, Scheduler, TimerHandle, Viewport},
    utils::lock,
};

/// Static parameters of a reveal sequence
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    /// Container whose visibility starts the sequence
    pub container: ContainerId,
    /// Number of items revealed in order
    pub items: usize,
    /// Offset between consecutive items; item `i` activates `i * item_delay`
    /// after the trigger
    pub item_delay: Duration,
    /// Visible fraction of the container that triggers the sequence
    pub threshold: f64,
}

impl RevealConfig {
    pub fn new(container: impl Into<String>, items: usize, item_delay_ms: u64, threshold: f64) -> Self {
        Self {
            container: ContainerId::new(container),
            items,
            item_delay: Duration::from_millis(item_delay_ms),
            threshold,
        }
    }

    /// Activation offset of item `index`, measured from the trigger
    pub fn offset(&self, index: usize) -> Duration {
        self.item_delay
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// Lifecycle of a sequencer; `Triggered` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    Dormant,
    Triggered,
}

#[derive(Debug)]
struct RevealState {
    phase: RevealPhase,
    activated: Vec<bool>,
}

type TriggerHook = Box<dyn FnOnce() + Send + 'static>;

struct RevealInner {
    config: RevealConfig,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<RevealState>,
    timers: Mutex<Vec<TimerHandle>>,
    observation: Mutex<Option<Observation>>,
    on_trigger: Mutex<Option<TriggerHook>>,
    cancelled: AtomicBool,
    notifier: Notifier,
}

impl RevealInner {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn trigger(self: &Arc<Self>) {
        if self.is_cancelled() {
            debug!("Trigger for {} after cancel ignored", self.config.container);
            return;
        }

        {
            let mut state = lock(&self.state);
            if state.phase == RevealPhase::Triggered {
                return;
            }
            state.phase = RevealPhase::Triggered;
        }

        // Ends the observation session; the guard is dropped outside the lock
        let observation = lock(&self.observation).take();
        drop(observation);

        info!(
            "Reveal triggered for {}: {} items every {}ms",
            self.config.container,
            self.config.items,
            self.config.item_delay.as_millis()
        );

        let handles: Vec<TimerHandle> = (0..self.config.items)
            .map(|index| {
                let weak: Weak<RevealInner> = Arc::downgrade(self);
                self.scheduler.once(
                    self.config.offset(index),
                    Box::new(move || match weak.upgrade() {
                        Some(inner) => inner.activate(index),
                        None => debug!("Reveal of item {} after teardown ignored", index),
                    }),
                )
            })
            .collect();
        lock(&self.timers).extend(handles);

        let hook = lock(&self.on_trigger).take();
        if let Some(hook) = hook {
            hook();
        }

        self.notifier.notify();
    }

    fn activate(&self, index: usize) {
        if self.is_cancelled() {
            debug!("Reveal of {}[{}] after cancel ignored", self.config.container, index);
            return;
        }

        let mut state = lock(&self.state);
        match state.activated.get_mut(index) {
            Some(flag) if !*flag => *flag = true,
            _ => return,
        }
        drop(state);

        debug!("Revealed {}[{}]", self.config.container, index);
        self.notifier.notify();
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);

        let observation = lock(&self.observation).take();
        drop(observation);

        let timers: Vec<TimerHandle> = lock(&self.timers).drain(..).collect();
        for timer in &timers {
            timer.cancel();
        }

        let hook = lock(&self.on_trigger).take();
        drop(hook);
    }
}

/// Reveals the items of one container in index order once the container
/// scrolls into view.
///
/// A sequencer triggers at most once. Dropping it (or calling
/// [`cancel`](Self::cancel)) unregisters its observation and cancels every
/// pending activation; a remounted container needs a fresh sequencer.
pub struct RevealSequencer {
    inner: Arc<RevealInner>,
}

impl RevealSequencer {
    /// Create a dormant sequencer. Nothing is observed until
    /// [`observe`](Self::observe).
    pub fn new(config: RevealConfig, scheduler: Arc<dyn Scheduler>, notifier: Notifier) -> Self {
        let activated = vec![false; config.items];
        Self {
            inner: Arc::new(RevealInner {
                config,
                scheduler,
                state: Mutex::new(RevealState {
                    phase: RevealPhase::Dormant,
                    activated,
                }),
                timers: Mutex::new(Vec::new()),
                observation: Mutex::new(None),
                on_trigger: Mutex::new(None),
                cancelled: AtomicBool::new(false),
                notifier,
            }),
        }
    }

    /// Run `hook` once, at the moment the sequence triggers
    pub fn with_on_trigger(self, hook: impl FnOnce() + Send + 'static) -> Self {
        *lock(&self.inner.on_trigger) = Some(Box::new(hook));
        self
    }

    /// Start observing the container.
    ///
    /// Without viewport support the sequence triggers immediately so content
    /// is never stuck hidden. Observing twice does nothing.
    pub fn observe(&self, viewport: &dyn Viewport) {
        if self.inner.is_cancelled() || self.is_triggered() || lock(&self.inner.observation).is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let on_enter = Box::new(move || match weak.upgrade() {
            Some(inner) => inner.trigger(),
            None => debug!("Viewport entry after teardown ignored"),
        });

        match viewport.observe(&self.inner.config.container, self.inner.config.threshold, on_enter) {
            Ok(observation) => {
                // May already have fired while registering
                if !self.is_triggered() && !self.inner.is_cancelled() {
                    debug!(
                        "Observing {} at threshold {:.2}",
                        self.inner.config.container, self.inner.config.threshold
                    );
                    *lock(&self.inner.observation) = Some(observation);
                }
            }
            Err(e) => {
                warn!("{}; revealing {} immediately", e, self.inner.config.container);
                self.inner.trigger();
            }
        }
    }

    /// Trigger the sequence directly, as if the container became visible
    pub fn trigger(&self) {
        self.inner.trigger();
    }

    /// Unregister the observation and cancel all pending activations
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn phase(&self) -> RevealPhase {
        lock(&self.inner.state).phase
    }

    pub fn is_triggered(&self) -> bool {
        self.phase() == RevealPhase::Triggered
    }

    /// Whether item `index` has been revealed
    pub fn is_activated(&self, index: usize) -> bool {
        lock(&self.inner.state).activated.get(index).copied().unwrap_or(false)
    }

    /// Activation flags of all items in index order
    pub fn activated(&self) -> Vec<bool> {
        lock(&self.inner.state).activated.clone()
    }
}

impl Drop for RevealSequencer {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

impl std::fmt::Debug for RevealSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealSequencer")
            .field("config", &self.inner.config)
            .field("phase", &self.phase())
            .field("activated", &self.activated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{NoViewport, SharedViewport, TokioScheduler};
    use std::sync::atomic::AtomicUsize;
    use tokio::time::sleep;

    fn sequencer(items: usize) -> RevealSequencer {
        RevealSequencer::new(
            RevealConfig::new("announcements", items, 150, 0.3),
            Arc::new(TokioScheduler::current()),
            Notifier::new(),
        )
    }

    fn container() -> ContainerId {
        ContainerId::new("announcements")
    }

    #[tokio::test(start_paused = true)]
    async fn stays_dormant_below_threshold() {
        let viewport = SharedViewport::new();
        let reveal = sequencer(4);
        reveal.observe(&viewport);

        viewport.report(&container(), 0.29);
        sleep(Duration::from_secs(2)).await;

        assert_eq!(reveal.phase(), RevealPhase::Dormant);
        assert_eq!(reveal.activated(), vec![false; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn items_activate_at_absolute_offsets() {
        let viewport = SharedViewport::new();
        let reveal = sequencer(4);
        reveal.observe(&viewport);

        viewport.report(&container(), 0.5);
        assert!(reveal.is_triggered());

        sleep(Duration::from_millis(1)).await;
        assert_eq!(reveal.activated(), vec![true, false, false, false]);

        sleep(Duration::from_millis(148)).await; // t = 149
        assert_eq!(reveal.activated(), vec![true, false, false, false]);
        sleep(Duration::from_millis(2)).await; // t = 151
        assert_eq!(reveal.activated(), vec![true, true, false, false]);

        sleep(Duration::from_millis(147)).await; // t = 298
        assert!(!reveal.is_activated(2));
        sleep(Duration::from_millis(4)).await; // t = 302
        assert_eq!(reveal.activated(), vec![true, true, true, false]);

        sleep(Duration::from_millis(147)).await; // t = 449
        assert!(!reveal.is_activated(3));
        sleep(Duration::from_millis(2)).await; // t = 451
        assert_eq!(reveal.activated(), vec![true; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_at_most_once() {
        let viewport = SharedViewport::new();
        let hooks = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hooks);
        let reveal = sequencer(2).with_on_trigger(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        reveal.observe(&viewport);

        viewport.report(&container(), 1.0);
        viewport.report(&container(), 0.0);
        viewport.report(&container(), 1.0);
        reveal.trigger();
        reveal.observe(&viewport);

        assert_eq!(hooks.load(Ordering::SeqCst), 1);
        assert_eq!(viewport.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_sequence_stops_later_items() {
        let viewport = SharedViewport::new();
        let reveal = sequencer(4);
        reveal.observe(&viewport);
        viewport.report(&container(), 1.0);

        sleep(Duration::from_millis(200)).await;
        reveal.cancel();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(reveal.activated(), vec![true, true, false, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_before_trigger_unregisters() {
        let viewport = SharedViewport::new();
        let reveal = sequencer(3);
        reveal.observe(&viewport);
        assert_eq!(viewport.pending(), 1);

        drop(reveal);
        assert_eq!(viewport.pending(), 0);
        assert_eq!(viewport.report(&container(), 1.0), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_viewport_reveals_immediately() {
        let reveal = sequencer(2);
        reveal.observe(&NoViewport);
        assert!(reveal.is_triggered());

        sleep(Duration::from_millis(151)).await;
        assert_eq!(reveal.activated(), vec![true, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn already_visible_container_triggers_on_observe() {
        let viewport = SharedViewport::new();
        viewport.report(&container(), 0.8);

        let reveal = sequencer(1);
        reveal.observe(&viewport);
        assert!(reveal.is_triggered());
        assert_eq!(viewport.pending(), 0);
    }

    #[test]
    fn offsets_scale_with_index() {
        let config = RevealConfig::new("roadmap", 4, 200, 0.2);
        assert_eq!(config.offset(0), Duration::ZERO);
        assert_eq!(config.offset(3), Duration::from_millis(600));
    }
}
