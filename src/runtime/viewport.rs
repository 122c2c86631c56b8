//! Viewport intersection observation

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, Weak},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::utils::lock;

/// Identifier of an observable container region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback fired when an observed container first becomes visible enough
pub type EnterCallback = Box<dyn FnOnce() + Send + 'static>;

/// Errors from a viewport collaborator
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("Viewport intersection observation is not available on this host")]
    Unsupported,
}

/// Capability to observe when a container intersects the visible viewport.
pub trait Viewport: fmt::Debug + Send + Sync {
    /// Register `on_enter` to run once when `container`'s visible fraction
    /// reaches `threshold`. Dropping the returned [`Observation`] ends the
    /// session without firing.
    fn observe(
        &self,
        container: &ContainerId,
        threshold: f64,
        on_enter: EnterCallback,
    ) -> Result<Observation, ViewportError>;

    /// The container was torn down; forget any visibility recorded for it so
    /// a remounted instance starts unseen.
    fn release(&self, _container: &ContainerId) {}
}

/// Guard for a registered observation; unregisters on drop
pub struct Observation {
    unregister: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Observation {
    pub fn new(unregister: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    /// An observation with nothing to unregister
    pub fn inert() -> Self {
        Self { unregister: None }
    }

    /// End the observation session now
    pub fn disconnect(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("active", &self.unregister.is_some())
            .finish()
    }
}

/// Host without intersection observation; every observe call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViewport;

impl Viewport for NoViewport {
    fn observe(
        &self,
        _container: &ContainerId,
        _threshold: f64,
        _on_enter: EnterCallback,
    ) -> Result<Observation, ViewportError> {
        Err(ViewportError::Unsupported)
    }
}

struct Registration {
    container: ContainerId,
    threshold: f64,
    on_enter: EnterCallback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: HashMap<u64, Registration>,
    ratios: HashMap<ContainerId, f64>,
}

fn crosses(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}

/// Viewport driven by the host reporting visible fractions per container
#[derive(Clone, Default)]
pub struct SharedViewport {
    registry: Arc<Mutex<Registry>>,
}

impl SharedViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the visible fraction of `container` and fire every
    /// observation on it whose threshold is reached.
    ///
    /// Returns how many observations fired.
    pub fn report(&self, container: &ContainerId, ratio: f64) -> usize {
        let ratio = ratio.clamp(0.0, 1.0);
        let fired: Vec<EnterCallback> = {
            let mut registry = lock(&self.registry);
            registry.ratios.insert(container.clone(), ratio);

            let mut ids: Vec<u64> = registry
                .observers
                .iter()
                .filter(|(_, reg)| &reg.container == container && crosses(ratio, reg.threshold))
                .map(|(id, _)| *id)
                .collect();
            ids.sort_unstable();
            ids.into_iter()
                .filter_map(|id| registry.observers.remove(&id))
                .map(|reg| reg.on_enter)
                .collect()
        };

        debug!("Viewport report: container={}, ratio={:.2}, fired={}", container, ratio, fired.len());
        // Callbacks run without the registry lock; they may drop observations
        let count = fired.len();
        for on_enter in fired {
            on_enter();
        }
        count
    }

    /// Last reported visible fraction of `container`
    pub fn ratio(&self, container: &ContainerId) -> f64 {
        lock(&self.registry).ratios.get(container).copied().unwrap_or(0.0)
    }

    /// Number of observations still waiting to fire
    pub fn pending(&self) -> usize {
        lock(&self.registry).observers.len()
    }

    fn unregister(registry: &Weak<Mutex<Registry>>, id: u64) {
        if let Some(registry) = registry.upgrade() {
            if lock(&registry).observers.remove(&id).is_some() {
                debug!("Viewport observation {} unregistered", id);
            }
        }
    }
}

impl Viewport for SharedViewport {
    fn observe(
        &self,
        container: &ContainerId,
        threshold: f64,
        on_enter: EnterCallback,
    ) -> Result<Observation, ViewportError> {
        let mut registry = lock(&self.registry);
        let current = registry.ratios.get(container).copied().unwrap_or(0.0);

        if crosses(current, threshold) {
            drop(registry);
            info!("Container {} already visible, firing observation immediately", container);
            on_enter();
            return Ok(Observation::inert());
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.observers.insert(
            id,
            Registration {
                container: container.clone(),
                threshold,
                on_enter,
            },
        );
        drop(registry);

        let weak = Arc::downgrade(&self.registry);
        Ok(Observation::new(move || Self::unregister(&weak, id)))
    }

    fn release(&self, container: &ContainerId) {
        if lock(&self.registry).ratios.remove(container).is_some() {
            debug!("Forgot visibility of {}", container);
        }
    }
}

impl fmt::Debug for SharedViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedViewport")
            .field("pending", &self.pending())
            .finish()
    }
}
