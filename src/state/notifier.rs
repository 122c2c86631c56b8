//! Change notifications for the rendering layer

use tokio::sync::watch;

/// Revision counter bumped whenever any engine component changes state.
///
/// Renderers hold a [`watch::Receiver`] and re-render on every change; the
/// counter itself carries no meaning beyond "something changed".
#[derive(Debug, Clone)]
pub struct Notifier {
    revision_tx: watch::Sender<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self { revision_tx }
    }

    /// Signal that observable state changed
    pub fn notify(&self) {
        // send_modify succeeds with or without live receivers
        self.revision_tx.send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Current revision
    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
