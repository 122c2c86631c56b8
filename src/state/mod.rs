//! State management module
//! 
//! This module contains the presentation engine components and the site
//! state that composes them.

pub mod countdown;
pub mod notifier;
pub mod progress;
pub mod reveal;
pub mod section;
pub mod site_state;

// Re-export main types
pub use countdown::{CountdownClock, Deadline, RemainingDuration, TICK_INTERVAL};
pub use notifier::Notifier;
pub use progress::{ProgressAnimator, ProgressStarter, ProgressTrack};
pub use reveal::{RevealConfig, RevealPhase, RevealSequencer};
pub use section::{Section, SectionRouter};
pub use site_state::{NavEntry, SiteState, ViewSnapshot};
