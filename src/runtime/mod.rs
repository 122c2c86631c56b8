//! Host collaborators module
//! 
//! Scheduling and viewport observation are supplied by the hosting
//! environment; the engine only depends on the traits defined here.

pub mod scheduler;
pub mod viewport;

// Re-export main types
pub use scheduler::{OnceTask, RepeatingTask, Scheduler, TimerHandle, TokioScheduler};
pub use viewport::{
    ContainerId, EnterCallback, NoViewport, Observation, SharedViewport, Viewport, ViewportError,
};
