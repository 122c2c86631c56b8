//! Presale Stage - presentation state engine for a token-sale landing site
//! 
//! This library provides the runtime behaviour behind an otherwise static
//! marketing site: active-section routing, a deadline countdown, staggered
//! scroll-triggered reveals and delayed progress bars.

pub mod config;
pub mod content;
pub mod error;
pub mod state;
pub mod runtime;
pub mod sections;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use content::SiteContent;
pub use error::StageError;
pub use state::SiteState;
pub use api::{create_router, HostState};
pub use utils::signals::shutdown_signal;
