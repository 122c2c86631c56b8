//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod render;

// Re-export main functions
pub use render::render_task;
