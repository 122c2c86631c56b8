//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod signals;

use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export main functions
pub use signals::shutdown_signal;

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// Every value guarded in this crate is plain data that stays consistent
/// across a panic, so the poison flag carries no information for us.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
