//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::ViewSnapshot;

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub view: ViewSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, view: ViewSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            view,
        }
    }

    /// Create a success response
    pub fn ok(message: String, view: ViewSnapshot) -> Self {
        Self::new("ok".to_string(), message, view)
    }
}

/// Error body returned with 4xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Body of POST /viewport/:container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportReport {
    pub ratio: f64,
}

/// Result of a viewport report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportResponse {
    pub container: String,
    pub ratio: f64,
    pub fired: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}
