//! HTTP API module
//! 
//! A JSON rendering host for the presentation engine: renderers poll
//! `/view`, navigation and simulated scrolling are plain POSTs.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{runtime::SharedViewport, state::SiteState};
use handlers::*;

/// Shared state of the HTTP host
#[derive(Debug, Clone)]
pub struct HostState {
    pub site: Arc<SiteState>,
    /// Viewport the host drives from reported scroll positions
    pub viewport: SharedViewport,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: HostState) -> Router {
    Router::new()
        .route("/view", get(view_handler))
        .route("/section/:id", post(select_section_handler))
        .route("/viewport/:container", post(viewport_handler))
        .route("/announcements/filter/:filter", post(announcement_filter_handler))
        .route("/announcements/:index/toggle", post(announcement_toggle_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
