//! HTTP endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::{
    responses::{ApiResponse, ErrorResponse, HealthResponse, ViewportReport, ViewportResponse},
    HostState,
};
use crate::{error::StageError, runtime::ContainerId, state::ViewSnapshot};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(e: StageError) -> ApiError {
    let status = match e {
        StageError::InvalidSection(_) | StageError::UnknownFilter(_) => StatusCode::BAD_REQUEST,
        StageError::UnknownAnnouncement(_) => StatusCode::NOT_FOUND,
        StageError::SectionNotMounted(_) => StatusCode::CONFLICT,
        StageError::ContentRead { .. } | StageError::ContentParse { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    warn!("Request rejected: {}", e);
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Handle GET /view - Return the current renderable state
pub async fn view_handler(State(state): State<HostState>) -> Json<ViewSnapshot> {
    Json(state.site.snapshot())
}

/// Handle POST /section/:id - Switch the active section
pub async fn select_section_handler(
    State(state): State<HostState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let section = state.site.select_id(&id).map_err(reject)?;
    info!("Section endpoint called - {} active", section);
    Ok(Json(ApiResponse::ok(
        format!("Section {} active", section),
        state.site.snapshot(),
    )))
}

/// Handle POST /viewport/:container - Report the visible fraction of a container
pub async fn viewport_handler(
    State(state): State<HostState>,
    Path(container): Path<String>,
    Json(report): Json<ViewportReport>,
) -> Result<Json<ViewportResponse>, ApiError> {
    if !report.ratio.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid ratio: {}", report.ratio))),
        ));
    }

    let id = ContainerId::new(container);
    let fired = state.viewport.report(&id, report.ratio);
    Ok(Json(ViewportResponse {
        container: id.to_string(),
        ratio: state.viewport.ratio(&id),
        fired,
    }))
}

/// Handle POST /announcements/filter/:filter - Filter announcement cards
pub async fn announcement_filter_handler(
    State(state): State<HostState>,
    Path(filter): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let filter = state.site.set_announcement_filter(&filter).map_err(reject)?;
    Ok(Json(ApiResponse::ok(
        format!("Showing {} announcements", filter),
        state.site.snapshot(),
    )))
}

/// Handle POST /announcements/:index/toggle - Expand or collapse a card
pub async fn announcement_toggle_handler(
    State(state): State<HostState>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, ApiError> {
    let expanded = state.site.toggle_announcement(index).map_err(reject)?;
    let message = match expanded {
        Some(index) => format!("Announcement {} expanded", index),
        None => "Announcements collapsed".to_string(),
    };
    Ok(Json(ApiResponse::ok(message, state.site.snapshot())))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<HostState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.site.get_uptime()))
}
