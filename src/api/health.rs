//! Health check endpoint handler.

use crate::api::AppState;
use crate::polling::PollState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub services: usize,
    pub widgets: WidgetCounts,
}

/// Widget poller counts.
#[derive(Debug, Serialize)]
pub struct WidgetCounts {
    pub total: usize,
    pub polling: usize,
    pub halted: usize,
}

/// GET /health - Return server health.
///
/// `degraded` as soon as one widget poller has halted.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let views = state.widgets.views().await;
    let halted = views
        .iter()
        .filter(|v| v.polling.state == PollState::Halted)
        .count();

    let status = if halted == 0 { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        services: state.shelf.services().await.len(),
        widgets: WidgetCounts {
            total: views.len(),
            polling: views.len() - halted,
            halted,
        },
    })
}
