//! Metrics HTTP handler

use crate::api::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// GET /metrics - Prometheus text format.
///
/// Always 200, with an empty body when nothing was recorded yet.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    metrics::gauge!("homeshelf_widgets_active").set(state.widgets.len() as f64);
    metrics::gauge!("homeshelf_services_configured")
        .set(state.shelf.services().await.len() as f64);

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.prometheus.render(),
    )
}
