//! Shelf document, tiles and service endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::shelf::{render_shelf, Service, ShelfConfig, ShelfTile};

/// GET /api/config - the stored shelf document, passwords masked.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ShelfConfig> {
    Json(state.shelf.snapshot().await.redacted())
}

/// PUT /api/config - replace the shelf document and restart changed widgets.
///
/// Masked or omitted passwords keep their stored value.
pub async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<ShelfConfig>,
) -> Result<Json<ShelfConfig>, ApiError> {
    state.shelf.replace(config).await?;
    state.widgets.sync().await;
    Ok(Json(state.shelf.snapshot().await.redacted()))
}

/// GET /api/shelf - tile views in shelf order.
pub async fn get_tiles(State(state): State<Arc<AppState>>) -> Json<Vec<ShelfTile>> {
    let services = state.shelf.services().await;
    Json(render_shelf(&services, &state.checker).await)
}

/// POST /api/services
pub async fn add_service(
    State(state): State<Arc<AppState>>,
    Json(service): Json<Service>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = state.shelf.add_service(service).await?;
    Ok((StatusCode::CREATED, Json(service.redacted())))
}

/// DELETE /api/services/:name
pub async fn remove_service(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let removed = state.shelf.remove_service(&name).await?;
    Ok(Json(removed.redacted()))
}
