//! Widget endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::widgets::traffic::{Serie, SlicePoint, TooltipLine};
use crate::widgets::{self, GridPlacement, WidgetDescriptor, WidgetInstance, WidgetView};

/// Body of `POST /api/widgets`.
#[derive(Debug, Deserialize)]
pub struct CreateWidget {
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub options: Map<String, Value>,
    pub placement: Option<GridPlacement>,
}

/// Body of `POST /api/widgets/:id/tooltip`.
#[derive(Debug, Deserialize)]
pub struct TooltipRequest {
    pub points: Vec<SlicePoint>,
}

/// GET /api/widgets/descriptors
pub async fn descriptors() -> Json<Vec<WidgetDescriptor>> {
    Json(widgets::descriptors())
}

/// GET /api/widgets
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<WidgetView>> {
    Json(state.widgets.views().await)
}

/// POST /api/widgets
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateWidget>,
) -> Result<(StatusCode, Json<WidgetInstance>), ApiError> {
    let mut instance = WidgetInstance::new(&request.widget_type);
    instance.options = request.options;
    if let Some(placement) = request.placement {
        instance.placement = placement;
    }

    let instance = state.widgets.create(instance).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// DELETE /api/widgets/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.widgets.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/widgets/:id/series
pub async fn series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Serie>>, ApiError> {
    state
        .widgets
        .series(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Widget not running: {}", id)))
}

/// POST /api/widgets/:id/tooltip
pub async fn tooltip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<TooltipRequest>,
) -> Result<Json<Vec<TooltipLine>>, ApiError> {
    state
        .widgets
        .tooltip(&id, &request.points)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Widget not running: {}", id)))
}
