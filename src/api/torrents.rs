//! Torrent data endpoint.

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::torrents::NormalizedTorrentListResponse;

/// POST /api/modules/torrents - torrents of every configured torrent client.
///
/// The request body is ignored.
pub async fn handle(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NormalizedTorrentListResponse>, ApiError> {
    let response = state.torrents.fetch_all().await?;
    Ok(Json(response))
}
