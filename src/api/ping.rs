//! Reachability ping endpoint.

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct PingQuery {
    pub url: Option<String>,
}

/// GET /api/modules/ping?url=<url> - 200 if the host answers, 404 if not.
///
/// axum routes HEAD to GET handlers; HEAD is rejected here like every other
/// method so it never triggers a probe.
pub async fn handle(
    method: Method,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PingQuery>,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::method_not_allowed());
    }

    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing url query parameter"))?;

    let reachability = state
        .checker
        .check(&url)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let status = if reachability.is_reachable() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok(status.into_response())
}

/// Any other method on the ping route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
