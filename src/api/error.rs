//! HTTP error responses.
//!
//! Every API error renders as `{"statusCode": <u16>, "message": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::shelf::ShelfError;
use crate::torrents::TorrentError;

/// JSON error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub status_code: u16,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> ApiErrorBody {
        ApiErrorBody {
            status_code: self.status.as_u16(),
            message: self.message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

impl From<ShelfError> for ApiError {
    fn from(error: ShelfError) -> Self {
        let status = match &error {
            ShelfError::DuplicateService(_) | ShelfError::DuplicateServiceId(_) => {
                StatusCode::CONFLICT
            }
            ShelfError::ServiceNotFound(_) | ShelfError::WidgetNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ShelfError::InvalidWidget(_) | ShelfError::InvalidService(_) => {
                StatusCode::BAD_REQUEST
            }
            ShelfError::Repository(e) => {
                tracing::error!(error = %e, "Shelf document could not be saved");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, error.to_string())
    }
}

impl From<TorrentError> for ApiError {
    fn from(error: TorrentError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, error.to_string())
    }
}
