//! Error types for the shelf store and its repositories.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving the shelf document.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored shelf document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stored document is not a JSON object")]
    NotAnObject,

    #[error("Shelf write did not complete: {0}")]
    Interrupted(String),
}

/// Errors raised by shelf mutations.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Service already on the shelf: {0}")]
    DuplicateService(String),

    #[error("Service id already on the shelf: {0}")]
    DuplicateServiceId(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Widget not found: {0}")]
    WidgetNotFound(String),

    #[error("Invalid widget: {0}")]
    InvalidWidget(String),

    #[error("Invalid service: {0}")]
    InvalidService(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
