//! Error types for reachability checks.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ReachabilityError {
    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("probe failed to run: {0}")]
    Probe(String),
}
