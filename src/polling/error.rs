//! Error types for polled data sources.

use thiserror::Error;

/// A failed fetch. Every failure counts the same against the failure budget.
#[derive(Debug, Clone, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(String),
}
