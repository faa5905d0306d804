//! Error types for torrent-client integrations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TorrentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected by {0}")]
    Authentication(String),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("invalid response: {0}")]
    Parse(String),

    #[error("all {0} torrent clients failed")]
    AllClientsFailed(usize),
}
