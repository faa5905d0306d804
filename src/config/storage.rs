//! Shelf document storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the persisted shelf document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the shelf document
    pub path: PathBuf,
    /// Key under which the shelf is stored inside the document
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("homeshelf.json"),
            key: crate::shelf::STORAGE_KEY.to_string(),
        }
    }
}
