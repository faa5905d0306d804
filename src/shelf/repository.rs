//! Persistence for the shelf document.
//!
//! The shelf is stored as the value of a single fixed key inside one JSON
//! document. The document is read once when the shelf is mounted and written
//! back after every mutation. It is neither versioned nor migrated.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::RepositoryError;
use super::model::ShelfConfig;

/// Storage backend for the shelf document.
pub trait ConfigRepository: Send + Sync {
    /// Read the stored shelf. `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ShelfConfig>, RepositoryError>;

    /// Replace the stored shelf.
    fn save(&self, config: &ShelfConfig) -> Result<(), RepositoryError>;
}

/// Stores the shelf under `key` in a JSON file on disk.
///
/// Other top-level keys already present in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    key: String,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, RepositoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RepositoryError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(RepositoryError::NotAnObject),
        }
    }
}

impl ConfigRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<ShelfConfig>, RepositoryError> {
        let Some(mut document) = self.read_document()? else {
            return Ok(None);
        };

        match document.remove(&self.key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn save(&self, config: &ShelfConfig) -> Result<(), RepositoryError> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.insert(self.key.clone(), serde_json::to_value(config)?);

        let body = serde_json::to_string_pretty(&Value::Object(document))?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&tmp, body).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "Shelf document saved");
        Ok(())
    }
}

/// In-memory repository. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Mutex<Option<ShelfConfig>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ShelfConfig) -> Self {
        Self {
            stored: Mutex::new(Some(config)),
        }
    }

    /// Snapshot of what was last saved.
    pub fn stored(&self) -> Option<ShelfConfig> {
        self.stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ConfigRepository for MemoryRepository {
    fn load(&self) -> Result<Option<ShelfConfig>, RepositoryError> {
        Ok(self.stored())
    }

    fn save(&self, config: &ShelfConfig) -> Result<(), RepositoryError> {
        *self
            .stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config.clone());
        Ok(())
    }
}
