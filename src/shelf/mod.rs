//! The shelf: the user's configured services and placed widgets.
//!
//! [`ShelfStore`] owns the in-memory shelf document. It is mounted once from an
//! injected [`ConfigRepository`] and writes every mutation back through it.

mod error;
mod model;
pub mod repository;
pub mod tiles;

pub use error::{RepositoryError, ShelfError};
pub use model::{Credentials, Service, ServiceType, ShelfConfig, REDACTED_PASSWORD};
pub use repository::{ConfigRepository, JsonFileRepository, MemoryRepository};
pub use tiles::{render_shelf, ShelfTile};

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::widgets::WidgetInstance;

/// Key the shelf document is stored under.
pub const STORAGE_KEY: &str = "config";

/// Check service names and ids are unique and present, and every widget fits its type.
pub fn validate(config: &ShelfConfig) -> Result<(), ShelfError> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for service in &config.services {
        validate_service(service)?;
        if !names.insert(service.name.as_str()) {
            return Err(ShelfError::DuplicateService(service.name.clone()));
        }
        if !ids.insert(service.id.as_str()) {
            return Err(ShelfError::DuplicateServiceId(service.id.clone()));
        }
    }

    let mut widget_ids = HashSet::new();
    for widget in &config.widgets {
        widget.validate().map_err(ShelfError::InvalidWidget)?;
        if !widget_ids.insert(widget.id.as_str()) {
            return Err(ShelfError::InvalidWidget(format!(
                "duplicate widget id '{}'",
                widget.id
            )));
        }
    }

    Ok(())
}

fn validate_service(service: &Service) -> Result<(), ShelfError> {
    if service.name.trim().is_empty() {
        return Err(ShelfError::InvalidService("name cannot be empty".to_string()));
    }
    if service.id.trim().is_empty() {
        return Err(ShelfError::InvalidService(format!(
            "'{}' has an empty id",
            service.name
        )));
    }
    if service.url.trim().is_empty() {
        return Err(ShelfError::InvalidService(format!(
            "'{}' has an empty URL",
            service.name
        )));
    }
    Ok(())
}

/// Shared, persisted shelf document.
///
/// Saves run on the blocking pool while the write lock is held, so writes
/// reach the repository in the order they were accepted.
pub struct ShelfStore {
    repository: Arc<dyn ConfigRepository>,
    state: RwLock<ShelfConfig>,
}

impl ShelfStore {
    /// Load the shelf once from the repository. An empty repository yields
    /// the default shelf, which is not written back until the first change.
    pub fn mount(repository: Arc<dyn ConfigRepository>) -> Result<Self, RepositoryError> {
        let config = repository.load()?.unwrap_or_default();
        tracing::info!(
            services = config.services.len(),
            widgets = config.widgets.len(),
            "Shelf mounted"
        );

        Ok(Self {
            repository,
            state: RwLock::new(config),
        })
    }

    pub async fn snapshot(&self) -> ShelfConfig {
        self.state.read().await.clone()
    }

    pub async fn services(&self) -> Vec<Service> {
        self.state.read().await.services.clone()
    }

    pub async fn widgets(&self) -> Vec<WidgetInstance> {
        self.state.read().await.widgets.clone()
    }

    /// Write `config` through the repository without blocking the runtime.
    async fn persist(&self, config: &ShelfConfig) -> Result<(), RepositoryError> {
        let repository = Arc::clone(&self.repository);
        let config = config.clone();
        tokio::task::spawn_blocking(move || repository.save(&config))
            .await
            .map_err(|e| RepositoryError::Interrupted(e.to_string()))?
    }

    /// Replace the whole shelf document.
    ///
    /// Masked or omitted passwords keep their stored value, so a document
    /// read back from the API can be saved unchanged.
    pub async fn replace(&self, mut config: ShelfConfig) -> Result<(), ShelfError> {
        let mut state = self.state.write().await;
        config.restore_secrets(&state);
        validate(&config)?;
        self.persist(&config).await?;
        *state = config;
        Ok(())
    }

    pub async fn add_service(&self, service: Service) -> Result<Service, ShelfError> {
        validate_service(&service)?;
        let mut state = self.state.write().await;
        if state.find_service(&service.name).is_some() {
            return Err(ShelfError::DuplicateService(service.name));
        }
        if state.find_app(&service.id).is_some() {
            return Err(ShelfError::DuplicateServiceId(service.id));
        }

        let mut next = state.clone();
        next.services.push(service.clone());
        self.persist(&next).await?;
        *state = next;

        tracing::info!(name = %service.name, url = %service.url, "Service added to shelf");
        Ok(service)
    }

    pub async fn remove_service(&self, name: &str) -> Result<Service, ShelfError> {
        let mut state = self.state.write().await;
        let index = state
            .services
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ShelfError::ServiceNotFound(name.to_string()))?;

        let mut next = state.clone();
        let removed = next.services.remove(index);
        self.persist(&next).await?;
        *state = next;

        tracing::info!(name = %removed.name, "Service removed from shelf");
        Ok(removed)
    }

    pub async fn add_widget(&self, widget: WidgetInstance) -> Result<WidgetInstance, ShelfError> {
        widget.validate().map_err(ShelfError::InvalidWidget)?;
        let mut state = self.state.write().await;
        if state.widgets.iter().any(|w| w.id == widget.id) {
            return Err(ShelfError::InvalidWidget(format!(
                "duplicate widget id '{}'",
                widget.id
            )));
        }

        let mut next = state.clone();
        next.widgets.push(widget.clone());
        self.persist(&next).await?;
        *state = next;
        Ok(widget)
    }

    pub async fn remove_widget(&self, id: &str) -> Result<WidgetInstance, ShelfError> {
        let mut state = self.state.write().await;
        let index = state
            .widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| ShelfError::WidgetNotFound(id.to_string()))?;

        let mut next = state.clone();
        let removed = next.widgets.remove(index);
        self.persist(&next).await?;
        *state = next;
        Ok(removed)
    }
}
