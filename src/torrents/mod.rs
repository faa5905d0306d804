//! Torrent-client integrations.
//!
//! [`TorrentService`] asks every torrent client configured on the shelf for
//! its torrents and normalizes the answers into one
//! [`NormalizedTorrentListResponse`]. It backs `POST /api/modules/torrents`
//! and is the data source polled by traffic widgets.

mod error;
pub mod qbittorrent;
mod types;

pub use error::TorrentError;
pub use qbittorrent::QBittorrentClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::polling::{DataSource, PollError};
use crate::shelf::{Service, ServiceType, ShelfStore};

/// One torrent-client integration.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    fn supports(&self, service_type: ServiceType) -> bool;

    async fn list_torrents(&self, service: &Service) -> Result<Vec<NormalizedTorrent>, TorrentError>;
}

/// Collects torrents from every configured torrent client.
pub struct TorrentService {
    shelf: Arc<ShelfStore>,
    clients: Vec<Arc<dyn TorrentClient>>,
}

impl TorrentService {
    pub fn new(shelf: Arc<ShelfStore>, clients: Vec<Arc<dyn TorrentClient>>) -> Self {
        Self { shelf, clients }
    }

    /// Service with every built-in integration, sharing one HTTP client.
    pub fn with_default_clients(shelf: Arc<ShelfStore>, http: reqwest::Client) -> Self {
        Self::new(shelf, vec![Arc::new(QBittorrentClient::new(http))])
    }

    fn client_for(&self, service_type: ServiceType) -> Option<&Arc<dyn TorrentClient>> {
        self.clients.iter().find(|c| c.supports(service_type))
    }

    /// Query all configured torrent clients concurrently.
    ///
    /// A failing client is logged and left out. The call only fails when
    /// every queried client failed.
    pub async fn fetch_all(&self) -> Result<NormalizedTorrentListResponse, TorrentError> {
        let services: Vec<Service> = self
            .shelf
            .services()
            .await
            .into_iter()
            .filter(|s| s.service_type.is_torrent_client())
            .collect();

        let mut pending = Vec::new();
        for service in &services {
            match self.client_for(service.service_type) {
                Some(client) => pending.push(async move {
                    (service, client.list_torrents(service).await)
                }),
                None => tracing::debug!(
                    app = %service.name,
                    service_type = %service.service_type,
                    "No integration for torrent client type"
                ),
            }
        }

        let queried = pending.len();
        let results = futures::future::join_all(pending).await;

        let mut collections = Vec::with_capacity(queried);
        for (service, result) in results {
            match result {
                Ok(torrents) => collections.push(TorrentCollection {
                    app_id: service.id.clone(),
                    torrents,
                }),
                Err(error) => tracing::warn!(
                    app = %service.name,
                    url = %service.url,
                    error = %error,
                    "Torrent client query failed"
                ),
            }
        }

        if queried > 0 && collections.is_empty() {
            return Err(TorrentError::AllClientsFailed(queried));
        }

        Ok(NormalizedTorrentListResponse {
            torrents: collections,
        })
    }
}

#[async_trait]
impl DataSource for TorrentService {
    type Output = NormalizedTorrentListResponse;

    async fn fetch(&self) -> Result<Self::Output, PollError> {
        self.fetch_all()
            .await
            .map_err(|e| PollError::Fetch(e.to_string()))
    }
}
