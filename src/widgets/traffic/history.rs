//! Per-app upload/download history for the network-traffic chart.
//!
//! Each polling result is folded into one `(x, upload, download)` sample per
//! configured app. Histories form a sliding window: after every ingest a
//! window pass evicts the oldest sample of each app that is over capacity.
//! The pass evicts exactly one sample per app, it does not truncate. Two
//! ingests without a pass in between leave an app one sample over capacity
//! until the next pass.

use serde::Serialize;
use std::collections::VecDeque;

use crate::shelf::Service;
use crate::torrents::NormalizedTorrentListResponse;

/// Samples retained per app.
pub const HISTORY_WINDOW: usize = 30;

/// One polling sample for one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientDataEntry {
    /// Unix timestamp in milliseconds
    pub x: i64,
    pub upload: u64,
    pub download: u64,
}

/// Samples of one configured app, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDataHistory {
    pub app: Service,
    pub entries: VecDeque<ClientDataEntry>,
}

/// All per-app histories owned by one widget instance.
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    clients: Vec<ClientDataHistory>,
    capacity: usize,
}

impl TrafficHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            clients: Vec::new(),
            capacity,
        }
    }

    /// Ingest one polling result and run one window pass.
    pub fn record(&mut self, data: &NormalizedTorrentListResponse, apps: &[Service], now_ms: i64) {
        self.ingest(data, apps, now_ms);
        self.evict_overflow();
    }

    /// Append one sample per reported app that is configured in `apps`.
    ///
    /// Collections whose `appId` matches no configured app are skipped.
    /// Returns the number of samples appended.
    pub fn ingest(
        &mut self,
        data: &NormalizedTorrentListResponse,
        apps: &[Service],
        now_ms: i64,
    ) -> usize {
        let mut appended = 0;

        for item in &data.torrents {
            let Some(app) = apps.iter().find(|app| app.id == item.app_id) else {
                tracing::trace!(app_id = %item.app_id, "Skipping torrents of unconfigured app");
                continue;
            };

            let (download, upload) = item.total_rates();
            let entry = ClientDataEntry {
                x: now_ms,
                upload,
                download,
            };

            match self.clients.iter_mut().find(|c| c.app.id == app.id) {
                Some(client) => client.entries.push_back(entry),
                None => self.clients.push(ClientDataHistory {
                    app: app.clone(),
                    entries: VecDeque::from([entry]),
                }),
            }
            appended += 1;
        }

        appended
    }

    /// Evict the oldest sample of every app whose history exceeds capacity.
    ///
    /// One eviction per app per call. Returns the number of evicted samples.
    pub fn evict_overflow(&mut self) -> usize {
        let mut evicted = 0;
        for client in &mut self.clients {
            if client.entries.len() > self.capacity {
                client.entries.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    pub fn clients(&self) -> &[ClientDataHistory] {
        &self.clients
    }

    pub fn get(&self, app_id: &str) -> Option<&ClientDataHistory> {
        self.clients.iter().find(|c| c.app.id == app_id)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total samples across all apps.
    pub fn len(&self) -> usize {
        self.clients.iter().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for TrafficHistory {
    fn default() -> Self {
        Self::new()
    }
}
