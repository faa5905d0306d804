//! Torrent network-traffic widget (`dlspeed`).
//!
//! Each instance polls the torrent data source under its own id, folds every
//! result into a [`TrafficHistory`] and serves chart series and tooltips from
//! it. The history lives and dies with the instance.

pub mod chart;
pub mod history;

pub use chart::{
    parse_serie_id, project_series, reconstruct_tooltip, serie_id, CapturedClientEntry, Datum,
    Direction, Serie, SlicePoint, TooltipLine,
};
pub use history::{ClientDataEntry, ClientDataHistory, TrafficHistory, HISTORY_WINDOW};

use serde_json::Map;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{GridBounds, WidgetDescriptor, WidgetInstance};
use crate::polling::{DataSource, PollOutcome, PollSnapshot, PollStatus, PollingQuery, RefetchPolicy};
use crate::shelf::ShelfStore;
use crate::torrents::NormalizedTorrentListResponse;

pub const WIDGET_TYPE: &str = "dlspeed";

/// Polled source of torrent data.
pub type TorrentSource = dyn DataSource<Output = NormalizedTorrentListResponse>;

pub fn descriptor() -> WidgetDescriptor {
    WidgetDescriptor {
        id: WIDGET_TYPE,
        icon: "arrows-up-down",
        options: Map::new(),
        gridstack: GridBounds {
            min_width: 2,
            min_height: 2,
            max_width: 12,
            max_height: 6,
        },
    }
}

/// A running traffic widget instance. Dropping it stops the poller.
pub struct TrafficWidget {
    instance: WidgetInstance,
    history: Arc<Mutex<TrafficHistory>>,
    status: Arc<PollStatus>,
    cancel: CancellationToken,
    handle: JoinHandle<PollOutcome>,
}

impl TrafficWidget {
    /// Start polling `source` for this instance.
    ///
    /// Each result is matched against the shelf's services at the time it
    /// arrives, so apps added later start a history on their next sample.
    pub fn spawn(
        instance: WidgetInstance,
        source: Arc<TorrentSource>,
        shelf: Arc<ShelfStore>,
        policy: RefetchPolicy,
        cancel: CancellationToken,
    ) -> Self {
        let history = Arc::new(Mutex::new(TrafficHistory::new()));
        let query = PollingQuery::new(instance.id.clone(), source, policy);
        let status = query.status();

        let sink = Arc::clone(&history);
        let handle = query.start(
            move |data: NormalizedTorrentListResponse| {
                let history = Arc::clone(&sink);
                let shelf = Arc::clone(&shelf);
                async move {
                    let apps = shelf.services().await;
                    let now_ms = chrono::Utc::now().timestamp_millis();
                    history.lock().await.record(&data, &apps, now_ms);
                }
            },
            cancel.clone(),
        );

        tracing::debug!(widget_id = %instance.id, "Traffic widget started");

        Self {
            instance,
            history,
            status,
            cancel,
            handle,
        }
    }

    pub fn instance(&self) -> &WidgetInstance {
        &self.instance
    }

    pub fn status(&self) -> PollSnapshot {
        self.status.snapshot()
    }

    /// Whether the polling task has ended (halted, cancelled or disabled).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn series(&self) -> Vec<Serie> {
        project_series(&*self.history.lock().await)
    }

    pub async fn tooltip(&self, points: &[SlicePoint]) -> Vec<TooltipLine> {
        let history = self.history.lock().await;
        reconstruct_tooltip(points, &history)
            .iter()
            .map(TooltipLine::from)
            .collect()
    }

    /// A copy of the current history.
    pub async fn history(&self) -> TrafficHistory {
        self.history.lock().await.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TrafficWidget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
