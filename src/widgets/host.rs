//! Runtime registry of live widget instances.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::traffic::{self, Serie, SlicePoint, TooltipLine, TorrentSource, TrafficWidget};
use super::WidgetInstance;
use crate::polling::{PollSnapshot, RefetchPolicy};
use crate::shelf::{ShelfError, ShelfStore};

/// A widget instance together with its poller status.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetView {
    #[serde(flatten)]
    pub instance: WidgetInstance,
    pub polling: PollSnapshot,
}

/// Owns the running widgets. Each instance gets a child of the host's
/// cancellation token, so [`WidgetHost::shutdown`] stops every poller.
pub struct WidgetHost {
    shelf: Arc<ShelfStore>,
    source: Arc<TorrentSource>,
    policy: RefetchPolicy,
    widgets: DashMap<String, Arc<TrafficWidget>>,
    cancel: CancellationToken,
}

impl WidgetHost {
    pub fn new(shelf: Arc<ShelfStore>, source: Arc<TorrentSource>, policy: RefetchPolicy) -> Self {
        Self {
            shelf,
            source,
            policy,
            widgets: DashMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Start every widget stored on the shelf.
    pub async fn mount_all(&self) -> usize {
        let widgets = self.shelf.widgets().await;
        let count = widgets.len();
        for instance in widgets {
            self.spawn(instance);
        }
        tracing::info!(widgets = count, "Widgets mounted");
        count
    }

    /// Start the poller of one instance, replacing a running one with the same id.
    pub fn spawn(&self, instance: WidgetInstance) {
        if instance.widget_type != traffic::WIDGET_TYPE {
            tracing::warn!(
                widget_id = %instance.id,
                widget_type = %instance.widget_type,
                "No runtime for widget type"
            );
            return;
        }

        let id = instance.id.clone();
        let widget = TrafficWidget::spawn(
            instance,
            Arc::clone(&self.source),
            Arc::clone(&self.shelf),
            self.policy,
            self.cancel.child_token(),
        );
        self.widgets.insert(id, Arc::new(widget));
        self.update_gauge();
    }

    /// Persist a new instance on the shelf and start it.
    pub async fn create(&self, instance: WidgetInstance) -> Result<WidgetInstance, ShelfError> {
        let instance = self.shelf.add_widget(instance).await?;
        self.spawn(instance.clone());
        tracing::info!(widget_id = %instance.id, widget_type = %instance.widget_type, "Widget created");
        Ok(instance)
    }

    /// Remove an instance from the shelf and tear it down with its history.
    pub async fn delete(&self, id: &str) -> Result<WidgetInstance, ShelfError> {
        let removed = self.shelf.remove_widget(id).await?;
        self.teardown(id);
        tracing::info!(widget_id = %id, "Widget deleted");
        Ok(removed)
    }

    /// Bring running pollers in line with the shelf after it was replaced.
    ///
    /// Instances no longer stored are torn down, new ones are started, and
    /// unchanged ones keep running with their history.
    pub async fn sync(&self) {
        let stored = self.shelf.widgets().await;

        let stale: Vec<String> = self
            .widgets
            .iter()
            .filter(|entry| {
                !stored
                    .iter()
                    .any(|w| &w.id == entry.key() && w == entry.value().instance())
            })
            .map(|entry| entry.key().clone())
            .collect();
        for id in &stale {
            self.teardown(id);
        }

        for instance in stored {
            if !self.widgets.contains_key(&instance.id) {
                self.spawn(instance);
            }
        }
    }

    /// Stop one running instance. Returns whether it was running.
    pub fn teardown(&self, id: &str) -> bool {
        let removed = self.widgets.remove(id);
        if let Some((_, widget)) = &removed {
            widget.stop();
        }
        self.update_gauge();
        removed.is_some()
    }

    fn get(&self, id: &str) -> Option<Arc<TrafficWidget>> {
        self.widgets.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub async fn series(&self, id: &str) -> Option<Vec<Serie>> {
        let widget = self.get(id)?;
        Some(widget.series().await)
    }

    pub async fn tooltip(&self, id: &str, points: &[SlicePoint]) -> Option<Vec<TooltipLine>> {
        let widget = self.get(id)?;
        Some(widget.tooltip(points).await)
    }

    /// Running instances in shelf order.
    pub async fn views(&self) -> Vec<WidgetView> {
        self.shelf
            .widgets()
            .await
            .into_iter()
            .filter_map(|instance| {
                let polling = self.get(&instance.id)?.status();
                Some(WidgetView { instance, polling })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Stop every poller and drop all histories.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.widgets.clear();
        self.update_gauge();
        tracing::debug!("Widget host shut down");
    }

    fn update_gauge(&self) {
        metrics::gauge!("homeshelf_widgets_active").set(self.widgets.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::{DataSource, PollError, PollState};
    use crate::shelf::{MemoryRepository, ShelfConfig};
    use crate::torrents::NormalizedTorrentListResponse;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Empty;

    #[async_trait]
    impl DataSource for Empty {
        type Output = NormalizedTorrentListResponse;

        async fn fetch(&self) -> Result<Self::Output, PollError> {
            Ok(NormalizedTorrentListResponse::default())
        }
    }

    fn host_with(widgets: Vec<WidgetInstance>) -> (WidgetHost, Arc<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::with_config(ShelfConfig {
            widgets,
            ..Default::default()
        }));
        let shelf = Arc::new(ShelfStore::mount(repo.clone()).unwrap());
        let host = WidgetHost::new(
            shelf,
            Arc::new(Empty),
            RefetchPolicy::new(Duration::from_millis(20), 3),
        );
        (host, repo)
    }

    #[tokio::test]
    async fn test_mount_all_starts_stored_widgets() {
        let (host, _) = host_with(vec![
            WidgetInstance::new("dlspeed"),
            WidgetInstance::new("dlspeed"),
        ]);
        assert_eq!(host.mount_all().await, 2);
        assert_eq!(host.len(), 2);

        let views = host.views().await;
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].polling.state, PollState::Polling);
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let (host, repo) = host_with(vec![]);
        let instance = host.create(WidgetInstance::new("dlspeed")).await.unwrap();

        assert_eq!(host.len(), 1);
        assert_eq!(repo.stored().unwrap().widgets.len(), 1);
        assert_eq!(host.series(&instance.id).await, Some(vec![]));

        host.delete(&instance.id).await.unwrap();
        assert!(host.is_empty());
        assert!(host.series(&instance.id).await.is_none());
        assert!(repo.stored().unwrap().widgets.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_widget() {
        let (host, _) = host_with(vec![]);
        assert!(matches!(
            host.delete("nope").await,
            Err(ShelfError::WidgetNotFound(_))
        ));
        assert!(!host.teardown("nope"));
    }

    #[tokio::test]
    async fn test_sync_follows_replaced_shelf() {
        let kept = WidgetInstance::new("dlspeed");
        let dropped = WidgetInstance::new("dlspeed");
        let (host, _) = host_with(vec![kept.clone(), dropped.clone()]);
        host.mount_all().await;

        let added = WidgetInstance::new("dlspeed");
        host.shelf
            .replace(ShelfConfig {
                widgets: vec![kept.clone(), added.clone()],
                ..Default::default()
            })
            .await
            .unwrap();
        host.sync().await;

        assert_eq!(host.len(), 2);
        assert!(host.series(&kept.id).await.is_some());
        assert!(host.series(&added.id).await.is_some());
        assert!(host.series(&dropped.id).await.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_clears_widgets() {
        let (host, _) = host_with(vec![WidgetInstance::new("dlspeed")]);
        host.mount_all().await;
        host.shutdown();
        assert!(host.is_empty());
        assert!(host.views().await.is_empty());
    }

    #[test]
    fn test_view_flattens_instance() {
        let view = WidgetView {
            instance: WidgetInstance::new("dlspeed"),
            polling: PollSnapshot {
                state: PollState::Halted,
                fetches: 3,
                consecutive_failures: 3,
            },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "dlspeed");
        assert_eq!(json["polling"]["state"], "halted");
    }
}
