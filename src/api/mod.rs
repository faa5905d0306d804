//! # HTTP API
//!
//! JSON endpoints behind the dashboard, plus the embedded dashboard itself.
//!
//! ## Endpoints
//!
//! - `GET /api/modules/ping?url=<url>` - reachability of a service host
//! - `POST /api/modules/torrents` - normalized torrent list of every torrent client
//! - `GET|PUT /api/config` - the stored shelf document
//! - `GET /api/shelf` - tile views with reachability
//! - `POST /api/services`, `DELETE /api/services/:name`
//! - `GET /api/widgets/descriptors`, `GET|POST /api/widgets`, `DELETE /api/widgets/:id`
//! - `GET /api/widgets/:id/series`, `POST /api/widgets/:id/tooltip`
//! - `GET /health`, `GET /metrics`
//! - `GET /`, `GET /assets/*path` - dashboard
//!
//! ## Example
//!
//! ```no_run
//! use homeshelf::api::{create_router, AppState};
//! use homeshelf::config::HomeshelfConfig;
//! use homeshelf::shelf::{MemoryRepository, ShelfStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(HomeshelfConfig::default());
//! let shelf = Arc::new(ShelfStore::mount(Arc::new(MemoryRepository::new()))?);
//!
//! let state = Arc::new(AppState::new(config, shelf)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:7575").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Errors are JSON: `{"statusCode": 405, "message": "Method not allowed"}`.

mod error;
mod health;
mod ping;
mod shelf;
mod torrents;
mod widgets;

pub use error::{ApiError, ApiErrorBody};
pub use health::{HealthResponse, WidgetCounts};
pub use widgets::{CreateWidget, TooltipRequest};

use crate::config::HomeshelfConfig;
use crate::dashboard;
use crate::logging;
use crate::metrics::PrometheusHandle;
use crate::reachability::ReachabilityChecker;
use crate::shelf::ShelfStore;
use crate::torrents::TorrentService;
use crate::widgets::WidgetHost;
use axum::{
    body::Body,
    http::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<HomeshelfConfig>,
    pub shelf: Arc<ShelfStore>,
    pub checker: Arc<ReachabilityChecker>,
    pub torrents: Arc<TorrentService>,
    pub widgets: Arc<WidgetHost>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// State with the system `ping` prober and the built-in torrent integrations.
    pub fn new(
        config: Arc<HomeshelfConfig>,
        shelf: Arc<ShelfStore>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.request_timeout_seconds))
            .pool_max_idle_per_host(10)
            .build()?;

        let checker = Arc::new(ReachabilityChecker::from_config(&config.reachability));
        let torrents = Arc::new(TorrentService::with_default_clients(
            Arc::clone(&shelf),
            http_client,
        ));

        Ok(Self::with_components(config, shelf, checker, torrents))
    }

    /// State from explicit components.
    pub fn with_components(
        config: Arc<HomeshelfConfig>,
        shelf: Arc<ShelfStore>,
        checker: Arc<ReachabilityChecker>,
        torrents: Arc<TorrentService>,
    ) -> Self {
        let widgets = Arc::new(WidgetHost::new(
            Arc::clone(&shelf),
            torrents.clone(),
            config.polling.policy(),
        ));

        Self {
            config,
            shelf,
            checker,
            torrents,
            widgets,
            start_time: Instant::now(),
            prometheus: crate::metrics::metrics_handle(),
        }
    }
}

/// Create the main router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route(
            "/api/modules/ping",
            get(ping::handle).fallback(ping::method_not_allowed),
        )
        .route("/api/modules/torrents", post(torrents::handle))
        .route(
            "/api/config",
            get(shelf::get_config).put(shelf::put_config),
        )
        .route("/api/shelf", get(shelf::get_tiles))
        .route("/api/services", post(shelf::add_service))
        .route("/api/services/:name", delete(shelf::remove_service))
        .route("/api/widgets/descriptors", get(widgets::descriptors))
        .route("/api/widgets", get(widgets::list).post(widgets::create))
        .route("/api/widgets/:id", delete(widgets::delete))
        .route("/api/widgets/:id/series", get(widgets::series))
        .route("/api/widgets/:id/tooltip", post(widgets::tooltip))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .route("/", get(dashboard::dashboard_handler))
        .route("/assets/*path", get(dashboard::assets_handler))
        .layer(TimeoutLayer::new(timeout))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(logging::REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(axum::middleware::from_fn(logging::request_id))
        .with_state(state)
}
