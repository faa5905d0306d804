//! Shared test utilities for Homeshelf integration tests.
//!
//! Builders for shelves, app states with a scripted ping prober, and
//! qBittorrent mocks.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use homeshelf::api::{create_router, AppState};
use homeshelf::config::HomeshelfConfig;
use homeshelf::reachability::{Prober, ReachabilityChecker, ReachabilityError};
use homeshelf::shelf::{MemoryRepository, Service, ServiceType, ShelfConfig, ShelfStore};
use homeshelf::torrents::TorrentService;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Session cookie handed out by the qBittorrent mock.
pub const QB_SID: &str = "SID=integration-session";

// =============================================================================
// Probers
// =============================================================================

/// Answers every probe for the listed addresses, stays silent for the rest.
pub struct ScriptedProber {
    pub alive: Vec<IpAddr>,
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, addr: IpAddr, _timeout: Duration) -> Result<bool, ReachabilityError> {
        Ok(self.alive.contains(&addr))
    }
}

pub fn checker(alive: &[&str]) -> Arc<ReachabilityChecker> {
    let prober = ScriptedProber {
        alive: alive.iter().map(|a| a.parse().unwrap()).collect(),
    };
    Arc::new(ReachabilityChecker::new(
        Arc::new(prober),
        Duration::from_secs(1),
    ))
}

// =============================================================================
// Shelf and state builders
// =============================================================================

pub fn qbittorrent(id: &str, url: &str) -> Service {
    Service::new(format!("qBittorrent {}", id), url, "/icons/qbittorrent.png", ServiceType::QBittorrent)
        .with_id(id)
        .with_credentials("admin", "adminadmin")
}

pub fn memory_shelf(config: ShelfConfig) -> (Arc<ShelfStore>, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::with_config(config));
    let shelf = Arc::new(ShelfStore::mount(repo.clone()).unwrap());
    (shelf, repo)
}

/// Server config with a fast poll interval for widget tests.
pub fn fast_config() -> HomeshelfConfig {
    let mut config = HomeshelfConfig::default();
    config.polling.refresh_interval_ms = 20;
    config
}

pub fn state_with(
    config: HomeshelfConfig,
    shelf: Arc<ShelfStore>,
    alive: &[&str],
) -> Arc<AppState> {
    let torrents = Arc::new(TorrentService::with_default_clients(
        Arc::clone(&shelf),
        reqwest::Client::new(),
    ));
    Arc::new(AppState::with_components(
        Arc::new(config),
        shelf,
        checker(alive),
        torrents,
    ))
}

/// Router and state over an in-memory shelf.
pub fn app(services: Vec<Service>, alive: &[&str]) -> (axum::Router, Arc<AppState>) {
    let (shelf, _) = memory_shelf(ShelfConfig {
        services,
        ..Default::default()
    });
    let state = state_with(fast_config(), shelf, alive);
    (create_router(Arc::clone(&state)), state)
}

// =============================================================================
// Requests
// =============================================================================

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// =============================================================================
// qBittorrent mock
// =============================================================================

/// Start a qBittorrent Web API mock serving `torrents` to logged-in clients.
pub async fn mock_qbittorrent(torrents: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{}; HttpOnly; path=/", QB_SID).as_str())
                .set_body_string("Ok."),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/torrents/info"))
        .and(header("cookie", QB_SID))
        .respond_with(ResponseTemplate::new(200).set_body_json(torrents))
        .mount(&server)
        .await;

    server
}

/// A qBittorrent torrent entry as the Web API returns it.
pub fn qb_torrent(hash: &str, dlspeed: i64, upspeed: i64) -> serde_json::Value {
    serde_json::json!({
        "hash": hash,
        "name": format!("{}.iso", hash),
        "dlspeed": dlspeed,
        "upspeed": upspeed,
        "progress": 0.5,
        "state": "downloading",
        "size": 1_073_741_824_i64,
    })
}
