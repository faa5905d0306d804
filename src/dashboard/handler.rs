//! HTTP handlers for dashboard routes

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::RustEmbed;
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::widgets::{self, WidgetDescriptor, WidgetInstance};

/// Placeholder in `index.html` replaced with the initial page data.
const INITIAL_DATA_PLACEHOLDER: &str = r#"<script id="initial-data" type="application/json">{}</script>"#;

/// Embedded dashboard assets from dashboard/ directory
#[derive(RustEmbed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Data the page starts from, so the first paint needs no round trip.
#[derive(Debug, Serialize)]
struct InitialData {
    name: String,
    widgets: Vec<WidgetInstance>,
    descriptors: Vec<WidgetDescriptor>,
    refresh_interval_ms: u64,
}

/// Serves the dashboard HTML page with injected initial data
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(content) = DashboardAssets::get("index.html") else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard HTML not found").into_response();
    };
    let Ok(html) = std::str::from_utf8(&content.data) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid HTML encoding").into_response();
    };

    let shelf = state.shelf.snapshot().await;
    let initial = InitialData {
        name: shelf.name,
        widgets: shelf.widgets,
        descriptors: widgets::descriptors(),
        refresh_interval_ms: state.config.polling.refresh_interval_ms,
    };
    let json = serde_json::to_string(&initial).unwrap_or_else(|_| "{}".to_string());
    // Keep the payload from closing the script element early.
    let json = json.replace("</", "<\\/");

    let html = html.replace(
        INITIAL_DATA_PLACEHOLDER,
        &format!(
            r#"<script id="initial-data" type="application/json">{}</script>"#,
            json
        ),
    );

    Html(html).into_response()
}

/// Serves static assets (CSS, JS, etc.)
pub async fn assets_handler(Path(path): Path<String>) -> Response {
    match DashboardAssets::get(&path) {
        Some(content) => {
            let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime_type.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
