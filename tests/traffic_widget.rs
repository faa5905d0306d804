//! Traffic widget: history window properties and the widget API end to end.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, empty_request, get, json_request, memory_shelf, mock_qbittorrent, qb_torrent,
    qbittorrent, state_with, fast_config,
};
use homeshelf::api::create_router;
use homeshelf::shelf::{Service, ServiceType, ShelfConfig};
use homeshelf::torrents::{NormalizedTorrent, NormalizedTorrentListResponse, TorrentCollection};
use homeshelf::widgets::traffic::{
    project_series, reconstruct_tooltip, SlicePoint, TrafficHistory, HISTORY_WINDOW,
};
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;
use tower::Service as _;

fn app(id: &str) -> Service {
    Service::new(format!("{} client", id), "http://x", "", ServiceType::QBittorrent).with_id(id)
}

fn sample(app_id: &str, download: u64, upload: u64) -> NormalizedTorrentListResponse {
    NormalizedTorrentListResponse {
        torrents: vec![TorrentCollection {
            app_id: app_id.to_string(),
            torrents: vec![NormalizedTorrent {
                id: "h".to_string(),
                name: "t".to_string(),
                download_speed: download,
                upload_speed: upload,
                progress: 0.0,
                state: String::new(),
                size: 0,
            }],
        }],
    }
}

proptest! {
    #[test]
    fn prop_history_never_exceeds_window(rates in prop::collection::vec((0u64..10_000, 0u64..10_000), 1..120)) {
        let apps = vec![app("app1")];
        let mut history = TrafficHistory::new();

        for (tick, (down, up)) in rates.iter().enumerate() {
            history.record(&sample("app1", *down, *up), &apps, tick as i64);
            let entries = &history.get("app1").unwrap().entries;
            prop_assert!(entries.len() <= HISTORY_WINDOW);
        }

        let entries = &history.get("app1").unwrap().entries;
        let expected = rates.len().min(HISTORY_WINDOW);
        prop_assert_eq!(entries.len(), expected);

        let newest: Vec<u64> = rates[rates.len() - expected..].iter().map(|(d, _)| *d).collect();
        let kept: Vec<u64> = entries.iter().map(|e| e.download).collect();
        prop_assert_eq!(kept, newest);
        prop_assert!(entries.iter().zip(entries.iter().skip(1)).all(|(a, b)| a.x < b.x));
    }

    #[test]
    fn prop_unconfigured_app_gets_no_history(app_id in "[a-z]{1,8}") {
        prop_assume!(app_id != "app1");
        let mut history = TrafficHistory::new();
        history.record(&sample(&app_id, 1, 1), &[app("app1")], 0);
        prop_assert!(history.is_empty());
    }
}

#[test]
fn test_burst_overflow_is_trimmed_by_one_pass() {
    let apps = vec![app("app1")];
    let mut history = TrafficHistory::new();
    for tick in 0..HISTORY_WINDOW as i64 {
        history.record(&sample("app1", 1, 1), &apps, tick);
    }

    history.ingest(&sample("app1", 2, 2), &apps, 100);
    assert_eq!(history.get("app1").unwrap().entries.len(), HISTORY_WINDOW + 1);

    assert_eq!(history.evict_overflow(), 1);
    let entries = &history.get("app1").unwrap().entries;
    assert_eq!(entries.len(), HISTORY_WINDOW);
    assert_eq!(entries.front().unwrap().x, 1);
    assert_eq!(entries.back().unwrap().x, 100);
}

#[test]
fn test_tooltip_regroups_slice_by_app() {
    let apps = vec![app("app1"), app("app2")];
    let mut history = TrafficHistory::new();
    history.record(&sample("app1", 5, 3), &apps, 0);
    history.record(&sample("app2", 7, 1), &apps, 0);

    let series = project_series(&history);
    let ids: Vec<&str> = series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["download_app1", "download_app2", "upload_app1", "upload_app2"]);

    let points = vec![
        SlicePoint { serie_id: "download_app1".to_string(), y: 5.0 },
        SlicePoint { serie_id: "upload_app1".to_string(), y: 3.0 },
        SlicePoint { serie_id: "upload_app2".to_string(), y: 1.0 },
        SlicePoint { serie_id: "download_ghost".to_string(), y: 9.0 },
    ];
    let entries = reconstruct_tooltip(&points, &history);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].app.id, "app1");
    assert_eq!((entries[0].download, entries[0].upload), (5.0, 3.0));
    assert_eq!(entries[1].app.id, "app2");
    assert_eq!((entries[1].download, entries[1].upload), (0.0, 1.0));
}

#[tokio::test]
async fn test_widget_api_charts_live_torrent_traffic() {
    let server = mock_qbittorrent(json!([
        qb_torrent("aaa", 3072, 1024),
        qb_torrent("bbb", 1024, 0),
    ]))
    .await;
    let (shelf, repo) = memory_shelf(ShelfConfig {
        services: vec![qbittorrent("qb1", &server.uri())],
        ..Default::default()
    });
    let mut app = create_router(state_with(fast_config(), shelf, &[]));

    let response = app.call(get("/api/widgets/descriptors")).await.unwrap();
    assert_eq!(body_json(response).await[0]["id"], "dlspeed");

    let response = app
        .call(json_request("POST", "/api/widgets", json!({ "type": "dlspeed" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let widget_id = body_json(response).await["id"].as_str().unwrap().to_string();
    assert_eq!(repo.stored().unwrap().widgets.len(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let response = app
        .call(get(&format!("/api/widgets/{}/series", widget_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let series = body_json(response).await;
    assert_eq!(series[0]["id"], "download_qb1");
    assert_eq!(series[1]["id"], "upload_qb1");
    assert_eq!(series[0]["data"][0]["y"], 4096.0);
    assert_eq!(series[1]["data"][0]["y"], 1024.0);

    let response = app
        .call(json_request(
            "POST",
            &format!("/api/widgets/{}/tooltip", widget_id),
            json!({ "points": [
                { "serieId": "download_qb1", "y": 4096.0 },
                { "serieId": "upload_qb1", "y": 1024.0 }
            ]}),
        ))
        .await
        .unwrap();
    let lines = body_json(response).await;
    assert_eq!(lines[0]["name"], "qBittorrent qb1");
    assert_eq!(lines[0]["download_label"], "4.0 KiB/s");
    assert_eq!(lines[0]["upload_label"], "1.0 KiB/s");

    let response = app
        .call(empty_request("DELETE", &format!("/api/widgets/{}", widget_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .call(get(&format!("/api/widgets/{}/series", widget_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_widget_type_is_bad_request() {
    let (shelf, _) = memory_shelf(ShelfConfig::default());
    let mut app = create_router(state_with(fast_config(), shelf, &[]));

    let response = app
        .call(json_request("POST", "/api/widgets", json!({ "type": "weather" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_widget_halts_after_three_failures_and_health_degrades() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::any())
        .respond_with(wiremock::ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let (shelf, _) = memory_shelf(ShelfConfig {
        services: vec![qbittorrent("qb1", &server.uri())],
        ..Default::default()
    });
    let state = state_with(fast_config(), shelf, &[]);
    let mut app = create_router(state.clone());

    let response = app
        .call(json_request("POST", "/api/widgets", json!({ "type": "dlspeed" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    tokio::time::sleep(Duration::from_millis(400)).await;

    let response = app.call(get("/api/widgets")).await.unwrap();
    let widgets = body_json(response).await;
    assert_eq!(widgets[0]["polling"]["state"], "halted");
    assert_eq!(widgets[0]["polling"]["fetches"], 3);

    let response = app.call(get("/health")).await.unwrap();
    let health = body_json(response).await;
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["widgets"]["halted"], 1);

    state.widgets.shutdown();
}
