//! Chart projection and tooltip reconstruction for the traffic widget.
//!
//! Every app history becomes two line series, `download_<appId>` and
//! `upload_<appId>`. A hovered slice delivers the nearest point of every
//! series; [`reconstruct_tooltip`] folds those points back into one
//! download/upload pair per app.

use serde::{Deserialize, Serialize};

use super::history::TrafficHistory;
use crate::shelf::Service;
use crate::widgets::format::human_file_size;

/// Traffic direction encoded in a series id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Download,
    Upload,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::Download => "download_",
            Direction::Upload => "upload_",
        }
    }
}

/// Build the series id for one app and direction.
pub fn serie_id(direction: Direction, app_id: &str) -> String {
    format!("{}{}", direction.prefix(), app_id)
}

/// Split a series id back into direction and app id.
///
/// The app id is everything after the direction prefix, so ids containing
/// underscores survive.
pub fn parse_serie_id(id: &str) -> Option<(Direction, &str)> {
    [Direction::Download, Direction::Upload]
        .into_iter()
        .find_map(|d| id.strip_prefix(d.prefix()).map(|app_id| (d, app_id)))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serie {
    pub id: String,
    pub data: Vec<Datum>,
}

/// Project histories into chart series: all download series, then all upload series.
pub fn project_series(history: &TrafficHistory) -> Vec<Serie> {
    [Direction::Download, Direction::Upload]
        .into_iter()
        .flat_map(|direction| {
            history.clients().iter().map(move |client| Serie {
                id: serie_id(direction, &client.app.id),
                data: client
                    .entries
                    .iter()
                    .map(|entry| Datum {
                        x: entry.x,
                        y: match direction {
                            Direction::Download => entry.download as f64,
                            Direction::Upload => entry.upload as f64,
                        },
                    })
                    .collect(),
            })
        })
        .collect()
}

/// One hovered point of a slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlicePoint {
    pub serie_id: String,
    pub y: f64,
}

/// Reconstructed per-app values of a hovered slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedClientEntry {
    pub app: Service,
    pub download: f64,
    pub upload: f64,
}

/// Regroup slice points by app.
///
/// Values come out in order of first appearance. A direction without a point
/// stays at zero. Points whose app has no history are dropped, and so are
/// series ids without a known direction prefix.
pub fn reconstruct_tooltip(points: &[SlicePoint], history: &TrafficHistory) -> Vec<CapturedClientEntry> {
    let mut values: Vec<CapturedClientEntry> = Vec::new();

    for point in points {
        let Some((direction, app_id)) = parse_serie_id(&point.serie_id) else {
            continue;
        };
        let Some(client) = history.get(app_id) else {
            continue;
        };

        let index = match values.iter().position(|v| v.app.id == client.app.id) {
            Some(index) => index,
            None => {
                values.push(CapturedClientEntry {
                    app: client.app.clone(),
                    download: 0.0,
                    upload: 0.0,
                });
                values.len() - 1
            }
        };

        match direction {
            Direction::Download => values[index].download = point.y,
            Direction::Upload => values[index].upload = point.y,
        }
    }

    values
}

/// Tooltip row as the dashboard draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipLine {
    pub app_id: String,
    pub name: String,
    pub icon: String,
    pub download: f64,
    pub upload: f64,
    pub download_label: String,
    pub upload_label: String,
}

impl From<&CapturedClientEntry> for TooltipLine {
    fn from(value: &CapturedClientEntry) -> Self {
        Self {
            app_id: value.app.id.clone(),
            name: value.app.name.clone(),
            icon: value.app.icon.clone(),
            download: value.download,
            upload: value.upload,
            download_label: format!("{}/s", human_file_size(value.download)),
            upload_label: format!("{}/s", human_file_size(value.upload)),
        }
    }
}
