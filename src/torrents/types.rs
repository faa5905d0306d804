//! Normalized torrent data shared by every torrent-client integration.

use serde::{Deserialize, Serialize};

/// One torrent, reduced to the fields the dashboard needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTorrent {
    pub id: String,
    pub name: String,
    /// Bytes per second
    pub download_speed: u64,
    /// Bytes per second
    pub upload_speed: u64,
    /// 0.0 ..= 1.0
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub size: u64,
}

/// Torrents reported by one configured app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentCollection {
    pub app_id: String,
    pub torrents: Vec<NormalizedTorrent>,
}

impl TorrentCollection {
    /// Summed `(download, upload)` rate over all torrents; zero when empty.
    pub fn total_rates(&self) -> (u64, u64) {
        self.torrents.iter().fold((0, 0), |(down, up), t| {
            (
                down.saturating_add(t.download_speed),
                up.saturating_add(t.upload_speed),
            )
        })
    }
}

/// Body of `POST /api/modules/torrents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedTorrentListResponse {
    pub torrents: Vec<TorrentCollection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(down: u64, up: u64) -> NormalizedTorrent {
        NormalizedTorrent {
            id: "h".to_string(),
            name: "t".to_string(),
            download_speed: down,
            upload_speed: up,
            progress: 0.5,
            state: "downloading".to_string(),
            size: 10,
        }
    }

    #[test]
    fn test_total_rates_sums_all_torrents() {
        let collection = TorrentCollection {
            app_id: "qb".to_string(),
            torrents: vec![torrent(100, 10), torrent(50, 5)],
        };
        assert_eq!(collection.total_rates(), (150, 15));
    }

    #[test]
    fn test_total_rates_empty_is_zero() {
        let collection = TorrentCollection {
            app_id: "qb".to_string(),
            torrents: vec![],
        };
        assert_eq!(collection.total_rates(), (0, 0));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let response = NormalizedTorrentListResponse {
            torrents: vec![TorrentCollection {
                app_id: "qb".to_string(),
                torrents: vec![torrent(1, 2)],
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["torrents"][0]["appId"], "qb");
        assert_eq!(json["torrents"][0]["torrents"][0]["downloadSpeed"], 1);
        assert_eq!(json["torrents"][0]["torrents"][0]["uploadSpeed"], 2);
    }
}
