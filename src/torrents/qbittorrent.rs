//! qBittorrent Web API (v2) integration.

use async_trait::async_trait;
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{NormalizedTorrent, TorrentClient, TorrentError};
use crate::shelf::{Credentials, Service, ServiceType};

/// Entry of `GET /api/v2/torrents/info`.
#[derive(Debug, Deserialize)]
struct TorrentInfo {
    hash: String,
    name: String,
    #[serde(default)]
    dlspeed: i64,
    #[serde(default)]
    upspeed: i64,
    #[serde(default)]
    progress: f64,
    #[serde(default)]
    state: String,
    #[serde(default)]
    size: i64,
}

impl From<TorrentInfo> for NormalizedTorrent {
    fn from(info: TorrentInfo) -> Self {
        Self {
            id: info.hash,
            name: info.name,
            download_speed: info.dlspeed.max(0) as u64,
            upload_speed: info.upspeed.max(0) as u64,
            progress: info.progress,
            state: info.state,
            size: info.size.max(0) as u64,
        }
    }
}

/// Talks to qBittorrent instances configured on the shelf.
pub struct QBittorrentClient {
    http: reqwest::Client,
}

impl QBittorrentClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Log in and return the session cookie (`SID=...`).
    async fn login(&self, base: &str, credentials: &Credentials) -> Result<String, TorrentError> {
        let response = self
            .http
            .post(format!("{}/api/v2/auth/login", base))
            .header(REFERER, base)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::FORBIDDEN {
            return Err(TorrentError::Authentication(base.to_string()));
        }
        if !response.status().is_success() {
            return Err(TorrentError::UnexpectedStatus(response.status().as_u16()));
        }

        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.trim_start().starts_with("SID="))
            .map(|pair| pair.trim().to_string());

        let body = response.text().await?;
        match cookie {
            Some(cookie) if body.trim() != "Fails." => Ok(cookie),
            _ => Err(TorrentError::Authentication(base.to_string())),
        }
    }
}

#[async_trait]
impl TorrentClient for QBittorrentClient {
    fn supports(&self, service_type: ServiceType) -> bool {
        service_type == ServiceType::QBittorrent
    }

    async fn list_torrents(&self, service: &Service) -> Result<Vec<NormalizedTorrent>, TorrentError> {
        let base = service.url.trim_end_matches('/');

        // Without credentials rely on qBittorrent's localhost/subnet auth bypass.
        let cookie = match &service.credentials {
            Some(credentials) => Some(self.login(base, credentials).await?),
            None => None,
        };

        let mut request = self.http.get(format!("{}/api/v2/torrents/info", base));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                return Err(TorrentError::Authentication(base.to_string()))
            }
            status if !status.is_success() => {
                return Err(TorrentError::UnexpectedStatus(status.as_u16()))
            }
            _ => {}
        }

        let body = response.text().await?;
        let torrents: Vec<TorrentInfo> =
            serde_json::from_str(&body).map_err(|e| TorrentError::Parse(e.to_string()))?;

        Ok(torrents.into_iter().map(NormalizedTorrent::from).collect())
    }
}
