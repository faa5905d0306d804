//! Shelf document types: services and the persisted document itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::widgets::WidgetInstance;

/// Integration type of a configured service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceType {
    #[serde(rename = "qBittorrent")]
    QBittorrent,
    Transmission,
    Deluge,
    Sonarr,
    Radarr,
    Plex,
    #[default]
    #[serde(other)]
    Other,
}

impl ServiceType {
    /// Whether the service is a torrent client.
    pub fn is_torrent_client(self) -> bool {
        matches!(
            self,
            ServiceType::QBittorrent | ServiceType::Transmission | ServiceType::Deluge
        )
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceType::QBittorrent => "qBittorrent",
            ServiceType::Transmission => "Transmission",
            ServiceType::Deluge => "Deluge",
            ServiceType::Sonarr => "Sonarr",
            ServiceType::Radarr => "Radarr",
            ServiceType::Plex => "Plex",
            ServiceType::Other => "Other",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qbittorrent" => Ok(ServiceType::QBittorrent),
            "transmission" => Ok(ServiceType::Transmission),
            "deluge" => Ok(ServiceType::Deluge),
            "sonarr" => Ok(ServiceType::Sonarr),
            "radarr" => Ok(ServiceType::Radarr),
            "plex" => Ok(ServiceType::Plex),
            "other" => Ok(ServiceType::Other),
            _ => Err(format!("Unknown service type: {}", s)),
        }
    }
}

/// Stands in for a stored password wherever a service leaves the process.
pub const REDACTED_PASSWORD: &str = "********";

/// Login used by torrent-client integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    /// Empty or [`REDACTED_PASSWORD`] on input keeps the stored password
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    fn is_placeholder(&self) -> bool {
        self.password.is_empty() || self.password == REDACTED_PASSWORD
    }
}

/// A configured service (app) on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Stable identifier, referenced by torrent data as `appId`
    #[serde(default = "generate_service_id")]
    pub id: String,
    /// Display name, unique on the shelf
    pub name: String,
    pub url: String,
    /// Icon URL shown on the tile
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub service_type: ServiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

fn generate_service_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Service {
    /// Create a service with a generated id and no credentials.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
        service_type: ServiceType,
    ) -> Self {
        Self {
            id: generate_service_id(),
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
            service_type,
            credentials: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Copy with the password masked.
    pub fn redacted(&self) -> Self {
        let mut service = self.clone();
        if let Some(credentials) = service.credentials.as_mut() {
            credentials.password = REDACTED_PASSWORD.to_string();
        }
        service
    }
}

/// The persisted shelf document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub name: String,
    pub services: Vec<Service>,
    pub widgets: Vec<WidgetInstance>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            services: Vec::new(),
            widgets: Vec::new(),
        }
    }
}

impl ShelfConfig {
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn find_app(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Copy with every password masked.
    pub fn redacted(&self) -> Self {
        Self {
            name: self.name.clone(),
            services: self.services.iter().map(Service::redacted).collect(),
            widgets: self.widgets.clone(),
        }
    }

    /// Fill masked or missing passwords from `stored`, matching services by id
    /// and username. Returns how many passwords were restored.
    pub fn restore_secrets(&mut self, stored: &ShelfConfig) -> usize {
        let mut restored = 0;
        for service in &mut self.services {
            let Some(credentials) = service.credentials.as_mut().filter(|c| c.is_placeholder())
            else {
                continue;
            };
            let previous = stored
                .find_app(&service.id)
                .and_then(|s| s.credentials.as_ref())
                .filter(|c| c.username == credentials.username);
            if let Some(previous) = previous {
                credentials.password = previous.password.clone();
                restored += 1;
            }
        }
        restored
    }
}
