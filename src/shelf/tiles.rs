//! Shelf tile views.

use serde::Serialize;

use super::{Service, ServiceType};
use crate::reachability::{Reachability, ReachabilityChecker};

/// Services of this type get a reachability check when the shelf renders.
pub const PINGED_SERVICE_TYPE: ServiceType = ServiceType::QBittorrent;

/// One tile of the shelf grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfTile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    /// Only set for pinged service types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachability: Option<Reachability>,
}

impl From<&Service> for ShelfTile {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            url: service.url.clone(),
            icon: service.icon.clone(),
            service_type: service.service_type,
            reachability: None,
        }
    }
}

/// Map services to tiles, in shelf order, and check the pinged ones concurrently.
pub async fn render_shelf(services: &[Service], checker: &ReachabilityChecker) -> Vec<ShelfTile> {
    let mut tiles: Vec<ShelfTile> = services.iter().map(ShelfTile::from).collect();

    let checks = tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| tile.service_type == PINGED_SERVICE_TYPE)
        .map(|(index, tile)| {
            let url = tile.url.clone();
            async move {
                let reachability = match checker.check(&url).await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "Cannot check tile reachability");
                        Reachability::Unreachable
                    }
                };
                (index, reachability)
            }
        })
        .collect::<Vec<_>>();

    for (index, reachability) in futures::future::join_all(checks).await {
        tiles[index].reachability = Some(reachability);
    }

    tiles
}
