//! Reachability probe configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the `/api/modules/ping` probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilityConfig {
    /// Seconds to wait for the echo reply
    pub timeout_seconds: u64,
    /// Name or path of the system ping binary
    pub ping_binary: String,
}

impl ReachabilityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 1,
            ping_binary: "ping".to_string(),
        }
    }
}
