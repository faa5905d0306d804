//! Widget polling configuration

use serde::{Deserialize, Serialize};

use crate::polling::RefetchPolicy;

/// Configuration for widget data polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between successful fetches
    pub refresh_interval_ms: u64,
    /// Consecutive failures after which a widget stops polling
    pub max_failures: u32,
}

impl PollingConfig {
    pub fn policy(&self) -> RefetchPolicy {
        RefetchPolicy::new(
            std::time::Duration::from_millis(self.refresh_interval_ms),
            self.max_failures,
        )
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            max_failures: 3,
        }
    }
}
