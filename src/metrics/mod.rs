//! # Metrics
//!
//! Prometheus export of the few things worth watching on a dashboard server.
//!
//! **Counters:**
//! - `homeshelf_reachability_probes_total{result}` - reachability checks by outcome
//! - `homeshelf_poll_fetches_total{outcome}` - widget poll fetches by outcome
//!
//! **Gauges:**
//! - `homeshelf_widgets_active` - running widget pollers
//! - `homeshelf_services_configured` - services on the shelf

pub mod handler;

pub use handler::metrics_handler;
pub use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Handle of the global recorder, or of a detached one when a recorder is
/// already installed (several app states in one test binary).
pub fn metrics_handle() -> PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating new handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}
