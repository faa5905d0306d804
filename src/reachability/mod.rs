//! Host reachability probing.
//!
//! A check parses the service URL, resolves its host and sends a single ICMP
//! echo request through the system `ping` binary. The answer is binary:
//! reachable within the timeout or not. No retries, no state.

mod error;

pub use error::ReachabilityError;

use async_trait::async_trait;
use reqwest::Url;
use std::net::IpAddr;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ReachabilityConfig;

/// Outcome of a reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    Reachable,
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self == Reachability::Reachable
    }
}

/// Sends one liveness probe to an address.
#[async_trait]
pub trait Prober: Send + Sync {
    /// `Ok(true)` if the host answered within `timeout`.
    async fn probe(&self, addr: IpAddr, timeout: Duration) -> Result<bool, ReachabilityError>;
}

/// Probes by running the platform `ping` command once.
pub struct SystemPingProber {
    binary: String,
}

impl SystemPingProber {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Prober for SystemPingProber {
    async fn probe(&self, addr: IpAddr, timeout: Duration) -> Result<bool, ReachabilityError> {
        let mut command = tokio::process::Command::new(&self.binary);

        #[cfg(windows)]
        command
            .arg("-n")
            .arg("1")
            .arg("-w")
            .arg(timeout.as_millis().to_string());

        #[cfg(not(windows))]
        command
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(timeout.as_secs().max(1).to_string());

        command
            .arg(addr.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // ping enforces the timeout itself; the outer bound only guards against a hung process.
        let guard = timeout + Duration::from_secs(1);
        match tokio::time::timeout(guard, command.status()).await {
            Ok(Ok(status)) => Ok(status.success()),
            Ok(Err(e)) => Err(ReachabilityError::Probe(format!("{}: {}", self.binary, e))),
            Err(_) => Ok(false),
        }
    }
}

/// Resolves service URLs and probes them.
pub struct ReachabilityChecker {
    prober: Arc<dyn Prober>,
    timeout: Duration,
}

impl ReachabilityChecker {
    pub fn new(prober: Arc<dyn Prober>, timeout: Duration) -> Self {
        Self { prober, timeout }
    }

    pub fn from_config(config: &ReachabilityConfig) -> Self {
        Self::new(
            Arc::new(SystemPingProber::new(config.ping_binary.clone())),
            config.timeout(),
        )
    }

    /// Extract the host of a service URL.
    pub fn hostname(url: &str) -> Result<String, ReachabilityError> {
        let parsed = Url::parse(url).map_err(|e| ReachabilityError::InvalidUrl(format!("{}: {}", url, e)))?;
        match parsed.host_str() {
            // IPv6 literals come back bracketed.
            Some(host) if !host.is_empty() => Ok(host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string()),
            _ => Err(ReachabilityError::MissingHost(url.to_string())),
        }
    }

    async fn resolve(host: &str) -> Option<IpAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Some(ip);
        }
        match tokio::net::lookup_host((host, 0)).await {
            Ok(mut addrs) => addrs.next().map(|a| a.ip()),
            Err(e) => {
                tracing::debug!(host, error = %e, "Hostname resolution failed");
                None
            }
        }
    }

    /// Check one URL. Only an unusable URL is an error; resolution and probe
    /// failures both mean unreachable.
    pub async fn check(&self, url: &str) -> Result<Reachability, ReachabilityError> {
        let host = Self::hostname(url)?;

        let reachability = match Self::resolve(&host).await {
            None => Reachability::Unreachable,
            Some(addr) => match self.prober.probe(addr, self.timeout).await {
                Ok(true) => Reachability::Reachable,
                Ok(false) => Reachability::Unreachable,
                Err(e) => {
                    tracing::warn!(host = %host, error = %e, "Reachability probe could not run");
                    Reachability::Unreachable
                }
            },
        };

        let result = match reachability {
            Reachability::Reachable => "reachable",
            Reachability::Unreachable => "unreachable",
        };
        metrics::counter!("homeshelf_reachability_probes_total", "result" => result).increment(1);
        tracing::debug!(host = %host, result, "Reachability probe finished");

        Ok(reachability)
    }
}
