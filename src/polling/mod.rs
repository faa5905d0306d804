//! Periodic data fetching for widgets.
//!
//! A [`PollingQuery`] fetches from a [`DataSource`] once immediately, then
//! again after each refresh interval. Every failed fetch bumps a
//! consecutive-failure counter (a success resets it); once the counter hits
//! [`RefetchPolicy::max_failures`] nothing more is scheduled and the poller
//! halts for good. Recreating the query is the only way to resume.
//!
//! There is no backoff and no jitter, and all errors count the same.

mod error;

pub use error::PollError;

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Something a widget polls.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Output: Send + 'static;

    async fn fetch(&self) -> Result<Self::Output, PollError>;
}

/// When to schedule the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefetchPolicy {
    pub interval: Duration,
    pub max_failures: u32,
}

impl RefetchPolicy {
    pub fn new(interval: Duration, max_failures: u32) -> Self {
        Self {
            interval,
            max_failures,
        }
    }

    /// Delay before the next fetch given the consecutive failure count,
    /// or `None` once the failure budget is spent.
    pub fn next_refetch(&self, failure_count: u32) -> Option<Duration> {
        if failure_count < self.max_failures {
            Some(self.interval)
        } else {
            None
        }
    }
}

impl Default for RefetchPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 3)
    }
}

/// How a polling task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The query key was empty, nothing was fetched
    Disabled,
    /// The cancellation token fired
    Cancelled,
    /// The failure budget was spent
    Halted { failures: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Polling,
    Halted,
}

/// Live counters of a polling task, shared with whoever wants to watch it.
#[derive(Debug, Default)]
pub struct PollStatus {
    fetches: AtomicU64,
    consecutive_failures: AtomicU32,
    halted: AtomicBool,
}

impl PollStatus {
    pub fn fetches(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> PollState {
        if self.is_halted() {
            PollState::Halted
        } else {
            PollState::Polling
        }
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            state: self.state(),
            fetches: self.fetches(),
            consecutive_failures: self.consecutive_failures(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    pub state: PollState,
    pub fetches: u64,
    pub consecutive_failures: u32,
}

/// A keyed, periodically refetched query.
pub struct PollingQuery<S: DataSource + ?Sized> {
    key: String,
    source: Arc<S>,
    policy: RefetchPolicy,
    status: Arc<PollStatus>,
}

impl<S> PollingQuery<S>
where
    S: DataSource + ?Sized + 'static,
{
    pub fn new(key: impl Into<String>, source: Arc<S>, policy: RefetchPolicy) -> Self {
        Self {
            key: key.into(),
            source,
            policy,
            status: Arc::new(PollStatus::default()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> Arc<PollStatus> {
        Arc::clone(&self.status)
    }

    /// A query without a key never fetches.
    pub fn is_enabled(&self) -> bool {
        !self.key.is_empty()
    }

    /// Spawn the polling task. `on_data` runs for every successful fetch, one
    /// at a time, and never after `cancel` fired.
    pub fn start<F, Fut>(self, mut on_data: F, cancel: CancellationToken) -> JoinHandle<PollOutcome>
    where
        F: FnMut(S::Output) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        tokio::spawn(async move {
            if !self.is_enabled() {
                tracing::debug!("Polling query has no key, not starting");
                return PollOutcome::Disabled;
            }

            tracing::debug!(
                key = %self.key,
                interval_ms = self.policy.interval.as_millis() as u64,
                "Polling started"
            );

            let mut failure_count: u32 = 0;
            loop {
                let result = tokio::select! {
                    _ = cancel.cancelled() => return PollOutcome::Cancelled,
                    result = self.source.fetch() => result,
                };
                self.status.fetches.fetch_add(1, Ordering::Relaxed);

                match result {
                    Ok(data) => {
                        failure_count = 0;
                        self.status.consecutive_failures.store(0, Ordering::Relaxed);
                        metrics::counter!("homeshelf_poll_fetches_total", "outcome" => "success")
                            .increment(1);

                        if cancel.is_cancelled() {
                            return PollOutcome::Cancelled;
                        }
                        on_data(data).await;
                    }
                    Err(error) => {
                        failure_count += 1;
                        self.status
                            .consecutive_failures
                            .store(failure_count, Ordering::Relaxed);
                        metrics::counter!("homeshelf_poll_fetches_total", "outcome" => "failure")
                            .increment(1);
                        tracing::warn!(
                            key = %self.key,
                            failure_count,
                            error = %error,
                            "Poll fetch failed"
                        );
                    }
                }

                let Some(delay) = self.policy.next_refetch(failure_count) else {
                    self.status.halted.store(true, Ordering::Relaxed);
                    tracing::warn!(
                        key = %self.key,
                        failures = failure_count,
                        "Polling halted after consecutive failures"
                    );
                    return PollOutcome::Halted {
                        failures: failure_count,
                    };
                };

                tokio::select! {
                    _ = cancel.cancelled() => return PollOutcome::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        })
    }
}
