//! Ping command implementation

use crate::cli::output::format_reachability;
use crate::reachability::{Reachability, ReachabilityChecker};

/// Handle `homeshelf ping <url>`. An unreachable host is an error so the
/// exit status can be scripted.
pub async fn handle_ping(
    url: &str,
    checker: &ReachabilityChecker,
) -> Result<String, Box<dyn std::error::Error>> {
    let host = ReachabilityChecker::hostname(url)?;
    match checker.check(url).await? {
        Reachability::Reachable => Ok(format_reachability(&host, Reachability::Reachable)),
        Reachability::Unreachable => {
            Err(format_reachability(&host, Reachability::Unreachable).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reachability::{Prober, ReachabilityError};
    use async_trait::async_trait;
    use std::net::IpAddr;
    use std::sync::Arc;
    use std::time::Duration;

    struct Answers(bool);

    #[async_trait]
    impl Prober for Answers {
        async fn probe(&self, _: IpAddr, _: Duration) -> Result<bool, ReachabilityError> {
            Ok(self.0)
        }
    }

    fn checker(alive: bool) -> ReachabilityChecker {
        ReachabilityChecker::new(Arc::new(Answers(alive)), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_ping_reachable() {
        colored::control::set_override(false);
        let out = handle_ping("http://10.1.1.1:9000", &checker(true)).await.unwrap();
        assert_eq!(out, "✓ 10.1.1.1 is reachable");
    }

    #[tokio::test]
    async fn test_ping_unreachable_is_error() {
        let err = handle_ping("http://10.1.1.1", &checker(false)).await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_ping_invalid_url() {
        assert!(handle_ping("nope", &checker(true)).await.is_err());
    }
}
