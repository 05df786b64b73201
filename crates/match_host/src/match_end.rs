//! Waiting for a running match to end.
//!
//! A match ends when its time limit runs out or when the process receives a
//! termination signal. Either way the host still disables and unloads it.

use anyhow::Result;
use std::time::Duration;
use tokio::time;

/// Why a running match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEnd {
    TimeLimit,
    /// Name of the signal that cut the match short
    Interrupted(&'static str),
}

/// Resolves at the time limit or at the first SIGINT/SIGTERM (Ctrl+C on
/// Windows), whichever comes first.
pub async fn wait_for_match_end(limit: Duration) -> Result<MatchEnd> {
    let time_limit = time::sleep(limit);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        Ok(tokio::select! {
            _ = time_limit => MatchEnd::TimeLimit,
            _ = sigint.recv() => MatchEnd::Interrupted("SIGINT"),
            _ = sigterm.recv() => MatchEnd::Interrupted("SIGTERM"),
        })
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = time_limit => Ok(MatchEnd::TimeLimit),
            result = tokio::signal::ctrl_c() => {
                result?;
                Ok(MatchEnd::Interrupted("Ctrl+C"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_time_limit_ends_match() {
        let end = wait_for_match_end(Duration::from_millis(10))
            .await
            .expect("Failed to wait for match end");

        assert_eq!(end, MatchEnd::TimeLimit);
    }
}
