use match_system::MatchModule;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Tracks how long the match has been running against its time limit.
pub struct TimerModule {
    limit: Duration,
    started: Mutex<Option<Instant>>,
}

impl TimerModule {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            started: Mutex::new(None),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time since the match was enabled; zero before that.
    pub fn elapsed(&self) -> Duration {
        let started = *self.started.lock();
        started.map(|at| at.elapsed()).unwrap_or_default()
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }
}

impl MatchModule for TimerModule {
    fn name(&self) -> &str {
        "timer"
    }

    fn enable(&self) {
        *self.started.lock() = Some(Instant::now());
        info!("⏱️ Match clock started ({}s limit)", self.limit.as_secs());
    }

    fn disable(&self) {
        info!("⏱️ Match clock stopped after {}s", self.elapsed().as_secs());
    }
}
