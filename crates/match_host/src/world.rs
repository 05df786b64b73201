use match_system::World;
use std::time::{Duration, Instant};

/// The world a match is played on, owned by the host for its whole lifetime.
#[derive(Debug)]
pub struct HostWorld {
    name: String,
    loaded_at: Instant,
}

impl HostWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.loaded_at.elapsed()
    }
}

impl World for HostWorld {
    fn name(&self) -> &str {
        &self.name
    }
}
