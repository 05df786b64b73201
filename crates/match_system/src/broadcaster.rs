//! Notifications bracketing module loading.

use crate::game_match::Match;
use match_event_system::EventSystem;
use std::sync::Arc;
use tracing::debug;

/// Published after the match's modules are allocated and before any of them
/// loads.
///
/// Core host systems initialize off this event, so they can prepare state that
/// gameplay modules will find during their own load step.
#[derive(Debug, Clone)]
pub struct MatchLoadEvent {
    pub match_ref: Arc<Match>,
}

/// Published after the last module's load step has completed.
#[derive(Debug, Clone)]
pub struct MatchPostLoadEvent {
    pub match_ref: Arc<Match>,
}

/// Publishes the two load notifications for one match.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    events: Arc<EventSystem>,
}

impl EventBroadcaster {
    pub fn new(events: Arc<EventSystem>) -> Self {
        Self { events }
    }

    /// Publishes [`MatchLoadEvent`]; returns the number of handlers notified.
    pub fn pre_load(&self, match_ref: &Arc<Match>) -> usize {
        let notified = self.events.emit(&MatchLoadEvent {
            match_ref: match_ref.clone(),
        });
        debug!("Match {} pre-load notification reached {} handlers", match_ref.id(), notified);
        notified
    }

    /// Publishes [`MatchPostLoadEvent`]; returns the number of handlers notified.
    pub fn post_load(&self, match_ref: &Arc<Match>) -> usize {
        let notified = self.events.emit(&MatchPostLoadEvent {
            match_ref: match_ref.clone(),
        });
        debug!("Match {} post-load notification reached {} handlers", match_ref.id(), notified);
        notified
    }
}
