//! The gameplay module contract and its load phases.

use crate::game_match::Match;
use match_event_system::Listener;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Ordering bucket that decides when a module's [`load`](MatchModule::load)
/// runs relative to the other modules of the match.
///
/// Phases run in declaration order. Within a phase, modules load in registry
/// order (core modules first, then game modules).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Earliest,
    Early,
    #[default]
    Normal,
    Late,
    Latest,
}

impl LoadPhase {
    /// Every phase, in the order the lifecycle runner visits them.
    pub const ALL: [LoadPhase; 5] = [
        LoadPhase::Earliest,
        LoadPhase::Early,
        LoadPhase::Normal,
        LoadPhase::Late,
        LoadPhase::Latest,
    ];
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Earliest => "earliest",
            LoadPhase::Early => "early",
            LoadPhase::Normal => "normal",
            LoadPhase::Late => "late",
            LoadPhase::Latest => "latest",
        };
        f.write_str(name)
    }
}

/// Upcasting helpers used for typed module lookup.
///
/// Implemented for every `'static + Send + Sync` type; module authors never
/// implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A unit of gameplay or infrastructure behavior composed into a [`Match`].
///
/// Modules are shared (`Arc`) between the registry and anyone who looks them
/// up, so lifecycle methods take `&self`; modules keep their mutable state
/// behind their own locks or atomics.
///
/// # Lifecycle
///
/// 1. **Load**: [`load`](Self::load) runs once, ordered by [`load_phase`](Self::load_phase).
///    Other modules are already allocated and can be looked up, but only those
///    in earlier phases (or earlier in the same phase) have loaded.
/// 2. **Enable**: the match starts and becomes visible to players.
/// 3. **Disable**: the match has concluded; players may still be present.
/// 4. **Unload**: all players have left; release everything.
///
/// # Examples
///
/// ```rust
/// use match_system::*;
/// use std::sync::Arc;
///
/// struct TimeLimit;
///
/// impl MatchModule for TimeLimit {
///     fn name(&self) -> &str { "time_limit" }
///     fn load_phase(&self) -> LoadPhase { LoadPhase::Early }
/// }
/// ```
pub trait MatchModule: AsAny {
    /// Stable name used in logs and errors.
    fn name(&self) -> &str;

    /// The phase this module loads in.
    fn load_phase(&self) -> LoadPhase {
        LoadPhase::Normal
    }

    /// Initializes the module for the given match.
    ///
    /// An error aborts the whole load sequence; the match is then discarded.
    fn load(&self, _match_ref: &Arc<Match>) -> Result<(), ModuleError> {
        Ok(())
    }

    fn enable(&self) {}

    fn disable(&self) {}

    fn unload(&self) {}

    /// Listener capability.
    ///
    /// Modules that want host notifications override this to return
    /// `Some(self)`; the match binds them to the event system after their load
    /// step and unbinds them on unload.
    fn as_listener(self: Arc<Self>) -> Option<Arc<dyn Listener>> {
        None
    }
}

/// Identity of a module instance, independent of the trait object's vtable.
pub(crate) fn instance_key(module: &Arc<dyn MatchModule>) -> usize {
    Arc::as_ptr(module) as *const () as usize
}

/// Errors raised by a module's load step.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Another module this one relies on is not part of the match
    #[error("Required module not present: {0}")]
    MissingDependency(String),
    /// The map does not define a location this module needs
    #[error("Map location not found: {0}")]
    MissingLocation(String),
    /// Any other unrecoverable initialization failure
    #[error("Module initialization failed: {0}")]
    InitializationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_matches_declaration() {
        let mut sorted = LoadPhase::ALL;
        sorted.sort();
        assert_eq!(sorted, LoadPhase::ALL);
        assert_eq!(LoadPhase::default(), LoadPhase::Normal);
    }

    #[test]
    fn test_phase_serde_names() {
        let phase: LoadPhase = serde_json::from_str("\"earliest\"").expect("Failed to parse phase");
        assert_eq!(phase, LoadPhase::Earliest);
        assert_eq!(LoadPhase::Late.to_string(), "late");
    }
}
