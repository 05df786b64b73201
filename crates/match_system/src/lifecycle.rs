//! The match state machine: load, enable, disable, unload.

use crate::error::MatchError;
use crate::game_match::Match;
use crate::module::LoadPhase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where a match is in its lifecycle.
///
/// `PreLoad → Loading → Loaded → Enabled → Disabled → Unloaded`. A match
/// whose load failed stays in `Loading` and must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    PreLoad,
    Loading,
    Loaded,
    Enabled,
    Disabled,
    Unloaded,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStatus::PreLoad => "pre-load",
            MatchStatus::Loading => "loading",
            MatchStatus::Loaded => "loaded",
            MatchStatus::Enabled => "enabled",
            MatchStatus::Disabled => "disabled",
            MatchStatus::Unloaded => "unloaded",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Lifecycle Phase Runner
// ============================================================================

impl Match {
    /// Moves the status to `next`, warning when the match was not in
    /// `expected`. Out-of-order calls are not rejected.
    fn transition(&self, expected: MatchStatus, next: MatchStatus) {
        let mut status = self.status.write();
        if *status != expected {
            warn!(
                "Match {} entering {} from {} (expected {})",
                self.id, next, *status, expected
            );
        }
        debug!("Match {} status {} -> {}", self.id, *status, next);
        *status = next;
    }

    /// Allocates the modules, then loads them phase by phase.
    ///
    /// Called right after the world has loaded; no players are present yet.
    ///
    /// 1. Core then game modules are allocated from the manifest
    /// 2. [`MatchLoadEvent`](crate::MatchLoadEvent) is published
    /// 3. For each [`LoadPhase`] in order, every module of that phase loads in
    ///    registry order and, if it is a listener, is bound to the event system
    /// 4. [`MatchPostLoadEvent`](crate::MatchPostLoadEvent) is published
    ///
    /// The first module load failure stops the sequence: no later module loads,
    /// the post-load notification is not published and the match stays in
    /// [`MatchStatus::Loading`]. Such a match must be abandoned with
    /// [`discard`](Match::discard).
    pub fn load(self: &Arc<Self>) -> Result<(), MatchError> {
        let allocated = self.registry.write().allocate(self.manifest.as_ref())?;
        self.transition(MatchStatus::PreLoad, MatchStatus::Loading);
        info!(
            "Match {} allocated {} modules on world {}",
            self.id,
            allocated,
            self.world.name()
        );

        self.broadcaster.pre_load(self);

        for phase in LoadPhase::ALL {
            let modules = self.registry.read().by_phase(phase);
            for module in modules {
                debug!("Loading module {} ({} phase)", module.name(), phase);
                module.load(self).map_err(|source| {
                    error!(
                        "❌ Module {} failed to load in {} phase: {}",
                        module.name(),
                        phase,
                        source
                    );
                    MatchError::ModuleLoad {
                        module: module.name().to_string(),
                        phase,
                        source,
                    }
                })?;

                self.binder.bind(&module);
            }
        }

        info!(
            "Loaded {} modules ({} listeners)",
            allocated,
            self.binder.bound_count()
        );

        self.broadcaster.post_load(self);
        self.transition(MatchStatus::Loading, MatchStatus::Loaded);
        Ok(())
    }

    /// Starts the match. Every module is enabled in registry order.
    pub fn enable(&self) {
        self.transition(MatchStatus::Loaded, MatchStatus::Enabled);
        for module in self.modules() {
            debug!("Enabling module {}", module.name());
            module.enable();
        }
        info!("Match {} enabled", self.id);
    }

    /// Ends the match. Every module is disabled in registry order; players may
    /// still be present.
    pub fn disable(&self) {
        self.transition(MatchStatus::Enabled, MatchStatus::Disabled);
        for module in self.modules() {
            debug!("Disabling module {}", module.name());
            module.disable();
        }
        info!("Match {} disabled", self.id);
    }

    /// Tears the match down after all players have left.
    ///
    /// Every module is unloaded in registry order and unbound from the event
    /// system if it was bound. The match then drops its module references.
    /// This is the last call before the world itself is unloaded by the host.
    pub fn unload(&self) {
        let modules = self.modules();
        for module in &modules {
            debug!("Unloading module {}", module.name());
            module.unload();
            self.binder.unbind(module);
        }

        let leftover = self.binder.unbind_all();
        if leftover > 0 {
            warn!("Match {} revoked {} bindings of unknown modules", self.id, leftover);
        }

        let released = self.registry.write().release();
        self.transition(MatchStatus::Disabled, MatchStatus::Unloaded);
        info!("Match {} unloaded ({} modules released)", self.id, released);
    }

    /// Abandons a match whose load failed.
    ///
    /// Revokes the listeners bound before the failure and drops the module
    /// references. No module teardown runs, since some modules never loaded,
    /// and the status is left as the failed load set it.
    pub fn discard(&self) {
        let revoked = self.binder.unbind_all();
        let released = self.registry.write().release();
        warn!(
            "Match {} discarded in {} status ({} modules released, {} bindings revoked)",
            self.id,
            self.status(),
            released,
            revoked
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(MatchStatus::PreLoad.to_string(), "pre-load");
        assert_eq!(MatchStatus::Unloaded.to_string(), "unloaded");
    }
}
