use super::teams::TeamsModule;
use match_system::{Location, Match, MatchModule, ModuleError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix of the map locations holding team spawn points.
pub const SPAWN_PREFIX: &str = "spawn.";

/// Resolves one spawn point per team from the map's `spawn.<team>` locations.
#[derive(Default)]
pub struct SpawnsModule {
    spawns: RwLock<HashMap<String, Location>>,
}

impl SpawnsModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_for(&self, team: &str) -> Option<Location> {
        self.spawns.read().get(team).copied()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawns.read().len()
    }
}

impl MatchModule for SpawnsModule {
    fn name(&self) -> &str {
        "spawns"
    }

    fn load(&self, match_ref: &Arc<Match>) -> Result<(), ModuleError> {
        let teams = match_ref
            .first_of_type::<TeamsModule>()
            .ok_or_else(|| ModuleError::MissingDependency("teams".to_string()))?;

        let map = match_ref.map();
        let mut spawns = HashMap::new();
        for team in teams.team_names() {
            let id = format!("{}{}", SPAWN_PREFIX, team);
            let location = map
                .location(&id)
                .ok_or_else(|| ModuleError::MissingLocation(id.clone()))?;
            debug!("Spawn for team {} at {:?}", team, location);
            spawns.insert(team.clone(), *location);
        }

        let unused = map
            .locations_with_prefix(SPAWN_PREFIX)
            .len()
            .saturating_sub(spawns.len());
        if unused > 0 {
            debug!("{} spawn locations on {} belong to no team", unused, map.map_info().name);
        }

        info!("📍 Resolved {} team spawns", spawns.len());
        *self.spawns.write() = spawns;
        Ok(())
    }

    fn unload(&self) {
        self.spawns.write().clear();
    }
}
