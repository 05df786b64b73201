//! Built-in match modules shipped with the host.
//!
//! | name         | phase  | role                                        |
//! |--------------|--------|---------------------------------------------|
//! | `timer`      | normal | match clock against the configured limit    |
//! | `teams`      | early  | team list read by the other modules         |
//! | `spawns`     | normal | one `spawn.<team>` map location per team    |
//! | `scoreboard` | late   | per-team scores, listens for score events   |

mod scoreboard;
mod spawns;
mod teams;
mod timer;

pub use scoreboard::{ObjectiveScored, ScoreboardModule};
pub use spawns::SpawnsModule;
pub use teams::TeamsModule;
pub use timer::TimerModule;

use match_system::ModuleCatalog;
use std::time::Duration;

pub const DEFAULT_TEAMS: [&str; 2] = ["red", "blue"];

/// Catalog of every built-in module, keyed by the names used in the
/// configuration file.
pub fn build_catalog(time_limit: Duration) -> ModuleCatalog {
    let mut catalog = ModuleCatalog::new();
    catalog
        .register("timer", move || TimerModule::new(time_limit))
        .register("teams", || TeamsModule::new(DEFAULT_TEAMS))
        .register("spawns", SpawnsModule::new)
        .register("scoreboard", ScoreboardModule::new);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::HostWorld;
    use match_event_system::{create_match_event_system, EventSystem};
    use match_system::{
        Location, MapContainer, MapInfo, Match, MatchError, MatchStatus, ModuleError,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn arena(locations: &[&str]) -> Arc<MapContainer> {
        let locations: HashMap<String, Location> = locations
            .iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), Location::new(i as f64 * 10.0, 64.0, 0.0)))
            .collect();
        Arc::new(MapContainer::new(
            "maps/arena",
            MapInfo {
                name: "Arena".to_string(),
                version: "1.0.0".to_string(),
                authors: vec!["builder".to_string()],
                gametype: "tdm".to_string(),
            },
            locations,
        ))
    }

    fn create_match(
        core: &[&str],
        game: &[&str],
        map: Arc<MapContainer>,
        events: Arc<EventSystem>,
    ) -> Arc<Match> {
        let manifest = build_catalog(Duration::from_secs(60))
            .manifest(core, game)
            .expect("Failed to build manifest");
        Match::new(Arc::new(manifest), Arc::new(HostWorld::new("test")), map, events)
    }

    #[test]
    fn test_catalog_contents() {
        let catalog = build_catalog(Duration::from_secs(1));
        assert_eq!(catalog.names(), vec!["scoreboard", "spawns", "teams", "timer"]);
    }

    #[test]
    fn test_full_match() {
        let events = create_match_event_system();
        let game_match = create_match(
            &["timer"],
            &["scoreboard", "spawns", "teams"],
            arena(&["spawn.red", "spawn.blue", "spawn.spectator"]),
            events.clone(),
        );

        game_match.load().expect("Failed to load match");

        let spawns = game_match
            .first_of_type::<SpawnsModule>()
            .expect("Spawns module missing");
        assert_eq!(spawns.spawn_count(), 2);
        assert!(spawns.spawn_for("red").is_some());
        assert!(spawns.spawn_for("spectator").is_none());

        assert_eq!(game_match.bound_listeners(), vec!["scoreboard"]);
        let scoreboard = game_match
            .first_of_type::<ScoreboardModule>()
            .expect("Scoreboard module missing");
        assert_eq!(scoreboard.score("red"), Some(0));
        assert_eq!(scoreboard.score("blue"), Some(0));

        game_match.enable();
        events.emit(&ObjectiveScored {
            match_id: game_match.id(),
            team: "blue".to_string(),
            points: 3,
        });
        events.emit(&ObjectiveScored {
            match_id: game_match.id(),
            team: "red".to_string(),
            points: 1,
        });
        assert_eq!(
            scoreboard.standings(),
            vec![("blue".to_string(), 3), ("red".to_string(), 1)]
        );

        let timer = game_match
            .first_of_type::<TimerModule>()
            .expect("Timer module missing");
        assert!(timer.remaining() <= timer.limit());

        game_match.disable();
        game_match.unload();

        assert_eq!(game_match.status(), MatchStatus::Unloaded);
        assert_eq!(events.listener_count(), 0);
        assert_eq!(spawns.spawn_count(), 0);
        assert!(scoreboard.standings().is_empty());
    }

    #[test]
    fn test_score_for_unknown_team_is_a_handler_failure() {
        let events = create_match_event_system();
        let game_match = create_match(
            &[],
            &["teams", "scoreboard"],
            arena(&[]),
            events.clone(),
        );
        game_match.load().expect("Failed to load match");

        events.emit(&ObjectiveScored {
            match_id: game_match.id(),
            team: "green".to_string(),
            points: 5,
        });

        assert_eq!(events.get_stats().handler_failures, 1);
    }

    #[test]
    fn test_scores_for_other_matches_are_ignored() {
        let events = create_match_event_system();
        let first = create_match(&[], &["teams", "scoreboard"], arena(&[]), events.clone());
        let second = create_match(&[], &["teams", "scoreboard"], arena(&[]), events.clone());
        first.load().expect("Failed to load first match");
        second.load().expect("Failed to load second match");

        events.emit(&ObjectiveScored {
            match_id: second.id(),
            team: "red".to_string(),
            points: 2,
        });

        let first_board = first
            .first_of_type::<ScoreboardModule>()
            .expect("Scoreboard module missing");
        let second_board = second
            .first_of_type::<ScoreboardModule>()
            .expect("Scoreboard module missing");
        assert_eq!(first_board.score("red"), Some(0));
        assert_eq!(second_board.score("red"), Some(2));
    }

    #[test]
    fn test_missing_spawn_location_fails_load() {
        let game_match = create_match(
            &[],
            &["teams", "spawns"],
            arena(&["spawn.red"]),
            create_match_event_system(),
        );

        match game_match.load() {
            Err(MatchError::ModuleLoad { module, source, .. }) => {
                assert_eq!(module, "spawns");
                assert!(
                    matches!(source, ModuleError::MissingLocation(ref id) if id == "spawn.blue")
                );
            }
            other => panic!("Expected ModuleLoad error, got {:?}", other),
        }
        assert_eq!(game_match.status(), MatchStatus::Loading);
    }

    #[test]
    fn test_scoreboard_requires_teams() {
        let game_match = create_match(&[], &["scoreboard"], arena(&[]), create_match_event_system());

        assert!(matches!(
            game_match.load(),
            Err(MatchError::ModuleLoad {
                source: ModuleError::MissingDependency(_),
                ..
            })
        ));
    }
}
