use super::teams::TeamsModule;
use match_event_system::{EventError, Listener, Subscriptions};
use match_system::{LoadPhase, Match, MatchId, MatchModule, MatchPostLoadEvent, ModuleError};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Published by gameplay code when a team completes an objective.
#[derive(Debug, Clone)]
pub struct ObjectiveScored {
    pub match_id: MatchId,
    pub team: String,
    pub points: u32,
}

/// Keeps per-team scores.
///
/// The board is opened once every module has loaded and then follows
/// [`ObjectiveScored`] events for its own match only.
#[derive(Default)]
pub struct ScoreboardModule {
    match_id: RwLock<Option<MatchId>>,
    teams: RwLock<Vec<String>>,
    scores: RwLock<BTreeMap<String, u32>>,
}

impl ScoreboardModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, team: &str) -> Option<u32> {
        self.scores.read().get(team).copied()
    }

    /// Teams ordered by points, highest first; ties by name.
    pub fn standings(&self) -> Vec<(String, u32)> {
        let mut standings: Vec<(String, u32)> = self
            .scores
            .read()
            .iter()
            .map(|(team, points)| (team.clone(), *points))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        standings
    }

    fn owns(&self, match_id: MatchId) -> bool {
        *self.match_id.read() == Some(match_id)
    }

    fn open_board(&self) {
        let teams = self.teams.read();
        let mut scores = self.scores.write();
        scores.clear();
        for team in teams.iter() {
            scores.insert(team.clone(), 0);
        }
        info!("📋 Scoreboard open for {} teams", scores.len());
    }

    fn record(&self, event: &ObjectiveScored) -> Result<(), EventError> {
        let mut scores = self.scores.write();
        let score = scores.get_mut(&event.team).ok_or_else(|| {
            EventError::HandlerExecution(format!("unknown team {}", event.team))
        })?;
        *score += event.points;
        debug!("Team {} scored {} (total {})", event.team, event.points, score);
        Ok(())
    }
}

impl MatchModule for ScoreboardModule {
    fn name(&self) -> &str {
        "scoreboard"
    }

    fn load_phase(&self) -> LoadPhase {
        LoadPhase::Late
    }

    fn load(&self, match_ref: &Arc<Match>) -> Result<(), ModuleError> {
        let teams = match_ref
            .first_of_type::<TeamsModule>()
            .ok_or_else(|| ModuleError::MissingDependency("teams".to_string()))?;

        *self.teams.write() = teams.team_names().to_vec();
        *self.match_id.write() = Some(match_ref.id());
        Ok(())
    }

    fn disable(&self) {
        for (rank, (team, points)) in self.standings().iter().enumerate() {
            info!("🏆 #{} {} - {} points", rank + 1, team, points);
        }
    }

    fn unload(&self) {
        self.scores.write().clear();
        self.teams.write().clear();
        *self.match_id.write() = None;
    }

    fn as_listener(self: Arc<Self>) -> Option<Arc<dyn Listener>> {
        Some(self)
    }
}

impl Listener for ScoreboardModule {
    fn listener_name(&self) -> &str {
        "scoreboard"
    }

    fn subscribe(self: Arc<Self>, subscriptions: &mut Subscriptions) {
        let board = self.clone();
        subscriptions
            .on(move |event: &MatchPostLoadEvent| {
                if board.owns(event.match_ref.id()) {
                    board.open_board();
                }
                Ok(())
            })
            .on(move |event: &ObjectiveScored| {
                if !self.owns(event.match_id) {
                    return Ok(());
                }
                self.record(event)
            });
    }
}
