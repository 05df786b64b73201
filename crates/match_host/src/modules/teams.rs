use match_system::{LoadPhase, Match, MatchModule, ModuleError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Declares the teams of the match. Loads early so that spawn and score
/// modules can read the team list during their own load step.
pub struct TeamsModule {
    names: Vec<String>,
}

impl TeamsModule {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn team_names(&self) -> &[String] {
        &self.names
    }
}

impl MatchModule for TeamsModule {
    fn name(&self) -> &str {
        "teams"
    }

    fn load_phase(&self) -> LoadPhase {
        LoadPhase::Early
    }

    fn load(&self, _match_ref: &Arc<Match>) -> Result<(), ModuleError> {
        if self.names.is_empty() {
            return Err(ModuleError::InitializationFailed(
                "no teams declared".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                return Err(ModuleError::InitializationFailed(format!(
                    "team {} declared twice",
                    name
                )));
            }
        }

        info!("👥 Teams: {}", self.names.join(", "));
        Ok(())
    }
}
