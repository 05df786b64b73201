//! Configuration management for the match host.
//!
//! Settings are read from a TOML file. A missing file is created with the
//! defaults so a fresh checkout runs out of the box.

use crate::cli::CliArgs;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_duration_secs() -> u64 {
    300
}

fn default_world_name() -> String {
    "world".to_string()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// What to play and for how long
    #[serde(rename = "match")]
    pub game: MatchSettings,
    /// World the match is hosted on
    pub world: WorldSettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Match composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Folder holding `map.json`
    pub map_directory: String,
    /// Infrastructure module names, in registry order
    pub core_modules: Vec<String>,
    /// Game type module names, in registry order
    pub game_modules: Vec<String>,
    /// Match length once enabled
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "default_world_name")]
    pub name: String,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: MatchSettings {
                map_directory: "maps/arena".to_string(),
                core_modules: vec!["timer".to_string()],
                game_modules: vec![
                    "teams".to_string(),
                    "spawns".to_string(),
                    "scoreboard".to_string(),
                ],
                duration_secs: default_duration_secs(),
            },
            world: WorldSettings {
                name: default_world_name(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file settings.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(map_dir) = &args.map_dir {
            self.game.map_directory = map_dir.to_string_lossy().to_string();
        }

        if let Some(duration) = args.duration_secs {
            self.game.duration_secs = duration;
        }

        if let Some(log_level) = &args.log_level {
            self.logging.level = log_level.clone();
        }

        if args.json_logs {
            self.logging.json_format = true;
        }
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.game.map_directory.is_empty() {
            bail!("Map directory cannot be empty");
        }

        if self.game.core_modules.is_empty() && self.game.game_modules.is_empty() {
            bail!("A match needs at least one core or game module");
        }

        let modules = self.game.core_modules.iter().chain(&self.game.game_modules);
        for name in modules {
            if name.trim().is_empty() {
                bail!("Module names cannot be blank");
            }
        }

        if self.game.duration_secs == 0 {
            bail!("Match duration must be at least one second");
        }

        if self.world.name.is_empty() {
            bail!("World name cannot be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.game.map_directory, "maps/arena");
        assert_eq!(config.game.core_modules, vec!["timer"]);
        assert_eq!(config.game.game_modules, vec!["teams", "spawns", "scoreboard"]);
        assert_eq!(config.game.duration_secs, 300);
        assert_eq!(config.world.name, "world");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.game.duration_secs = 0;
        assert!(config.validate().is_err());
        config.game.duration_secs = 60;

        config.game.game_modules.push("  ".to_string());
        assert!(config.validate().is_err());
        config.game.game_modules.pop();

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "warn".to_string();

        config.game.core_modules.clear();
        config.game.game_modules.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            config_path: PathBuf::from("config.toml"),
            map_dir: Some(PathBuf::from("maps/canyon")),
            duration_secs: Some(45),
            log_level: Some("debug".to_string()),
            json_logs: true,
        };

        config.apply_cli(&args);

        assert_eq!(config.game.map_directory, "maps/canyon");
        assert_eq!(config.game.duration_secs, 45);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path)
            .await
            .expect("Failed to load default config");

        assert_eq!(config.game.duration_secs, 300);
        assert!(path.exists());

        let written = fs::read_to_string(&path).await.expect("Failed to read config");
        assert!(written.contains("[match]"));
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[match]
map_directory = "maps/canyon"
core_modules = ["timer"]
game_modules = ["teams", "scoreboard"]

[world]
name = "canyon_world"

[logging]
level = "debug"
json_format = true
"#;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        fs::write(temp_file.path(), toml_content)
            .await
            .expect("Failed to write config");

        let config = AppConfig::load_from_file(temp_file.path())
            .await
            .expect("Failed to load config");

        assert_eq!(config.game.map_directory, "maps/canyon");
        assert_eq!(config.game.game_modules, vec!["teams", "scoreboard"]);
        assert_eq!(config.game.duration_secs, 300);
        assert_eq!(config.world.name, "canyon_world");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_from_invalid_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        fs::write(temp_file.path(), "[match\nmap_directory = ")
            .await
            .expect("Failed to write config");

        assert!(AppConfig::load_from_file(temp_file.path()).await.is_err());
    }
}
