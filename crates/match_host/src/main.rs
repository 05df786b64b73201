//! Main application entry point for the match host
//!
//! Loads the configuration, prepares the world and map, then drives one match
//! through load, enable, disable and unload. The match ends when its time
//! limit runs out or when a termination signal arrives.

mod cli;
mod config;
mod logging;
mod map_loader;
mod match_end;
mod modules;
mod world;

use anyhow::{anyhow, Context, Result};
use cli::CliArgs;
use config::AppConfig;
use match_end::MatchEnd;
use match_event_system::{create_match_event_system, EventSystem};
use match_system::{Match, MatchLoadEvent, MatchPostLoadEvent, ModuleCatalog};
use modules::{ScoreboardModule, TimerModule};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use world::HostWorld;

/// Host application: configuration plus the long-lived event system.
pub struct Application {
    config: AppConfig,
    catalog: ModuleCatalog,
    events: Arc<EventSystem>,
}

impl Application {
    pub async fn new(args: CliArgs) -> Result<Self> {
        // Configuration is loaded before logging so the configured level applies
        let mut config = AppConfig::load_from_file(&args.config_path).await?;
        config.apply_cli(&args);
        config
            .validate()
            .context("Configuration validation failed")?;

        logging::setup_logging(&config.logging)?;

        let catalog = modules::build_catalog(Duration::from_secs(config.game.duration_secs));
        info!(
            "📂 Config: {} | Map: {} | Modules available: {}",
            args.config_path.display(),
            config.game.map_directory,
            catalog.names().join(", ")
        );

        Ok(Self {
            config,
            catalog,
            events: create_match_event_system(),
        })
    }

    /// Host-side observers of the load notifications.
    fn register_host_handlers(&self) {
        self.events.on(|event: &MatchLoadEvent| {
            let game = &event.match_ref;
            info!(
                "🚧 Match {} loading {} modules on {}",
                game.id(),
                game.module_count(),
                game.map().map_info().name
            );
            Ok(())
        });

        self.events.on(|event: &MatchPostLoadEvent| {
            info!(
                "✅ Match {} ready with {} listeners bound",
                event.match_ref.id(),
                event.match_ref.bound_listener_count()
            );
            Ok(())
        });
    }

    pub async fn run(self) -> Result<()> {
        self.register_host_handlers();

        let world = Arc::new(HostWorld::new(&self.config.world.name));
        let map = map_loader::load_map(Path::new(&self.config.game.map_directory)).await?;
        let manifest = self
            .catalog
            .manifest(
                self.config.game.core_modules.as_slice(),
                self.config.game.game_modules.as_slice(),
            )
            .context("Invalid module list")?;

        let game_match = Match::new(
            Arc::new(manifest),
            world.clone(),
            Arc::new(map),
            self.events.clone(),
        );
        info!("🎮 Created match {} on world {}", game_match.id(), self.config.world.name);

        if let Err(e) = game_match.load() {
            game_match.discard();
            return Err(anyhow!(e).context(format!("Match {} failed to load", game_match.id())));
        }

        game_match.enable();

        let limit = Duration::from_secs(self.config.game.duration_secs);
        info!("🛑 Press Ctrl+C to end the match early");
        match match_end::wait_for_match_end(limit).await? {
            MatchEnd::TimeLimit => {
                info!("⏱️ Time limit of {}s reached", limit.as_secs());
            }
            MatchEnd::Interrupted(signal) => {
                let remaining = game_match
                    .first_of_type::<TimerModule>()
                    .map(|timer| timer.remaining().as_secs())
                    .unwrap_or_default();
                warn!("📡 {} received, ending match with {}s left", signal, remaining);
            }
        }

        game_match.disable();
        if let Some(scoreboard) = game_match.first_of_type::<ScoreboardModule>() {
            if let Some((team, points)) = scoreboard.standings().first() {
                info!("🏆 Winner: {} with {} points", team, points);
            }
        }
        game_match.unload();

        let stats = self.events.get_stats();
        info!("📊 Final Statistics:");
        info!("  - Events emitted: {}", stats.events_emitted);
        info!("  - Handler failures: {}", stats.handler_failures);
        info!("  - Handlers still registered: {}", stats.total_handlers);
        info!("👋 World {} up for {}s", self.config.world.name, world.uptime().as_secs());

        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to start application: {:?}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
