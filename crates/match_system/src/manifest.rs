//! Manifests supply the module instances for a match configuration.

use crate::error::MatchError;
use crate::module::MatchModule;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of the ordered module instances for one match.
///
/// Each call returns fresh, ready-to-load instances. The registry places all
/// core modules before all game modules.
pub trait MatchManifest: Send + Sync {
    /// Infrastructure modules every match of this configuration needs.
    fn core_modules(&self) -> Vec<Arc<dyn MatchModule>>;

    /// Modules implementing the game type itself.
    fn game_modules(&self) -> Vec<Arc<dyn MatchModule>>;
}

/// Constructor stored in a [`ModuleCatalog`].
pub type ModuleFactory = Arc<dyn Fn() -> Arc<dyn MatchModule> + Send + Sync>;

/// Registry of named module constructors.
///
/// Hosts register every module type they ship once at startup, then build a
/// [`CatalogManifest`] per match configuration from plain module names.
#[derive(Default)]
pub struct ModuleCatalog {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under `name`, replacing any previous one.
    pub fn register<M, F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        M: MatchModule,
        F: Fn() -> M + Send + Sync + 'static,
    {
        let factory: ModuleFactory = Arc::new(move || Arc::new(constructor()) as Arc<dyn MatchModule>);
        if self.factories.insert(name.to_string(), factory).is_some() {
            warn!("Module {} registered twice; keeping the latest constructor", name);
        } else {
            debug!("Registered module constructor: {}", name);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves module names into a manifest.
    ///
    /// Fails with [`MatchError::UnknownModule`] on the first name with no
    /// registered constructor.
    pub fn manifest<S: AsRef<str>>(
        &self,
        core: &[S],
        game: &[S],
    ) -> Result<CatalogManifest, MatchError> {
        Ok(CatalogManifest {
            core: self.resolve(core)?,
            game: self.resolve(game)?,
        })
    }

    fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<(String, ModuleFactory)>, MatchError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.factories
                    .get(name)
                    .map(|factory| (name.to_string(), factory.clone()))
                    .ok_or_else(|| MatchError::UnknownModule(name.to_string()))
            })
            .collect()
    }
}

/// Manifest built from a [`ModuleCatalog`]; constructs new instances on
/// every allocation.
#[derive(Clone)]
pub struct CatalogManifest {
    core: Vec<(String, ModuleFactory)>,
    game: Vec<(String, ModuleFactory)>,
}

impl CatalogManifest {
    pub fn core_names(&self) -> Vec<&str> {
        self.core.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn game_names(&self) -> Vec<&str> {
        self.game.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl std::fmt::Debug for CatalogManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogManifest")
            .field("core", &self.core_names())
            .field("game", &self.game_names())
            .finish()
    }
}

impl MatchManifest for CatalogManifest {
    fn core_modules(&self) -> Vec<Arc<dyn MatchModule>> {
        self.core.iter().map(|(_, factory)| factory()).collect()
    }

    fn game_modules(&self) -> Vec<Arc<dyn MatchModule>> {
        self.game.iter().map(|(_, factory)| factory()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Teams;

    impl MatchModule for Teams {
        fn name(&self) -> &str {
            "teams"
        }
    }

    struct Scores;

    impl MatchModule for Scores {
        fn name(&self) -> &str {
            "scores"
        }
    }

    fn catalog() -> ModuleCatalog {
        let mut catalog = ModuleCatalog::new();
        catalog.register("teams", || Teams).register("scores", || Scores);
        catalog
    }

    #[test]
    fn test_catalog_names() {
        let catalog = catalog();
        assert_eq!(catalog.names(), vec!["scores", "teams"]);
        assert!(catalog.contains("teams"));
        assert!(!catalog.contains("spawns"));
    }

    #[test]
    fn test_manifest_resolves_in_order() {
        let manifest = catalog()
            .manifest(&["teams"], &["scores", "teams"])
            .expect("Failed to build manifest");

        let core: Vec<String> = manifest.core_modules().iter().map(|m| m.name().to_string()).collect();
        let game: Vec<String> = manifest.game_modules().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(core, vec!["teams"]);
        assert_eq!(game, vec!["scores", "teams"]);
    }

    #[test]
    fn test_manifest_builds_fresh_instances() {
        let manifest = catalog()
            .manifest(&["teams"], &[] as &[&str])
            .expect("Failed to build manifest");

        let first = manifest.core_modules().remove(0);
        let second = manifest.core_modules().remove(0);
        assert!(!Arc::ptr_eq(&first.into_any_arc(), &second.into_any_arc()));
    }

    #[test]
    fn test_unknown_module_rejected() {
        let result = catalog().manifest(&["teams"], &["capture_the_flag"]);
        match result {
            Err(MatchError::UnknownModule(name)) => assert_eq!(name, "capture_the_flag"),
            other => panic!("Expected UnknownModule, got {:?}", other.map(|_| ())),
        }
    }
}
