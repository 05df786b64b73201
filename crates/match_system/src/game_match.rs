//! The match aggregate: identity, loaned resources and its modules.

use crate::binder::ListenerBinder;
use crate::broadcaster::EventBroadcaster;
use crate::lifecycle::MatchStatus;
use crate::manifest::MatchManifest;
use crate::map::{MapContainer, World};
use crate::module::{LoadPhase, MatchModule};
use crate::registry::ModuleRegistry;
use match_event_system::EventSystem;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    /// Creates a new random match ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::str::FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One round of play bound to a single world.
///
/// A match is created once its world is ready and no players are present. It
/// is driven through [`load`](Match::load), [`enable`](Match::enable),
/// [`disable`](Match::disable) and [`unload`](Match::unload), and is never
/// reused afterwards; the next round gets a new match.
///
/// Matches are always handled through `Arc<Match>` because the load
/// notifications and module load steps receive a shared reference to the
/// match that is loading.
///
/// # Examples
///
/// ```rust
/// use match_event_system::create_match_event_system;
/// use match_system::*;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Lobby;
///
/// impl World for Lobby {
///     fn name(&self) -> &str { "lobby" }
/// }
///
/// struct Idle;
///
/// impl MatchModule for Idle {
///     fn name(&self) -> &str { "idle" }
/// }
///
/// let mut catalog = ModuleCatalog::new();
/// catalog.register("idle", || Idle);
/// let manifest = catalog.manifest(&["idle"], &[]).unwrap();
///
/// let map = MapContainer::new(
///     "maps/lobby",
///     MapInfo {
///         name: "Lobby".to_string(),
///         version: "1.0.0".to_string(),
///         authors: vec![],
///         gametype: "lobby".to_string(),
///     },
///     HashMap::new(),
/// );
///
/// let game = Match::new(
///     Arc::new(manifest),
///     Arc::new(Lobby),
///     Arc::new(map),
///     create_match_event_system(),
/// );
///
/// game.load().unwrap();
/// game.enable();
/// assert!(game.first_of_type::<Idle>().is_some());
/// game.disable();
/// game.unload();
/// assert_eq!(game.status(), MatchStatus::Unloaded);
/// ```
pub struct Match {
    pub(crate) id: MatchId,
    pub(crate) manifest: Arc<dyn MatchManifest>,
    pub(crate) world: Arc<dyn World>,
    pub(crate) map: Arc<MapContainer>,
    pub(crate) events: Arc<EventSystem>,
    pub(crate) status: RwLock<MatchStatus>,
    pub(crate) registry: RwLock<ModuleRegistry>,
    pub(crate) broadcaster: EventBroadcaster,
    pub(crate) binder: ListenerBinder,
}

impl Match {
    /// Creates a match with a fresh random id.
    pub fn new(
        manifest: Arc<dyn MatchManifest>,
        world: Arc<dyn World>,
        map: Arc<MapContainer>,
        events: Arc<EventSystem>,
    ) -> Arc<Self> {
        Self::with_id(MatchId::new(), manifest, world, map, events)
    }

    /// Creates a match with a caller-chosen id.
    pub fn with_id(
        id: MatchId,
        manifest: Arc<dyn MatchManifest>,
        world: Arc<dyn World>,
        map: Arc<MapContainer>,
        events: Arc<EventSystem>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            manifest,
            world,
            map,
            broadcaster: EventBroadcaster::new(events.clone()),
            binder: ListenerBinder::new(events.clone()),
            events,
            status: RwLock::new(MatchStatus::PreLoad),
            registry: RwLock::new(ModuleRegistry::new()),
        })
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn manifest(&self) -> &Arc<dyn MatchManifest> {
        &self.manifest
    }

    pub fn world(&self) -> &Arc<dyn World> {
        &self.world
    }

    pub fn map(&self) -> &Arc<MapContainer> {
        &self.map
    }

    /// The host dispatcher, for modules that publish their own events.
    pub fn events(&self) -> &Arc<EventSystem> {
        &self.events
    }

    pub fn status(&self) -> MatchStatus {
        *self.status.read()
    }

    /// Number of modules currently held by the match.
    pub fn module_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Snapshot of all modules in registry order.
    pub fn modules(&self) -> Vec<Arc<dyn MatchModule>> {
        self.registry.read().modules()
    }

    /// First module of type `T`, or `None` when the match has none.
    pub fn first_of_type<T: MatchModule>(&self) -> Option<Arc<T>> {
        self.registry.read().first_of_type::<T>()
    }

    /// All modules of type `T`, in registry order.
    pub fn all_of_type<T: MatchModule>(&self) -> Vec<Arc<T>> {
        self.registry.read().all_of_type::<T>()
    }

    /// Modules declaring `phase`, in registry order.
    pub fn modules_in_phase(&self, phase: LoadPhase) -> Vec<Arc<dyn MatchModule>> {
        self.registry.read().by_phase(phase)
    }

    /// Number of modules currently bound to the event system.
    pub fn bound_listener_count(&self) -> usize {
        self.binder.bound_count()
    }

    /// Names of the modules currently bound to the event system.
    pub fn bound_listeners(&self) -> Vec<String> {
        self.binder.bound_modules()
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Match")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("world", &self.world.name())
            .field("map", &self.map.map_info().name)
            .field("modules", &self.module_count())
            .finish()
    }
}
