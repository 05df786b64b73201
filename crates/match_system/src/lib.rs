//! # Match System
//!
//! Lifecycle orchestration for one round of play ("match") hosted on a single
//! world. Gameplay behavior lives in independent [`MatchModule`]s supplied by a
//! [`MatchManifest`]; this crate orders, initializes, wires and tears them down.
//!
//! ## Lifecycle
//!
//! ```text
//! PreLoad ─load()─▶ Loading ─▶ Loaded ─enable()─▶ Enabled ─disable()─▶ Disabled ─unload()─▶ Unloaded
//! ```
//!
//! - **Allocation**: core modules, then game modules, in manifest order
//! - **Load**: [`MatchLoadEvent`] first, then every [`LoadPhase`] in order,
//!   modules of a phase in registry order, then [`MatchPostLoadEvent`]
//! - **Listener binding**: modules whose [`MatchModule::as_listener`] returns
//!   a listener are registered with the host [`EventSystem`] right after their
//!   load step and revoked during unload
//! - **Enable / Disable / Unload**: every module in registry order
//!
//! Load order follows phase, not registry position. With core `[A]` (normal)
//! and game `[B (early), C (normal)]`, the registry is `[A, B, C]` but load
//! runs `B, A, C`.
//!
//! ## Failure Policy
//!
//! A module load error stops the sequence immediately and is returned as
//! [`MatchError::ModuleLoad`]. There is no rollback and no retry; the match
//! must be abandoned with [`Match::discard`], which revokes bound listeners
//! without running module teardown. Lookups that find nothing return `None`.
//!
//! [`EventSystem`]: match_event_system::EventSystem

mod binder;
mod broadcaster;
mod error;
mod game_match;
mod lifecycle;
mod manifest;
mod map;
mod module;
mod registry;

pub use binder::ListenerBinder;
pub use broadcaster::{EventBroadcaster, MatchLoadEvent, MatchPostLoadEvent};
pub use error::MatchError;
pub use game_match::{Match, MatchId};
pub use lifecycle::MatchStatus;
pub use manifest::{CatalogManifest, MatchManifest, ModuleCatalog, ModuleFactory};
pub use map::{Location, MapContainer, MapInfo, World};
pub use module::{AsAny, LoadPhase, MatchModule, ModuleError};
pub use registry::ModuleRegistry;
