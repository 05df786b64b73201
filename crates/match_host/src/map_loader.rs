//! Reads a map folder into a [`MapContainer`].
//!
//! A map folder holds a `map.json` with the map's metadata and its named
//! locations:
//!
//! ```json
//! {
//!   "name": "Arena",
//!   "version": "1.0.0",
//!   "authors": ["builder"],
//!   "gametype": "tdm",
//!   "locations": {
//!     "spawn.red": { "x": -20.0, "y": 64.0, "z": 0.0, "yaw": 90.0 }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use match_system::{Location, MapContainer, MapInfo};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const MAP_FILE: &str = "map.json";

#[derive(Debug, Deserialize)]
struct MapDocument {
    #[serde(flatten)]
    info: MapInfo,
    #[serde(default)]
    locations: HashMap<String, Location>,
}

/// Loads `map.json` from `folder`.
pub async fn load_map(folder: &Path) -> Result<MapContainer> {
    let path = folder.join(MAP_FILE);
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read map file {}", path.display()))?;
    let document: MapDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse map file {}", path.display()))?;

    info!(
        "🗺️ Loaded map {} v{} ({}) with {} locations",
        document.info.name,
        document.info.version,
        document.info.gametype,
        document.locations.len()
    );

    Ok(MapContainer::new(folder, document.info, document.locations))
}
