//! World and map data loaned to a match.
//!
//! Both are prepared by the host before the match exists. The match only
//! reads them and never destroys or recreates them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to the simulated world a match is bound to.
pub trait World: Send + Sync + fmt::Debug {
    /// Name of the loaded world.
    fn name(&self) -> &str;
}

/// A named point in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Returns a copy facing the given direction.
    pub fn facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }
}

/// Descriptive information about a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Game type identifier, e.g. `"tdm"` or `"ctf"`
    pub gametype: String,
}

/// Anchor for one map: where it came from, what it is, and its resolved
/// named locations.
#[derive(Debug, Clone)]
pub struct MapContainer {
    source_folder: PathBuf,
    map_info: MapInfo,
    locations: HashMap<String, Location>,
}

impl MapContainer {
    pub fn new(
        source_folder: impl AsRef<Path>,
        map_info: MapInfo,
        locations: HashMap<String, Location>,
    ) -> Self {
        Self {
            source_folder: source_folder.as_ref().to_path_buf(),
            map_info,
            locations,
        }
    }

    pub fn source_folder(&self) -> &Path {
        &self.source_folder
    }

    pub fn map_info(&self) -> &MapInfo {
        &self.map_info
    }

    pub fn locations(&self) -> &HashMap<String, Location> {
        &self.locations
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Locations whose id starts with `prefix`, sorted by id.
    pub fn locations_with_prefix(&self, prefix: &str) -> Vec<(&str, &Location)> {
        let mut found: Vec<(&str, &Location)> = self
            .locations
            .iter()
            .filter(|(id, _)| id.starts_with(prefix))
            .map(|(id, location)| (id.as_str(), location))
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        found
    }
}
