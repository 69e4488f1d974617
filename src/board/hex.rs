//! Terrain description of a single hex
//!
//! Owned by the rule engine; the renderer only reads it.

use serde::{Deserialize, Serialize};

/// Terrain type that can appear in a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    #[default]
    Clear,
    Woods,
    HeavyWoods,
    Water,
    Rough,
    Rubble,
    Pavement,
    Road,
    Building,
    Bridge,
    Swamp,
    Sand,
    Snow,
    Smoke,
    Fire,
}

impl TerrainKind {
    pub fn name(&self) -> &'static str {
        match self {
            TerrainKind::Clear => "clear",
            TerrainKind::Woods => "woods",
            TerrainKind::HeavyWoods => "heavy woods",
            TerrainKind::Water => "water",
            TerrainKind::Rough => "rough",
            TerrainKind::Rubble => "rubble",
            TerrainKind::Pavement => "pavement",
            TerrainKind::Road => "road",
            TerrainKind::Building => "building",
            TerrainKind::Bridge => "bridge",
            TerrainKind::Swamp => "swamp",
            TerrainKind::Sand => "sand",
            TerrainKind::Snow => "snow",
            TerrainKind::Smoke => "smoke",
            TerrainKind::Fire => "fire",
        }
    }

    /// Base-tile precedence; higher wins. Smoke and fire are pure overlays
    /// and never become the base tile.
    fn base_priority(&self) -> Option<u8> {
        match self {
            TerrainKind::Water => Some(12),
            TerrainKind::Building => Some(11),
            TerrainKind::HeavyWoods => Some(10),
            TerrainKind::Woods => Some(9),
            TerrainKind::Swamp => Some(8),
            TerrainKind::Rough => Some(7),
            TerrainKind::Rubble => Some(6),
            TerrainKind::Pavement => Some(5),
            TerrainKind::Road => Some(4),
            TerrainKind::Sand => Some(3),
            TerrainKind::Snow => Some(2),
            TerrainKind::Clear => Some(1),
            TerrainKind::Bridge | TerrainKind::Smoke | TerrainKind::Fire => None,
        }
    }

    /// Levels above the floor this terrain blocks sight through
    pub fn obstruction(&self, level: i32) -> i32 {
        match self {
            TerrainKind::Woods | TerrainKind::HeavyWoods | TerrainKind::Smoke => 2,
            TerrainKind::Building => level,
            _ => 0,
        }
    }

    /// LOS interference contributed when a sight line passes through
    pub fn interference(&self) -> u32 {
        match self {
            TerrainKind::Woods | TerrainKind::Smoke => 1,
            TerrainKind::HeavyWoods => 2,
            _ => 0,
        }
    }
}

/// One terrain layer with its level (water depth, building height, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terrain {
    pub kind: TerrainKind,
    pub level: i32,
}

impl Terrain {
    pub fn new(kind: TerrainKind, level: i32) -> Self {
        Self { kind, level }
    }
}

/// A single hex cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hex {
    pub elevation: i32,
    pub terrains: Vec<Terrain>,
    /// Special display markers (mine field, artillery target, ...), keyed by
    /// asset name
    pub markers: Vec<String>,
}

impl Hex {
    pub fn new(elevation: i32) -> Self {
        Self {
            elevation,
            ..Default::default()
        }
    }

    /// Builder: add a terrain layer (replacing any layer of the same kind)
    pub fn with_terrain(mut self, kind: TerrainKind, level: i32) -> Self {
        self.terrains.retain(|t| t.kind != kind);
        self.terrains.push(Terrain::new(kind, level));
        self
    }

    /// Builder: add a special marker
    pub fn with_marker(mut self, name: impl Into<String>) -> Self {
        self.markers.push(name.into());
        self
    }

    pub fn level_of(&self, kind: TerrainKind) -> Option<i32> {
        self.terrains.iter().find(|t| t.kind == kind).map(|t| t.level)
    }

    pub fn contains(&self, kind: TerrainKind) -> bool {
        self.level_of(kind).is_some()
    }

    /// Water depth (0 when dry)
    pub fn depth(&self) -> i32 {
        self.level_of(TerrainKind::Water).unwrap_or(0).max(0)
    }

    pub fn building_height(&self) -> Option<i32> {
        self.level_of(TerrainKind::Building)
    }

    pub fn bridge_height(&self) -> Option<i32> {
        self.level_of(TerrainKind::Bridge)
    }

    /// Level of the lowest walkable surface (water bottom)
    pub fn floor(&self) -> i32 {
        self.elevation - self.depth()
    }

    /// Terrain that decides the base tile
    pub fn base_kind(&self) -> TerrainKind {
        self.terrains
            .iter()
            .filter_map(|t| t.kind.base_priority().map(|p| (p, t.kind)))
            .max_by_key(|(p, _)| *p)
            .map(|(_, k)| k)
            .unwrap_or(TerrainKind::Clear)
    }

    /// Layers drawn over the base tile, in insertion order
    pub fn overlay_layers(&self) -> impl Iterator<Item = &Terrain> {
        let base = self.base_kind();
        self.terrains.iter().filter(move |t| t.kind != base)
    }

    /// Absolute level up to which this hex blocks a sight line
    pub fn obstruction_height(&self) -> i32 {
        let above = self
            .terrains
            .iter()
            .map(|t| t.kind.obstruction(t.level))
            .max()
            .unwrap_or(0);
        self.elevation + above
    }

    /// Interference a sight line picks up crossing this hex
    pub fn interference(&self) -> u32 {
        self.terrains.iter().map(|t| t.kind.interference()).sum()
    }

    /// Short human-readable description lines
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!("Level {}", self.elevation)];
        for t in &self.terrains {
            match t.kind {
                TerrainKind::Water => lines.push(format!("Water, depth {}", t.level)),
                TerrainKind::Building => lines.push(format!("Building, height {}", t.level)),
                TerrainKind::Bridge => lines.push(format!("Bridge, elevation {}", t.level)),
                kind => lines.push(capitalize(kind.name())),
            }
        }
        lines
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
