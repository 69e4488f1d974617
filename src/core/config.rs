//! Render configuration
//!
//! One immutable struct carries every color, toggle and threshold the board
//! view reads. It is handed to the view at construction and only replaced
//! through an explicit reconfigure call, so nothing reads display settings
//! from process-wide state.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::TerrainKind;
use crate::core::error::{RenderError, Result};
use crate::core::types::{Color, PlayerId};

/// Configuration for the board renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    // === ZOOM ===
    /// Available scale factors, ascending. Zoom in/out steps through these.
    pub zoom_levels: Vec<f64>,

    /// Index into `zoom_levels` used for a fresh viewport
    pub default_zoom_index: usize,

    /// Below this scale hex text (index, elevation, depth) is illegible and
    /// is skipped entirely.
    pub text_min_scale: f64,

    // === ANIMATION ===
    /// Period of the free-running tick loop
    pub tick_period_ms: u64,

    /// Idle time that must accumulate before every moving unit advances one
    /// waypoint. Movement speed depends on this alone, not on frame rate.
    pub move_step_delay_ms: u64,

    /// Time a HUD panel takes to slide fully in or out
    pub hud_slide_ms: u64,

    // === OVERLAYS ===
    /// Alpha of the darkening layer over unlit hexes at night
    pub night_alpha: u8,

    /// Alpha applied to field-overlay tints
    pub field_alpha: u8,

    pub show_hex_numbers: bool,
    pub show_elevation_text: bool,
    pub show_links: bool,
    pub show_field_overlay: bool,

    /// Default heights used by the two-click LOS probe
    pub los: LosHeights,

    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            zoom_levels: vec![0.3, 0.5, 0.7, 0.85, 1.0, 1.25, 1.5, 2.0],
            default_zoom_index: 4,
            text_min_scale: 0.5,

            tick_period_ms: 20,
            move_step_delay_ms: 100,
            hud_slide_ms: 250,

            night_alpha: 140,
            field_alpha: 90,
            show_hex_numbers: true,
            show_elevation_text: true,
            show_links: true,
            show_field_overlay: true,

            los: LosHeights::default(),
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.zoom_levels.is_empty() {
            return Err(RenderError::InvalidConfig("zoom_levels is empty".into()));
        }
        if self
            .zoom_levels
            .iter()
            .any(|z| !z.is_finite() || *z <= 0.0)
        {
            return Err(RenderError::InvalidConfig(
                "zoom_levels must all be finite and > 0".into(),
            ));
        }
        if self.zoom_levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RenderError::InvalidConfig(
                "zoom_levels must be strictly ascending".into(),
            ));
        }
        if self.default_zoom_index >= self.zoom_levels.len() {
            return Err(RenderError::InvalidConfig(format!(
                "default_zoom_index ({}) out of range for {} zoom levels",
                self.default_zoom_index,
                self.zoom_levels.len()
            )));
        }
        if self.tick_period_ms == 0 || self.move_step_delay_ms == 0 {
            return Err(RenderError::InvalidConfig(
                "tick_period_ms and move_step_delay_ms must be positive".into(),
            ));
        }
        if !self.text_min_scale.is_finite() || self.text_min_scale < 0.0 {
            return Err(RenderError::InvalidConfig(
                "text_min_scale must be finite and >= 0".into(),
            ));
        }
        if self.palette.players.is_empty() {
            return Err(RenderError::InvalidConfig("palette.players is empty".into()));
        }
        Ok(())
    }

    /// Scale factor of the default zoom level
    pub fn default_scale(&self) -> f64 {
        self.zoom_levels[self.default_zoom_index]
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn move_step_delay(&self) -> Duration {
        Duration::from_millis(self.move_step_delay_ms)
    }

    pub fn hud_slide(&self) -> Duration {
        Duration::from_millis(self.hud_slide_ms)
    }
}

/// Unit heights assumed by the LOS probe (levels above the hex floor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LosHeights {
    pub attacker: i32,
    pub target: i32,
}

impl Default for LosHeights {
    fn default() -> Self {
        Self {
            attacker: 1,
            target: 1,
        }
    }
}

/// Every color the renderer draws with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub terrain: TerrainPalette,
    /// Player colors, indexed by `PlayerId` modulo length
    pub players: Vec<Color>,

    // Cursors, lowest to highest priority
    pub cursor: Color,
    pub highlight: Color,
    pub selection: Color,
    pub first_los: Color,
    pub second_los: Color,

    pub elevation_border: Color,
    pub hex_outline: Color,
    pub text: Color,
    pub wreck: Color,
    pub ghost_alpha: u8,
    pub link: Color,
    pub arrow_outline: Color,
    pub ruler: Color,
    pub deployment: Color,
    pub field_default: Color,
    pub marker: Color,
    pub placeholder: Color,
    pub hud_background: Color,

    pub step_walk: Color,
    pub step_run: Color,
    pub step_jump: Color,
    pub step_turn: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(26, 26, 31),
            terrain: TerrainPalette::default(),
            players: vec![
                Color::rgb(60, 110, 230),
                Color::rgb(210, 50, 40),
                Color::rgb(230, 200, 40),
                Color::rgb(50, 170, 80),
                Color::rgb(170, 80, 200),
                Color::rgb(240, 140, 30),
            ],

            cursor: Color::rgba(255, 255, 255, 160),
            highlight: Color::rgb(255, 255, 255),
            selection: Color::rgb(0, 220, 255),
            first_los: Color::rgb(255, 0, 0),
            second_los: Color::rgb(0, 0, 255),

            elevation_border: Color::rgb(20, 20, 20),
            hex_outline: Color::rgba(0, 0, 0, 90),
            text: Color::rgb(10, 10, 10),
            wreck: Color::rgb(70, 70, 70),
            ghost_alpha: 110,
            link: Color::rgb(0, 200, 200),
            arrow_outline: Color::rgb(0, 0, 0),
            ruler: Color::rgb(255, 255, 0),
            deployment: Color::rgba(255, 255, 0, 70),
            field_default: Color::rgb(120, 60, 220),
            marker: Color::rgba(255, 80, 0, 110),
            placeholder: Color::rgb(128, 128, 128),
            hud_background: Color::rgba(0, 0, 0, 180),

            step_walk: Color::rgb(100, 220, 100),
            step_run: Color::rgb(240, 220, 60),
            step_jump: Color::rgb(220, 60, 60),
            step_turn: Color::rgb(200, 200, 200),
        }
    }
}

impl Palette {
    /// Color for a player; wraps around the configured list. An empty list
    /// (only reachable with an unvalidated config) falls back to the
    /// placeholder color.
    pub fn player(&self, player: PlayerId) -> Color {
        match self.players.len() {
            0 => self.placeholder,
            n => self.players[player.0 as usize % n],
        }
    }
}

/// Flat fill per base terrain, used when no tile image is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainPalette {
    pub clear: Color,
    pub woods: Color,
    pub heavy_woods: Color,
    pub water: Color,
    pub rough: Color,
    pub rubble: Color,
    pub pavement: Color,
    pub road: Color,
    pub building: Color,
    pub bridge: Color,
    pub swamp: Color,
    pub sand: Color,
    pub snow: Color,
    pub smoke: Color,
    pub fire: Color,
}

impl Default for TerrainPalette {
    fn default() -> Self {
        Self {
            clear: Color::rgb(196, 202, 150),
            woods: Color::rgb(96, 150, 70),
            heavy_woods: Color::rgb(50, 105, 45),
            water: Color::rgb(70, 120, 200),
            rough: Color::rgb(160, 140, 110),
            rubble: Color::rgb(140, 130, 120),
            pavement: Color::rgb(170, 170, 170),
            road: Color::rgb(150, 140, 120),
            building: Color::rgb(120, 110, 100),
            bridge: Color::rgb(110, 80, 50),
            swamp: Color::rgb(90, 110, 80),
            sand: Color::rgb(225, 205, 150),
            snow: Color::rgb(240, 240, 245),
            smoke: Color::rgba(200, 200, 200, 140),
            fire: Color::rgba(255, 90, 20, 150),
        }
    }
}

impl TerrainPalette {
    pub fn fill(&self, kind: TerrainKind) -> Color {
        match kind {
            TerrainKind::Clear => self.clear,
            TerrainKind::Woods => self.woods,
            TerrainKind::HeavyWoods => self.heavy_woods,
            TerrainKind::Water => self.water,
            TerrainKind::Rough => self.rough,
            TerrainKind::Rubble => self.rubble,
            TerrainKind::Pavement => self.pavement,
            TerrainKind::Road => self.road,
            TerrainKind::Building => self.building,
            TerrainKind::Bridge => self.bridge,
            TerrainKind::Swamp => self.swamp,
            TerrainKind::Sand => self.sand,
            TerrainKind::Snow => self.snow,
            TerrainKind::Smoke => self.smoke,
            TerrainKind::Fire => self.fire,
        }
    }
}
