//! Read-only contract with the rule engine.
//!
//! The board view never calls back into the rule engine except through these
//! queries.

use serde::{Deserialize, Serialize};

use crate::board::entity::Entity;
use crate::board::hex::Hex;
use crate::core::types::{EntityId, PlayerId};
use crate::hex::Coord;

/// Illumination of a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LightLevel {
    #[default]
    Day,
    /// Lit at night (searchlight, fire, flare)
    Lit,
    Unlit,
}

/// Input to a line-of-sight query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosQuery {
    pub from: Coord,
    pub to: Coord,
    /// Levels above the floor of `from`
    pub attacker_height: i32,
    /// Levels above the floor of `to`
    pub target_height: i32,
}

/// Result of a line-of-sight query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LosReport {
    pub blocked: bool,
    /// First hex that blocks the line
    pub blocked_at: Option<Coord>,
    /// Terrain interference tallied along the line
    pub interference: u32,
    pub distance: u32,
}

/// Everything the renderer reads from the board model
pub trait BoardModel {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width() && coord.y < self.height()
    }

    /// Cell at `coord`, `None` when off the board
    fn hex(&self, coord: Coord) -> Option<&Hex>;

    fn entities(&self) -> Vec<Entity>;

    fn entity(&self, id: EntityId) -> Option<Entity>;

    fn light_level(&self, _coord: Coord) -> LightLevel {
        LightLevel::Day
    }

    fn line_of_sight(&self, query: LosQuery) -> LosReport;

    fn is_deployment_legal(&self, _coord: Coord, _player: PlayerId) -> bool {
        false
    }
}
