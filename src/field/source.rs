//! Area-of-effect emitters

use crate::board::Entity;
use crate::core::types::Color;
use crate::hex::{Coord, HexDirection, HexGeometry};

/// Half-width of a directional sector, degrees
const ARC_HALF_WIDTH: f64 = 30.0;

/// One circular (or sector-restricted) field on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSource {
    pub origin: Coord,
    pub radius: u32,
    pub tint: Color,
    /// Only hexes inside the 60 degree sector facing this way are covered
    pub arc: Option<HexDirection>,
}

impl FieldSource {
    pub fn new(origin: Coord, radius: u32, tint: Color) -> Self {
        Self {
            origin,
            radius,
            tint,
            arc: None,
        }
    }

    pub fn with_arc(mut self, dir: HexDirection) -> Self {
        self.arc = Some(dir);
        self
    }

    /// Field produced by an entity's active emitter. Wrecks emit nothing.
    pub fn from_entity(entity: &Entity, default_tint: Color) -> Option<Self> {
        let emitter = entity.emitter?;
        if !emitter.active || entity.is_wreck() {
            return None;
        }
        Some(Self {
            origin: entity.position,
            radius: emitter.radius,
            tint: emitter.tint.unwrap_or(default_tint),
            arc: emitter.arc,
        })
    }

    /// Whether `coord` falls inside this field
    pub fn covers(&self, coord: Coord) -> bool {
        if self.origin.distance(&coord) > self.radius {
            return false;
        }
        match self.arc {
            None => true,
            Some(dir) => in_arc(self.origin, coord, dir),
        }
    }

    /// Every covered coordinate, found by scanning the bounding square of
    /// side `2 * radius + 1`. May include off-board coordinates.
    pub fn coverage(&self) -> Vec<Coord> {
        self.origin
            .square_around(self.radius)
            .filter(|c| self.covers(*c))
            .collect()
    }
}

/// Sector test on hex centers, with y flipped so north is +90 degrees.
/// The origin hex is always inside its own sector.
fn in_arc(origin: Coord, target: Coord, dir: HexDirection) -> bool {
    if origin == target {
        return true;
    }
    let from = HexGeometry::UNIT.pixel_center(origin);
    let to = HexGeometry::UNIT.pixel_center(target);
    let angle = (-(to.y - from.y)).atan2(to.x - from.x).to_degrees();
    let mut diff = angle - dir.angle_degrees();
    while diff > 180.0 {
        diff -= 360.0;
    }
    while diff < -180.0 {
        diff += 360.0;
    }
    diff.abs() <= ARC_HALF_WIDTH + 1e-6
}
