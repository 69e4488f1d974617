//! In-memory board model
//!
//! A dense rectangular grid implementing [`BoardModel`]. Used by the demo
//! binary and tests in place of a full rule engine.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};

use crate::board::entity::Entity;
use crate::board::hex::{Hex, TerrainKind};
use crate::board::model::{BoardModel, LightLevel, LosQuery, LosReport};
use crate::core::types::{EntityId, PlayerId};
use crate::hex::Coord;

/// Interference at which a sight line is blocked outright
const BLOCKING_INTERFERENCE: u32 = 3;

/// The full board
#[derive(Debug, Clone)]
pub struct GridBoard {
    width: i32,
    height: i32,
    hexes: Vec<Hex>,
    entities: BTreeMap<EntityId, Entity>,
    night: bool,
    lights: AHashMap<Coord, LightLevel>,
    deployment: AHashSet<(PlayerId, Coord)>,
}

impl GridBoard {
    /// Create a new board of clear, level-0 hexes
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            hexes: vec![Hex::default(); (width * height) as usize],
            entities: BTreeMap::new(),
            night: false,
            lights: AHashMap::new(),
            deployment: AHashSet::new(),
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y * self.width + coord.x) as usize)
    }

    /// Replace the hex at a coordinate (ignored off the board)
    pub fn set_hex(&mut self, coord: Coord, hex: Hex) {
        if let Some(i) = self.index(coord) {
            self.hexes[i] = hex;
        }
    }

    pub fn hex_mut(&mut self, coord: Coord) -> Option<&mut Hex> {
        self.index(coord).map(move |i| &mut self.hexes[i])
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: Coord, kind: TerrainKind, level: i32) {
        if let Some(hex) = self.hex_mut(coord) {
            let updated = std::mem::take(hex).with_terrain(kind, level);
            *hex = updated;
        }
    }

    /// Set elevation at a coordinate
    pub fn set_elevation(&mut self, coord: Coord, elevation: i32) {
        if let Some(hex) = self.hex_mut(coord) {
            hex.elevation = elevation;
        }
    }

    /// Insert or replace an entity
    pub fn place_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn set_night(&mut self, night: bool) {
        self.night = night;
    }

    /// Illumination override (only consulted at night)
    pub fn set_light(&mut self, coord: Coord, level: LightLevel) {
        self.lights.insert(coord, level);
    }

    pub fn set_deployment_zone(&mut self, player: PlayerId, coords: impl IntoIterator<Item = Coord>) {
        self.deployment.retain(|(p, _)| *p != player);
        self.deployment
            .extend(coords.into_iter().map(|c| (player, c)));
    }
}

impl BoardModel for GridBoard {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn hex(&self, coord: Coord) -> Option<&Hex> {
        self.index(coord).map(|i| &self.hexes[i])
    }

    fn entities(&self) -> Vec<Entity> {
        self.entities.values().cloned().collect()
    }

    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).cloned()
    }

    fn light_level(&self, coord: Coord) -> LightLevel {
        if !self.night {
            return LightLevel::Day;
        }
        self.lights.get(&coord).copied().unwrap_or(LightLevel::Unlit)
    }

    /// Walks the hex line, comparing each intervening hex against the sight
    /// line interpolated between the two unit heights.
    fn line_of_sight(&self, query: LosQuery) -> LosReport {
        let line = query.from.line_to(&query.to);
        let distance = query.from.distance(&query.to);
        let base = |c: Coord| self.hex(c).map(|h| h.elevation).unwrap_or(0);
        let eye = (base(query.from) + query.attacker_height) as f64;
        let goal = (base(query.to) + query.target_height) as f64;

        let mut report = LosReport {
            distance,
            ..Default::default()
        };
        let n = line.len().saturating_sub(1);

        // Check all hexes except start and end
        for (i, coord) in line.iter().enumerate().skip(1).take(n.saturating_sub(1)) {
            let Some(hex) = self.hex(*coord) else {
                continue;
            };
            let t = i as f64 / n as f64;
            let sight = eye + (goal - eye) * t;

            let mut blocks = hex.elevation as f64 >= sight;
            if !blocks && hex.obstruction_height() as f64 >= sight {
                report.interference += hex.interference();
                blocks = hex.contains(TerrainKind::Building)
                    || report.interference >= BLOCKING_INTERFERENCE;
            }

            if blocks && !report.blocked {
                report.blocked = true;
                report.blocked_at = Some(*coord);
            }
        }

        report
    }

    fn is_deployment_legal(&self, coord: Coord, player: PlayerId) -> bool {
        self.deployment.contains(&(player, coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(from: Coord, to: Coord) -> LosQuery {
        LosQuery {
            from,
            to,
            attacker_height: 1,
            target_height: 1,
        }
    }

    #[test]
    fn test_board_creation() {
        let board = GridBoard::new(10, 8);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 8);
        assert!(board.hex(Coord::new(9, 7)).is_some());
    }

    #[test]
    fn test_out_of_bounds() {
        let board = GridBoard::new(10, 10);
        assert!(board.hex(Coord::new(10, 0)).is_none());
        assert!(board.hex(Coord::new(-1, 3)).is_none());
    }

    #[test]
    fn test_line_of_sight_open() {
        let board = GridBoard::new(10, 10);
        let report = board.line_of_sight(query(Coord::new(0, 0), Coord::new(0, 5)));
        assert!(!report.blocked);
        assert_eq!(report.distance, 5);
        assert_eq!(report.interference, 0);
    }

    #[test]
    fn test_line_of_sight_blocked_by_hill() {
        let mut board = GridBoard::new(10, 10);
        board.set_elevation(Coord::new(0, 2), 3);
        let report = board.line_of_sight(query(Coord::new(0, 0), Coord::new(0, 5)));
        assert!(report.blocked);
        assert_eq!(report.blocked_at, Some(Coord::new(0, 2)));
    }

    #[test]
    fn test_light_woods_only_interfere() {
        let mut board = GridBoard::new(10, 10);
        board.set_terrain(Coord::new(0, 2), TerrainKind::Woods, 1);
        let report = board.line_of_sight(query(Coord::new(0, 0), Coord::new(0, 5)));
        assert!(!report.blocked);
        assert_eq!(report.interference, 1);
    }

    #[test]
    fn test_stacked_woods_block() {
        let mut board = GridBoard::new(10, 10);
        board.set_terrain(Coord::new(0, 1), TerrainKind::HeavyWoods, 1);
        board.set_terrain(Coord::new(0, 2), TerrainKind::Woods, 1);
        let report = board.line_of_sight(query(Coord::new(0, 0), Coord::new(0, 5)));
        assert!(report.blocked);
        assert_eq!(report.blocked_at, Some(Coord::new(0, 2)));
        assert_eq!(report.interference, 3);
    }

    #[test]
    fn test_night_lighting() {
        let mut board = GridBoard::new(4, 4);
        assert_eq!(board.light_level(Coord::new(1, 1)), LightLevel::Day);
        board.set_night(true);
        board.set_light(Coord::new(2, 2), LightLevel::Lit);
        assert_eq!(board.light_level(Coord::new(1, 1)), LightLevel::Unlit);
        assert_eq!(board.light_level(Coord::new(2, 2)), LightLevel::Lit);
    }

    #[test]
    fn test_deployment_zone() {
        let mut board = GridBoard::new(4, 4);
        board.set_deployment_zone(PlayerId(1), [Coord::new(0, 0), Coord::new(0, 1)]);
        assert!(board.is_deployment_legal(Coord::new(0, 1), PlayerId(1)));
        assert!(!board.is_deployment_legal(Coord::new(0, 1), PlayerId(2)));
    }
}
