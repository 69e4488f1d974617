//! Seeded demo boards
//!
//! Deterministic for a given seed: the same config always yields the same
//! terrain and the same units.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::entity::{Entity, EntityStatus, FieldEmitter, UnitClass};
use crate::board::grid::GridBoard;
use crate::board::hex::TerrainKind;
use crate::core::types::{EntityId, PlayerId};
use crate::hex::{Coord, HexDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    pub units_per_side: u32,
    pub hills: u32,
    pub woods_frequency: f64,
    pub water_frequency: f64,
    pub building_frequency: f64,
    /// Chance that a unit carries an active field emitter
    pub emitter_frequency: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 17,
            seed: 42,
            units_per_side: 4,
            hills: 3,
            woods_frequency: 0.15,
            water_frequency: 0.04,
            building_frequency: 0.03,
            emitter_frequency: 0.25,
        }
    }
}

const UNIT_NAMES: [&str; 8] = [
    "Atlas", "Locust", "Raven", "Marauder", "Hunchback", "Commando", "Warhammer", "Stinger",
];

/// Generate terrain and two opposing forces
pub fn generate_board(config: &GeneratorConfig) -> GridBoard {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut board = GridBoard::new(config.width, config.height);
    if config.width <= 0 || config.height <= 0 {
        return board;
    }

    // Hills: a peak with a falling slope around it
    for _ in 0..config.hills {
        let peak = random_coord(&mut rng, config);
        let height = rng.gen_range(1..=3);
        for coord in peak.hexes_in_range(height as u32) {
            let level = height - peak.distance(&coord) as i32;
            if level > 0 {
                board.set_elevation(coord, level);
            }
        }
    }

    for y in 0..config.height {
        for x in 0..config.width {
            let coord = Coord::new(x, y);
            let roll: f64 = rng.gen();
            if roll < config.water_frequency {
                board.set_terrain(coord, TerrainKind::Water, rng.gen_range(1..=2));
            } else if roll < config.water_frequency + config.building_frequency {
                board.set_terrain(coord, TerrainKind::Building, rng.gen_range(1..=4));
            } else if roll < config.water_frequency + config.building_frequency + config.woods_frequency {
                let kind = if rng.gen_bool(0.3) {
                    TerrainKind::HeavyWoods
                } else {
                    TerrainKind::Woods
                };
                board.set_terrain(coord, kind, 1);
            }
        }
    }

    // Player 0 deploys along the west edge, player 1 along the east edge
    let west: Vec<Coord> = (0..config.height).flat_map(|y| [Coord::new(0, y), Coord::new(1, y)]).collect();
    let east: Vec<Coord> = (0..config.height)
        .flat_map(|y| [Coord::new(config.width - 1, y), Coord::new(config.width - 2, y)])
        .filter(|c| c.x >= 0)
        .collect();
    board.set_deployment_zone(PlayerId(0), west.clone());
    board.set_deployment_zone(PlayerId(1), east.clone());

    let mut next_id = 1;
    for (player, zone, facing) in [
        (PlayerId(0), &west, HexDirection::SouthEast),
        (PlayerId(1), &east, HexDirection::NorthWest),
    ] {
        for _ in 0..config.units_per_side {
            let position = zone[rng.gen_range(0..zone.len())];
            let name = UNIT_NAMES[rng.gen_range(0..UNIT_NAMES.len())];
            let class = match rng.gen_range(0..4) {
                0 => UnitClass::Vehicle,
                1 => UnitClass::Infantry,
                _ => UnitClass::Mech,
            };
            let mut entity = Entity::new(EntityId(next_id), name, player, position)
                .with_facing(facing)
                .with_class(class);
            if rng.gen_bool(config.emitter_frequency.clamp(0.0, 1.0)) {
                entity = entity.with_emitter(FieldEmitter::new(rng.gen_range(1..=3)));
            }
            if rng.gen_bool(0.1) {
                entity = entity.with_status(EntityStatus::Destroyed);
            }
            board.place_entity(entity);
            next_id += 1;
        }
    }

    tracing::debug!(
        "Generated {}x{} board (seed {})",
        config.width,
        config.height,
        config.seed
    );
    board
}

fn random_coord(rng: &mut ChaCha8Rng, config: &GeneratorConfig) -> Coord {
    Coord::new(rng.gen_range(0..config.width), rng.gen_range(0..config.height))
}
