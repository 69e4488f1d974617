//! Board model: the read-only view of game state the renderer consumes.

pub mod entity;
pub mod generate;
pub mod grid;
pub mod hex;
pub mod model;

pub use entity::{Entity, EntityStatus, FieldEmitter, UnitClass};
pub use generate::{generate_board, GeneratorConfig};
pub use grid::GridBoard;
pub use hex::{Hex, Terrain, TerrainKind};
pub use model::{BoardModel, LightLevel, LosQuery, LosReport};
