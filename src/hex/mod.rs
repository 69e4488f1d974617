//! Hex coordinate system: offset coordinates, adjacency and pixel geometry.

pub mod coord;
pub mod geometry;

pub use coord::{Coord, HexDirection};
pub use geometry::{HexGeometry, COLUMN_WIDTH, HEX_HEIGHT, HEX_WIDTH};
