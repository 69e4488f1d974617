//! hexboard - rendering and spatial queries for a hex-grid tactical board
//!
//! Turns a snapshot of board state (terrain cells and entities, owned by an
//! external rule engine behind [`board::BoardModel`]) into a layered 2D view,
//! and turns pointer input back into hex coordinates and semantic events.

pub mod animation;
pub mod board;
pub mod core;
pub mod field;
pub mod hex;
pub mod renderer;
pub mod view;

pub use crate::board::{BoardModel, Entity, GridBoard};
pub use crate::core::{RenderConfig, RenderError, Result};
pub use crate::hex::{Coord, HexDirection, HexGeometry};
pub use crate::view::{BoardEvent, BoardView};
