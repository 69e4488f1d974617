//! Sprites: cached drawables for units, cursors, arrows and markers.

pub mod paint;
pub mod sprite;
pub mod store;

pub use sprite::{CursorKind, MovementStep, Sprite, SpriteKind, StepKind, UnitGlyph};
pub use store::{ArrowInfo, SpriteSet, SpriteStore};
