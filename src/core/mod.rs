pub mod config;
pub mod error;
pub mod swap;
pub mod types;

pub use config::{LosHeights, Palette, RenderConfig, TerrainPalette};
pub use error::{RenderError, Result};
pub use swap::Swap;
pub use types::{Color, EntityId, PlayerId, Point, Rect};
