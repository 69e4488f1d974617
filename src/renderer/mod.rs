//! Software renderer for the board.
//!
//! Terrain is redrawn from the board model on every frame; everything
//! transient lives in the sprite store. Both draw into a [`Canvas`], which
//! for headless use is the [`RasterCanvas`] back buffer.

pub mod canvas;
pub mod metrics;
pub mod minimap;
pub mod raster;
pub mod sprites;
pub mod terrain;
pub mod tiles;

pub use canvas::{Canvas, RasterCanvas, TextRun};
pub use metrics::{FrameMetrics, MetricsSummary};
pub use minimap::Minimap;
pub use sprites::{ArrowInfo, CursorKind, MovementStep, Sprite, SpriteKind, SpriteSet, SpriteStore, StepKind};
pub use terrain::{elevation_borders, DisplayMode, TerrainRenderer};
pub use tiles::{AssetKey, TileSet, TileState, ZoomBucket};
