//! Field effects: area emitters and the per-hex tint overlay they produce.

pub mod calculator;
pub mod overlay;
pub mod source;

pub use calculator::{compute_overlay, FieldBounds, FieldCalculator};
pub use overlay::{blend, FieldOverlay};
pub use source::FieldSource;
