//! Per-hex tint map produced by the field sources

use ahash::AHashMap;

use crate::core::types::Color;
use crate::field::source::FieldSource;
use crate::hex::Coord;

/// Blend two overlapping tints: the per-channel midpoint.
pub fn blend(a: Color, b: Color) -> Color {
    a.average(b)
}

/// Coordinate to blended tint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverlay {
    tints: AHashMap<Coord, Color>,
}

impl FieldOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend every source in order, keeping only coordinates accepted by
    /// `in_bounds`
    pub fn from_sources(sources: &[FieldSource], in_bounds: impl Fn(Coord) -> bool) -> Self {
        let mut overlay = Self::new();
        for source in sources {
            for coord in source.coverage() {
                if in_bounds(coord) {
                    overlay.apply(coord, source.tint);
                }
            }
        }
        overlay
    }

    /// Write a tint, blending with any tint already there
    pub fn apply(&mut self, coord: Coord, tint: Color) {
        self.tints
            .entry(coord)
            .and_modify(|existing| *existing = blend(*existing, tint))
            .or_insert(tint);
    }

    pub fn get(&self, coord: Coord) -> Option<Color> {
        self.tints.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.tints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        self.tints.iter().map(|(c, t)| (*c, *t))
    }
}
