//! Whole-board overview image

use image::RgbaImage;

use crate::board::{BoardModel, Entity};
use crate::core::config::Palette;
use crate::core::error::Result;
use crate::core::types::{Point, Rect};
use crate::hex::{Coord, HexGeometry};
use crate::renderer::canvas::{Canvas, RasterCanvas};

/// Renders a small overview: terrain blocks, entity dots and the outline of
/// the main view.
#[derive(Debug, Clone, Copy)]
pub struct Minimap {
    geometry: HexGeometry,
}

impl Minimap {
    /// `scale` is the minimap hex size relative to a full-size hex
    pub fn new(scale: f64) -> Result<Self> {
        Ok(Self {
            geometry: HexGeometry::new(scale)?,
        })
    }

    pub fn geometry(&self) -> HexGeometry {
        self.geometry
    }

    /// `view` is the main viewport in board pixels at `view_scale`
    pub fn render(
        &self,
        board: &dyn BoardModel,
        palette: &Palette,
        entities: &[Entity],
        view: Option<(Rect, f64)>,
    ) -> RgbaImage {
        let (w, h) = self.geometry.board_size(board.width(), board.height());
        let mut canvas = RasterCanvas::new(Rect::new(0.0, 0.0, w, h), palette.background);

        for y in 0..board.height() {
            for x in 0..board.width() {
                let coord = Coord::new(x, y);
                let Some(hex) = board.hex(coord) else {
                    continue;
                };
                let mut fill = palette.terrain.fill(hex.base_kind());
                if hex.elevation > 0 {
                    fill = fill.darken(1.0 - (hex.elevation as f32 * 0.08).min(0.4));
                }
                canvas.fill_polygon(&self.geometry.hex_vertices(coord), fill);
            }
        }

        let dot = (self.geometry.hex_height() * 0.3).max(1.0);
        for entity in entities.iter().filter(|e| !e.hidden) {
            if !board.contains(entity.position) {
                continue;
            }
            let color = if entity.is_wreck() {
                palette.wreck
            } else {
                palette.player(entity.owner)
            };
            canvas.fill_circle(self.geometry.pixel_center(entity.position), dot, color);
        }

        if let Some((rect, view_scale)) = view {
            let k = self.geometry.scale() / view_scale;
            let r = Rect::new(rect.x * k, rect.y * k, rect.width * k, rect.height * k);
            let corners = [
                Point::new(r.x, r.y),
                Point::new(r.right(), r.y),
                Point::new(r.right(), r.bottom()),
                Point::new(r.x, r.bottom()),
            ];
            canvas.stroke_polyline(&corners, 1.0, palette.highlight, true);
        }

        canvas.into_image()
    }
}
