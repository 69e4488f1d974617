//! Hex terrain drawing.
//!
//! Redraws every visible hex on each call; the only cross-frame state is the
//! tile set and the published field overlay.

use crate::board::{BoardModel, Hex, LightLevel};
use crate::core::config::RenderConfig;
use crate::core::types::{Color, PlayerId, Point};
use crate::field::FieldOverlay;
use crate::hex::{Coord, HexDirection, HexGeometry};
use crate::renderer::canvas::Canvas;
use crate::renderer::metrics::FrameMetrics;
use crate::renderer::tiles::{AssetKey, TileSet, TileState};

/// Alpha given to opaque palette fills when drawn as an overlay layer
const OVERLAY_LAYER_ALPHA: u8 = 110;
/// Height shading per elevation level, capped at `HEIGHT_SHADE_MAX`
const HEIGHT_SHADE_STEP: i32 = 20;
const HEIGHT_SHADE_MAX: i32 = 120;

/// Display toggles that change how terrain is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    /// Darken hexes the board reports as unlit
    pub night: bool,
    /// Lighten high ground, darken low ground
    pub height_shading: bool,
    /// Tint the legal deployment hexes of this player
    pub deployment_for: Option<PlayerId>,
}

/// Which of the six edges of `coord` get an elevation border.
///
/// An edge has a border when the neighbor across it is on the board and has
/// a different floor level, so the relation is symmetric.
pub fn elevation_borders(board: &dyn BoardModel, coord: Coord) -> [bool; 6] {
    let mut borders = [false; 6];
    let Some(hex) = board.hex(coord) else {
        return borders;
    };
    for dir in HexDirection::all() {
        borders[dir.index()] = board
            .hex(coord.neighbor(dir))
            .is_some_and(|n| n.floor() != hex.floor());
    }
    borders
}

/// Text annotations shown under the hex number
pub fn elevation_labels(hex: &Hex) -> Vec<String> {
    let mut labels = Vec::new();
    if hex.elevation != 0 {
        labels.push(format!("LEVEL {}", hex.elevation));
    }
    if hex.depth() > 0 {
        labels.push(format!("DEPTH {}", hex.depth()));
    }
    if let Some(h) = hex.building_height() {
        labels.push(format!("HEIGHT {}", h));
    }
    if let Some(h) = hex.bridge_height() {
        labels.push(format!("BRIDGE {}", h));
    }
    labels
}

/// Draws hexes for one frame
pub struct TerrainRenderer<'a> {
    pub geometry: HexGeometry,
    pub config: &'a RenderConfig,
    pub tiles: &'a TileSet,
    pub overlay: &'a FieldOverlay,
    pub mode: DisplayMode,
}

impl TerrainRenderer<'_> {
    /// Draw every on-board hex intersecting the canvas clip
    pub fn draw(&self, canvas: &mut dyn Canvas, board: &dyn BoardModel, metrics: &mut FrameMetrics) {
        let clip = canvas.clip();
        for coord in self.geometry.coords_in_rect(&clip) {
            if !board.contains(coord) {
                continue;
            }
            if self.draw_hex(canvas, board, coord) {
                metrics.record_hex();
            }
        }
    }

    /// Draw one hex; returns `false` if there is no hex at `coord`
    pub fn draw_hex(&self, canvas: &mut dyn Canvas, board: &dyn BoardModel, coord: Coord) -> bool {
        let Some(hex) = board.hex(coord) else {
            return false;
        };
        let palette = &self.config.palette;
        let scale = self.geometry.scale();
        let outline = self.geometry.hex_vertices(coord);
        let center = self.geometry.pixel_center(coord);

        // Base tile
        let base = hex.base_kind();
        match self.tiles.terrain(base, scale) {
            TileState::Ready(img) => {
                canvas.fill_polygon(&outline, palette.terrain.fill(base));
                canvas.blit(&img, centered(center, img.width(), img.height()));
            }
            TileState::Loading => canvas.fill_polygon(&outline, palette.placeholder),
            TileState::Missing => canvas.fill_polygon(&outline, palette.terrain.fill(base)),
        }

        for layer in hex.overlay_layers() {
            match self.tiles.terrain(layer.kind, scale) {
                TileState::Ready(img) => {
                    canvas.blit(&img, centered(center, img.width(), img.height()));
                }
                _ => {
                    let fill = palette.terrain.fill(layer.kind);
                    let fill = if fill.a == 255 {
                        fill.with_alpha(OVERLAY_LAYER_ALPHA)
                    } else {
                        fill
                    };
                    canvas.fill_polygon(&outline, fill);
                }
            }
        }

        if self.config.show_field_overlay {
            if let Some(tint) = self.overlay.get(coord) {
                canvas.fill_polygon(&outline, tint.with_alpha(self.config.field_alpha));
            }
        }

        if self.mode.height_shading && hex.elevation != 0 {
            let alpha = (hex.elevation.abs() * HEIGHT_SHADE_STEP).min(HEIGHT_SHADE_MAX) as u8;
            let shade = if hex.elevation > 0 { Color::WHITE } else { Color::BLACK };
            canvas.fill_polygon(&outline, shade.with_alpha(alpha));
        }

        if let Some(player) = self.mode.deployment_for {
            if board.is_deployment_legal(coord, player) {
                canvas.fill_polygon(&outline, palette.deployment);
            }
        }

        if self.mode.night && board.light_level(coord) == LightLevel::Unlit {
            canvas.fill_polygon(&outline, Color::BLACK.with_alpha(self.config.night_alpha));
        }

        canvas.stroke_polyline(&outline, 1.0, palette.hex_outline, true);

        let border_width = (2.0 * scale).max(1.0);
        for (i, has_border) in elevation_borders(board, coord).into_iter().enumerate() {
            if has_border {
                let (a, b) = self.geometry.hex_edge(coord, HexDirection::from_index(i));
                canvas.stroke_polyline(&[a, b], border_width, palette.elevation_border, false);
            }
        }

        for name in &hex.markers {
            self.draw_marker(canvas, name, center);
        }

        if scale >= self.config.text_min_scale {
            self.draw_text(canvas, hex, coord);
        }

        true
    }

    /// Special marker image; a missing image becomes a text label so one bad
    /// asset never costs the rest of the frame.
    fn draw_marker(&self, canvas: &mut dyn Canvas, name: &str, center: Point) {
        match self.tiles.marker(name) {
            TileState::Ready(img) => {
                canvas.blit(&img, centered(center, img.width(), img.height()));
            }
            TileState::Loading => {
                canvas.fill_circle(center, self.geometry.hex_height() / 6.0, self.config.palette.placeholder);
            }
            TileState::Missing => {
                self.tiles.report_missing(&AssetKey::Marker(name.to_string()));
                canvas.fill_circle(center, self.geometry.hex_height() / 6.0, self.config.palette.marker);
                canvas.draw_text(center, &name.to_uppercase(), self.config.palette.text);
            }
        }
    }

    fn draw_text(&self, canvas: &mut dyn Canvas, hex: &Hex, coord: Coord) {
        let origin = self.geometry.pixel_origin(coord);
        let (w, h) = (self.geometry.hex_width(), self.geometry.hex_height());
        let color = self.config.palette.text;

        if self.config.show_hex_numbers {
            canvas.draw_text(origin + Point::new(w / 2.0, h * 0.15), &coord.board_label(), color);
        }
        if self.config.show_elevation_text {
            let line_height = h * 0.14;
            for (i, label) in elevation_labels(hex).iter().enumerate() {
                let at = origin + Point::new(w / 2.0, h * 0.7 + i as f64 * line_height);
                canvas.draw_text(at, label, color);
            }
        }
    }
}

/// Top-left corner that centers a `w` x `h` image on `center`
fn centered(center: Point, w: u32, h: u32) -> Point {
    center - Point::new(w as f64 / 2.0, h as f64 / 2.0)
}
