//! Scroll and zoom state with screen/board coordinate transforms.
//!
//! Screen origin is the top-left of the view; board pixels are at the
//! current scale. `scroll` is the board point shown at the screen origin.

use crate::core::config::RenderConfig;
use crate::core::error::{RenderError, Result};
use crate::core::types::{Point, Rect};
use crate::hex::{Coord, HexGeometry};

#[derive(Debug, Clone)]
pub struct Viewport {
    zoom_levels: Vec<f64>,
    zoom_index: usize,
    geometry: HexGeometry,
    scroll: Point,
    view_size: Point,
    board_dims: (i32, i32),
}

impl Viewport {
    /// A viewport at the configured default zoom
    pub fn new(config: &RenderConfig, view_width: f64, view_height: f64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            zoom_levels: config.zoom_levels.clone(),
            zoom_index: config.default_zoom_index,
            geometry: HexGeometry::new(config.default_scale())?,
            scroll: Point::ZERO,
            view_size: Point::new(view_width.max(0.0), view_height.max(0.0)),
            board_dims: (0, 0),
        })
    }

    pub fn geometry(&self) -> HexGeometry {
        self.geometry
    }

    pub fn scale(&self) -> f64 {
        self.geometry.scale()
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    /// Board extents in hexes; re-clamps the scroll position
    pub fn set_board_dims(&mut self, width: i32, height: i32) {
        self.board_dims = (width, height);
        self.clamp_scroll();
    }

    pub fn board_dims(&self) -> (i32, i32) {
        self.board_dims
    }

    /// Whether `coord` lies on the attached board
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.board_dims.0 && coord.y < self.board_dims.1
    }

    /// Update view size (call on window resize)
    pub fn set_view_size(&mut self, width: f64, height: f64) {
        self.view_size = Point::new(width.max(0.0), height.max(0.0));
        self.clamp_scroll();
    }

    pub fn view_size(&self) -> Point {
        self.view_size
    }

    /// Board size in pixels at the current scale
    pub fn board_pixels(&self) -> Point {
        let (w, h) = self.geometry.board_size(self.board_dims.0, self.board_dims.1);
        Point::new(w, h)
    }

    /// Board-space rectangle currently on screen
    pub fn visible_rect(&self) -> Rect {
        Rect::new(self.scroll.x, self.scroll.y, self.view_size.x, self.view_size.y)
    }

    pub fn screen_to_board(&self, screen: Point) -> Point {
        screen + self.scroll
    }

    pub fn board_to_screen(&self, board: Point) -> Point {
        board - self.scroll
    }

    /// Hex under a screen point. May be off the board.
    pub fn coord_at_screen(&self, screen: Point) -> Coord {
        self.geometry.coord_at(self.screen_to_board(screen))
    }

    /// Scroll by a board-pixel delta
    pub fn pan(&mut self, delta: Point) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    pub fn scroll_to(&mut self, scroll: Point) {
        self.scroll = scroll;
        self.clamp_scroll();
    }

    pub fn center_on_hex(&mut self, coord: Coord) {
        let center = self.geometry.pixel_center(coord);
        self.scroll_to(center - self.view_size / 2.0);
    }

    /// Hex at the middle of the view
    pub fn center_coord(&self) -> Coord {
        self.coord_at_screen(self.view_size / 2.0)
    }

    pub fn zoom_in(&mut self) -> bool {
        if self.zoom_index + 1 >= self.zoom_levels.len() {
            return false;
        }
        self.set_zoom_index(self.zoom_index + 1).is_ok()
    }

    pub fn zoom_out(&mut self) -> bool {
        if self.zoom_index == 0 {
            return false;
        }
        self.set_zoom_index(self.zoom_index - 1).is_ok()
    }

    /// Jump to a zoom level, keeping the hex at the view center in place
    pub fn set_zoom_index(&mut self, index: usize) -> Result<()> {
        let scale = *self.zoom_levels.get(index).ok_or_else(|| {
            RenderError::InvalidConfig(format!("zoom index {} out of range", index))
        })?;
        self.set_scale(scale)?;
        self.zoom_index = index;
        Ok(())
    }

    /// Arbitrary scale. Zero, negative and non-finite scales are rejected.
    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        let geometry = HexGeometry::new(scale)?;
        let center = self.center_coord();
        self.geometry = geometry;
        self.zoom_index = nearest_level(&self.zoom_levels, scale);
        self.center_on_hex(center);
        Ok(())
    }

    /// Take new zoom levels from a config, keeping the current scale when it
    /// is still one of the levels
    pub fn reconfigure(&mut self, config: &RenderConfig) -> Result<()> {
        self.zoom_levels = config.zoom_levels.clone();
        let current = self.scale();
        match self.zoom_levels.iter().position(|z| *z == current) {
            Some(index) => {
                self.zoom_index = index;
                Ok(())
            }
            None => self.set_zoom_index(config.default_zoom_index),
        }
    }

    fn clamp_scroll(&mut self) {
        let board = self.board_pixels();
        let max = (board - self.view_size).max(Point::ZERO);
        self.scroll = self.scroll.clamp(Point::ZERO, max);
    }
}

fn nearest_level(levels: &[f64], scale: f64) -> usize {
    levels
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - scale).abs().total_cmp(&(*b - scale).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
