//! Pixel geometry for the offset hex grid.
//!
//! Flat-topped hexes, `HEX_WIDTH` x `HEX_HEIGHT` at scale 1.0. Columns
//! advance by three quarters of a hex width; odd columns are shifted down by
//! half a hex height. Every bound, edge and line endpoint in the renderer is
//! derived from [`HexGeometry::pixel_origin`], so it must stay exact.

use geo::{Contains, LineString, Polygon};

use crate::core::error::{RenderError, Result};
use crate::core::types::{Point, Rect};
use crate::hex::coord::{Coord, HexDirection};

/// Hex width at scale 1.0 (pixels)
pub const HEX_WIDTH: f64 = 84.0;
/// Hex height at scale 1.0 (pixels)
pub const HEX_HEIGHT: f64 = 72.0;
/// Horizontal distance between adjacent column origins at scale 1.0
pub const COLUMN_WIDTH: f64 = HEX_WIDTH - HEX_WIDTH / 4.0;

/// Scale-dependent mapping between hex coordinates and board pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGeometry {
    scale: f64,
}

impl HexGeometry {
    /// Geometry at scale 1.0
    pub const UNIT: HexGeometry = HexGeometry { scale: 1.0 };

    /// A zero, negative or non-finite scale is a programming error in the
    /// caller and is rejected immediately.
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn hex_width(&self) -> f64 {
        HEX_WIDTH * self.scale
    }

    pub fn hex_height(&self) -> f64 {
        HEX_HEIGHT * self.scale
    }

    /// Top-left corner of the hex's bounding box.
    pub fn pixel_origin(&self, coord: Coord) -> Point {
        let x = coord.x as f64 * COLUMN_WIDTH * self.scale;
        let mut y = coord.y as f64 * HEX_HEIGHT * self.scale;
        if coord.is_odd_column() {
            y += HEX_HEIGHT / 2.0 * self.scale;
        }
        Point::new(x, y)
    }

    /// Center of the hex.
    pub fn pixel_center(&self, coord: Coord) -> Point {
        self.pixel_origin(coord)
            + Point::new(HEX_WIDTH / 2.0 * self.scale, HEX_HEIGHT / 2.0 * self.scale)
    }

    /// Bounding box of the hex
    pub fn hex_bounds(&self, coord: Coord) -> Rect {
        let o = self.pixel_origin(coord);
        Rect::new(o.x, o.y, self.hex_width(), self.hex_height())
    }

    /// The six vertices, clockwise from the top-left, in board pixels.
    pub fn hex_vertices(&self, coord: Coord) -> [Point; 6] {
        let o = self.pixel_origin(coord);
        let (w, h) = (self.hex_width(), self.hex_height());
        [
            o + Point::new(w / 4.0, 0.0),
            o + Point::new(w * 3.0 / 4.0, 0.0),
            o + Point::new(w, h / 2.0),
            o + Point::new(w * 3.0 / 4.0, h),
            o + Point::new(w / 4.0, h),
            o + Point::new(0.0, h / 2.0),
        ]
    }

    /// Endpoints of the edge shared with the neighbor in `dir`.
    pub fn hex_edge(&self, coord: Coord, dir: HexDirection) -> (Point, Point) {
        let v = self.hex_vertices(coord);
        let i = dir.index();
        (v[i], v[(i + 1) % 6])
    }

    /// Inverse of [`HexGeometry::pixel_origin`]: the hex containing `point`.
    ///
    /// The column/row estimate only sees the rectangular part of a column, so
    /// the estimate and its neighbors are tested against the real hex outline.
    /// Points on an outline go to the nearest center.
    pub fn coord_at(&self, point: Point) -> Coord {
        let col_w = COLUMN_WIDTH * self.scale;
        let row_h = HEX_HEIGHT * self.scale;

        let x = (point.x / col_w).floor() as i32;
        let stagger = if x & 1 == 1 { row_h / 2.0 } else { 0.0 };
        let y = ((point.y - stagger) / row_h).floor() as i32;
        let estimate = Coord::new(x, y);

        let mut candidates = Vec::with_capacity(7);
        candidates.push(estimate);
        candidates.extend(estimate.neighbors());

        let probe = geo::Point::new(point.x, point.y);
        if let Some(hit) = candidates
            .iter()
            .find(|c| self.hex_polygon(**c).contains(&probe))
        {
            return *hit;
        }

        candidates
            .into_iter()
            .min_by(|a, b| {
                let da = self.pixel_center(*a).distance_squared(point);
                let db = self.pixel_center(*b).distance_squared(point);
                da.total_cmp(&db)
            })
            .unwrap_or(estimate)
    }

    /// Hex outline as a polygon for hit testing
    pub fn hex_polygon(&self, coord: Coord) -> Polygon<f64> {
        let ring: Vec<(f64, f64)> = self
            .hex_vertices(coord)
            .iter()
            .map(|p| (p.x, p.y))
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }

    /// Pixel size of a `width` x `height` board
    pub fn board_size(&self, width: i32, height: i32) -> (f64, f64) {
        if width <= 0 || height <= 0 {
            return (0.0, 0.0);
        }
        let w = (width - 1) as f64 * COLUMN_WIDTH * self.scale + self.hex_width();
        let mut h = height as f64 * self.hex_height();
        if width > 1 {
            h += self.hex_height() / 2.0;
        }
        (w, h)
    }

    /// Coordinates whose bounding box intersects `rect`, row by row.
    /// May include off-board coordinates; callers check board bounds.
    pub fn coords_in_rect(&self, rect: &Rect) -> Vec<Coord> {
        if rect.is_empty() {
            return Vec::new();
        }
        let col_w = COLUMN_WIDTH * self.scale;
        let row_h = HEX_HEIGHT * self.scale;

        let x0 = (rect.x / col_w).floor() as i32 - 1;
        let x1 = (rect.right() / col_w).floor() as i32 + 1;
        let y0 = (rect.y / row_h).floor() as i32 - 1;
        let y1 = (rect.bottom() / row_h).floor() as i32 + 1;

        let mut coords = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = Coord::new(x, y);
                if self.hex_bounds(c).intersects(rect) {
                    coords.push(c);
                }
            }
        }
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(scale: f64) -> HexGeometry {
        HexGeometry::new(scale).unwrap()
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(matches!(HexGeometry::new(0.0), Err(RenderError::InvalidScale(_))));
        assert!(HexGeometry::new(-1.0).is_err());
        assert!(HexGeometry::new(f64::NAN).is_err());
    }

    #[test]
    fn test_pixel_origin_even_and_odd_columns() {
        let g = geometry(1.0);
        assert_eq!(g.pixel_origin(Coord::new(0, 0)), Point::new(0.0, 0.0));
        assert_eq!(g.pixel_origin(Coord::new(1, 0)), Point::new(63.0, 36.0));
        assert_eq!(g.pixel_origin(Coord::new(2, 3)), Point::new(126.0, 216.0));
    }

    #[test]
    fn test_pixel_origin_scales() {
        let g = geometry(0.5);
        assert_eq!(g.pixel_origin(Coord::new(3, 1)), Point::new(94.5, 54.0));
    }

    #[test]
    fn test_pixel_center() {
        let g = geometry(1.0);
        assert_eq!(g.pixel_center(Coord::new(0, 0)), Point::new(42.0, 36.0));
    }

    #[test]
    fn test_center_roundtrip() {
        for scale in [0.3, 0.85, 1.0, 2.0] {
            let g = geometry(scale);
            for x in 0..12 {
                for y in 0..12 {
                    let c = Coord::new(x, y);
                    assert_eq!(g.coord_at(g.pixel_center(c)), c, "scale {}", scale);
                }
            }
        }
    }

    #[test]
    fn test_coord_at_slanted_corner_belongs_to_previous_column() {
        let g = geometry(1.0);
        // Just right of column 1's origin but left of its slanted NW edge:
        // that point is inside hex (0, 0).
        let p = Point::new(64.0, 30.0);
        assert_eq!(g.coord_at(p), Coord::new(0, 0));
    }

    #[test]
    fn test_coord_at_negative_space() {
        let g = geometry(1.0);
        assert_eq!(g.coord_at(Point::new(-40.0, -10.0)), Coord::new(-1, -1));
    }

    #[test]
    fn test_shared_edges_match() {
        let g = geometry(1.3);
        let c = Coord::new(3, 4);
        for dir in HexDirection::all() {
            let (a, b) = g.hex_edge(c, dir);
            let (c2, d2) = g.hex_edge(c.neighbor(dir), dir.opposite());
            // Same segment, traversed in reverse
            assert!((a - d2).length() < 1e-9 && (b - c2).length() < 1e-9, "{:?}", dir);
        }
    }

    #[test]
    fn test_board_size() {
        let g = geometry(1.0);
        assert_eq!(g.board_size(1, 1), (84.0, 72.0));
        assert_eq!(g.board_size(2, 2), (147.0, 180.0));
        assert_eq!(g.board_size(0, 5), (0.0, 0.0));
    }

    #[test]
    fn test_coords_in_rect_covers_visible_hexes() {
        let g = geometry(1.0);
        let rect = Rect::new(0.0, 0.0, 200.0, 150.0);
        let coords = g.coords_in_rect(&rect);
        assert!(coords.contains(&Coord::new(0, 0)));
        assert!(coords.contains(&Coord::new(3, 1)));
        assert!(!coords.contains(&Coord::new(6, 0)));
        assert!(coords.iter().all(|c| g.hex_bounds(*c).intersects(&rect)));
    }
}
