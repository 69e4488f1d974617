//! Painting a sprite kind into its cached image.
//!
//! Each image covers exactly the sprite bounds; shapes are painted in
//! coordinates local to the bounds origin.

use image::RgbaImage;

use crate::core::types::{Color, Point, Rect};
use crate::hex::HexDirection;
use crate::renderer::raster;
use crate::renderer::sprites::sprite::{SpriteKind, StepKind, UnitGlyph};

/// Alpha of a cursor's hex fill under its outline
const CURSOR_FILL_ALPHA: u8 = 60;

pub fn paint(kind: &SpriteKind, bounds: Rect) -> RgbaImage {
    let w = bounds.width.max(1.0).ceil() as u32;
    let h = bounds.height.max(1.0).ceil() as u32;
    let mut img = RgbaImage::new(w, h);
    let origin = bounds.origin();
    let local = |p: Point| p - origin;

    match kind {
        SpriteKind::Unit(g) | SpriteKind::Moving(g) | SpriteKind::Ghost(g) => {
            unit_counter(&mut img, g, local(g.center));
        }
        SpriteKind::Wreck(g) => {
            let c = local(g.center);
            raster::fill_circle(&mut img, c, g.radius, g.color);
            let d = g.radius * 0.6;
            let width = (g.radius / 6.0).max(1.0);
            raster::stroke_segment(&mut img, c + Point::new(-d, -d), c + Point::new(d, d), width, g.outline);
            raster::stroke_segment(&mut img, c + Point::new(-d, d), c + Point::new(d, -d), width, g.outline);
        }
        SpriteKind::StepMarker {
            kind,
            center,
            facing,
            radius,
            color,
            ..
        } => {
            let c = local(*center);
            match kind {
                StepKind::Turn => facing_wedge(&mut img, c, *radius * 1.6, *facing, *color),
                _ => {
                    raster::fill_circle(&mut img, c, *radius, *color);
                    facing_wedge(&mut img, c, *radius * 1.6, *facing, *color);
                }
            }
        }
        SpriteKind::Link { a, b, width, color, .. } => {
            raster::stroke_segment(&mut img, local(*a), local(*b), *width, *color);
        }
        SpriteKind::AttackArrow {
            a,
            b,
            width,
            color,
            outline,
            ..
        } => {
            arrow(&mut img, local(*a), local(*b), *width + 2.0, *outline);
            arrow(&mut img, local(*a), local(*b), *width, *color);
        }
        SpriteKind::Cursor {
            outline, width, color, ..
        } => {
            let pts: Vec<Point> = outline.iter().map(|p| local(*p)).collect();
            raster::fill_polygon(&mut img, &pts, color.with_alpha(CURSOR_FILL_ALPHA));
            raster::stroke_polyline(&mut img, &pts, *width, *color, true);
        }
        SpriteKind::FieldMarker { outline, color, .. } => {
            let pts: Vec<Point> = outline.iter().map(|p| local(*p)).collect();
            raster::fill_polygon(&mut img, &pts, *color);
        }
        SpriteKind::Ruler { a, b, width, color, .. } => {
            raster::stroke_segment(&mut img, local(*a), local(*b), *width, *color);
            raster::fill_circle(&mut img, local(*a), width * 2.0, *color);
            raster::fill_circle(&mut img, local(*b), width * 2.0, *color);
        }
    }
    img
}

/// Screen-space unit vector for a hex direction (y grows downwards)
pub(crate) fn direction_vector(dir: HexDirection) -> Point {
    let rad = dir.angle_degrees().to_radians();
    Point::new(rad.cos(), -rad.sin())
}

fn unit_counter(img: &mut RgbaImage, g: &UnitGlyph, c: Point) {
    raster::fill_circle(img, c, g.radius, g.outline);
    raster::fill_circle(img, c, g.radius - (g.radius / 10.0).max(1.0), g.color);

    // Facing notch on the rim
    let d = direction_vector(g.facing);
    let perp = Point::new(-d.y, d.x);
    let tip = c + d * g.radius;
    let base = c + d * (g.radius * 0.55);
    raster::fill_polygon(
        img,
        &[tip, base + perp * (g.radius * 0.3), base - perp * (g.radius * 0.3)],
        g.outline,
    );
}

fn facing_wedge(img: &mut RgbaImage, c: Point, length: f64, dir: HexDirection, color: Color) {
    let d = direction_vector(dir);
    let perp = Point::new(-d.y, d.x);
    let tip = c + d * length;
    let half = length * 0.4;
    raster::fill_polygon(img, &[tip, c + perp * half, c - perp * half], color);
}

fn arrow(img: &mut RgbaImage, a: Point, b: Point, width: f64, color: Color) {
    let dir = (b - a).normalize_or_zero();
    if dir == Point::ZERO {
        return;
    }
    let head_len = width * 3.0;
    let base = b - dir * head_len;
    let perp = Point::new(-dir.y, dir.x) * (width * 1.5);
    raster::stroke_segment(img, a, base, width, color);
    raster::fill_polygon(img, &[b, base + perp, base - perp], color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;

    #[test]
    fn test_unit_counter_center_is_owner_color() {
        let g = UnitGlyph {
            entity: EntityId(1),
            center: Point::new(42.0, 36.0),
            radius: 25.0,
            facing: HexDirection::NorthEast,
            color: Color::rgb(60, 110, 230),
            outline: Color::BLACK,
        };
        let img = paint(&SpriteKind::Unit(g), Rect::new(0.0, 0.0, 84.0, 72.0));
        assert_eq!(img.get_pixel(42, 36).0, [60, 110, 230, 255]);
        // Corner stays transparent
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_direction_vectors() {
        let n = direction_vector(HexDirection::North);
        assert!(n.x.abs() < 1e-9 && (n.y + 1.0).abs() < 1e-9);
        let se = direction_vector(HexDirection::SouthEast);
        assert!(se.x > 0.0 && se.y > 0.0);
    }

    #[test]
    fn test_arrow_paints_head() {
        let kind = SpriteKind::AttackArrow {
            attacker: EntityId(1),
            target: EntityId(2),
            a: Point::new(10.0, 20.0),
            b: Point::new(90.0, 20.0),
            halved: false,
            width: 4.0,
            color: Color::rgb(255, 0, 0),
            outline: Color::BLACK,
            labels: vec![],
        };
        let img = paint(&kind, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(img.get_pixel(50, 20).0, [255, 0, 0, 255]);
        // Head is wider than the shaft
        assert_ne!(img.get_pixel(80, 23).0[3], 0);
        assert_eq!(img.get_pixel(50, 27).0[3], 0);
    }
}
