//! Software rasterization onto `image::RgbaImage` buffers.
//!
//! Coordinates are in image pixels; a pixel is covered when its center lies
//! inside the shape. Everything composites source-over.

use image::RgbaImage;

use crate::core::types::{Color, Point, Rect};

/// Composite `color` over one pixel. Out-of-image writes are dropped.
pub fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if color.a == 0 || x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    if color.a == 255 {
        *px = color.to_rgba();
        return;
    }

    let [dr, dg, db, da] = px.0;
    let sa = color.a as f32 / 255.0;
    let da = da as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    let mix = |s: u8, d: u8| -> u8 {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    px.0 = [
        mix(color.r, dr),
        mix(color.g, dg),
        mix(color.b, db),
        (out_a * 255.0).round() as u8,
    ];
}

/// Scanline fill with the even-odd rule
pub fn fill_polygon(img: &mut RgbaImage, points: &[Point], color: Color) {
    if points.len() < 3 || color.a == 0 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let y0 = (min_y.floor() as i64).max(0);
    let y1 = (max_y.ceil() as i64).min(img.height() as i64);

    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
    for y in y0..y1 {
        let sample = y as f64 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample && b.y > sample) || (b.y <= sample && a.y > sample) {
                let t = (sample - a.y) / (b.y - a.y);
                crossings.push(a.x + (b.x - a.x) * t);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            // Pixel x is covered when x + 0.5 lies in [span0, span1)
            let start = (span[0] - 0.5).ceil() as i64;
            let end = (span[1] - 0.5).ceil() as i64;
            for x in start.max(0)..end.min(img.width() as i64) {
                blend_pixel(img, x, y, color);
            }
        }
    }
}

pub fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Color) {
    let corners = [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
    ];
    fill_polygon(img, &corners, color);
}

/// Thick line segment drawn as a quad
pub fn stroke_segment(img: &mut RgbaImage, a: Point, b: Point, width: f64, color: Color) {
    let dir = b - a;
    let len = dir.length();
    if len <= f64::EPSILON || width <= 0.0 {
        return;
    }
    let normal = Point::new(-dir.y, dir.x) / len * (width / 2.0);
    fill_polygon(img, &[a + normal, b + normal, b - normal, a - normal], color);
}

pub fn stroke_polyline(img: &mut RgbaImage, points: &[Point], width: f64, color: Color, closed: bool) {
    for pair in points.windows(2) {
        stroke_segment(img, pair[0], pair[1], width, color);
    }
    if closed && points.len() > 2 {
        stroke_segment(img, points[points.len() - 1], points[0], width, color);
    }
}

pub fn fill_circle(img: &mut RgbaImage, center: Point, radius: f64, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let x0 = ((center.x - radius).floor() as i64).max(0);
    let x1 = ((center.x + radius).ceil() as i64).min(img.width() as i64);
    let y0 = ((center.y - radius).floor() as i64).max(0);
    let y1 = ((center.y + radius).ceil() as i64).min(img.height() as i64);
    let r2 = radius * radius;
    for y in y0..y1 {
        for x in x0..x1 {
            let d = Point::new(x as f64 + 0.5, y as f64 + 0.5) - center;
            if d.length_squared() <= r2 {
                blend_pixel(img, x, y, color);
            }
        }
    }
}

/// Composite `src` onto `dst` with its top-left at (x, y)
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for (sx, sy, px) in src.enumerate_pixels() {
        blend_pixel(dst, x + sx as i64, y + sy as i64, Color::from_rgba(*px));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::new(w, h)
    }

    #[test]
    fn test_opaque_blend_replaces() {
        let mut img = blank(2, 2);
        blend_pixel(&mut img, 1, 1, Color::rgb(10, 20, 30));
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let mut img = blank(1, 1);
        blend_pixel(&mut img, 0, 0, Color::rgb(0, 0, 0));
        blend_pixel(&mut img, 0, 0, Color::rgba(255, 255, 255, 128));
        let px = img.get_pixel(0, 0).0;
        assert_eq!(px[3], 255);
        assert!(px[0] > 120 && px[0] < 135);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut img = blank(2, 2);
        blend_pixel(&mut img, -1, 0, Color::WHITE);
        blend_pixel(&mut img, 0, 5, Color::WHITE);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_exact_coverage() {
        let mut img = blank(10, 10);
        fill_rect(&mut img, Rect::new(2.0, 3.0, 4.0, 2.0), Color::WHITE);
        let covered = img.pixels().filter(|p| p.0[3] == 255).count();
        assert_eq!(covered, 8);
        assert_eq!(img.get_pixel(2, 3).0[3], 255);
        assert_eq!(img.get_pixel(6, 3).0[3], 0);
    }

    #[test]
    fn test_fill_circle_center() {
        let mut img = blank(20, 20);
        fill_circle(&mut img, Point::new(10.0, 10.0), 4.0, Color::WHITE);
        assert_eq!(img.get_pixel(10, 10).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_blit_offsets() {
        let mut src = blank(2, 2);
        blend_pixel(&mut src, 0, 0, Color::rgb(255, 0, 0));
        let mut dst = blank(5, 5);
        blit(&mut dst, &src, 3, 3);
        assert_eq!(dst.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(dst.get_pixel(4, 4).0[3], 0);
    }

    #[test]
    fn test_stroke_segment_covers_line() {
        let mut img = blank(20, 20);
        stroke_segment(&mut img, Point::new(2.0, 10.0), Point::new(18.0, 10.0), 2.0, Color::WHITE);
        assert_eq!(img.get_pixel(10, 10).0[3], 255);
        assert_eq!(img.get_pixel(10, 15).0[3], 0);
    }
}
