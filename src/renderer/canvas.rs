//! Drawing surface abstraction.
//!
//! Everything the board view draws goes through [`Canvas`], in board-pixel
//! coordinates. [`RasterCanvas`] is the software back buffer: it covers one
//! viewport rectangle of the board and rasterizes into an `RgbaImage`.

use image::RgbaImage;

use crate::core::types::{Color, Point, Rect};
use crate::renderer::raster;

/// A positioned run of text. Glyph shaping belongs to the presentation layer;
/// the core only decides what text goes where.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub at: Point,
    pub text: String,
    pub color: Color,
}

/// Drawing seam between the board view and a graphics backend.
pub trait Canvas {
    /// Board-space rectangle this canvas covers
    fn clip(&self) -> Rect;

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Color, closed: bool);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Composite an image with its top-left corner at `at`
    fn blit(&mut self, image: &RgbaImage, at: Point);

    fn draw_text(&mut self, at: Point, text: &str, color: Color);
}

/// Software back buffer for one viewport rectangle.
pub struct RasterCanvas {
    viewport: Rect,
    pixels: RgbaImage,
    text: Vec<TextRun>,
}

impl RasterCanvas {
    /// Create a buffer covering `viewport`, cleared to `background`
    pub fn new(viewport: Rect, background: Color) -> Self {
        let w = viewport.width.max(0.0).ceil() as u32;
        let h = viewport.height.max(0.0).ceil() as u32;
        let pixels = RgbaImage::from_pixel(w, h, background.to_rgba());
        Self {
            viewport,
            pixels,
            text: Vec::new(),
        }
    }

    fn local(&self, p: Point) -> Point {
        p - self.viewport.origin()
    }

    fn local_points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.local(*p)).collect()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    /// Color at a board-space point, `None` outside the viewport
    pub fn pixel_at(&self, board_point: Point) -> Option<Color> {
        let p = self.local(board_point);
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x.floor() as u32, p.y.floor() as u32);
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        Some(Color::from_rgba(*self.pixels.get_pixel(x, y)))
    }
}

impl Canvas for RasterCanvas {
    fn clip(&self) -> Rect {
        self.viewport
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let local = self.local_points(points);
        raster::fill_polygon(&mut self.pixels, &local, color);
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Color, closed: bool) {
        let local = self.local_points(points);
        raster::stroke_polyline(&mut self.pixels, &local, width, color, closed);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let local = rect.translate(-self.viewport.origin());
        raster::fill_rect(&mut self.pixels, local, color);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let c = self.local(center);
        raster::fill_circle(&mut self.pixels, c, radius, color);
    }

    fn blit(&mut self, image: &RgbaImage, at: Point) {
        let p = self.local(at);
        raster::blit(&mut self.pixels, image, p.x.round() as i64, p.y.round() as i64);
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        if !self.viewport.contains(at) {
            return;
        }
        self.text.push(TextRun {
            at,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_translates_to_viewport() {
        let mut canvas = RasterCanvas::new(Rect::new(100.0, 50.0, 20.0, 20.0), Color::BLACK);
        canvas.fill_rect(Rect::new(105.0, 55.0, 2.0, 2.0), Color::WHITE);
        assert_eq!(canvas.pixel_at(Point::new(105.5, 55.5)), Some(Color::WHITE));
        assert_eq!(canvas.pixel_at(Point::new(110.5, 60.5)), Some(Color::BLACK));
        assert_eq!(canvas.pixel_at(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_text_outside_clip_is_dropped() {
        let mut canvas = RasterCanvas::new(Rect::new(0.0, 0.0, 50.0, 50.0), Color::BLACK);
        canvas.draw_text(Point::new(10.0, 10.0), "0101", Color::WHITE);
        canvas.draw_text(Point::new(80.0, 10.0), "0201", Color::WHITE);
        assert_eq!(canvas.text_runs().len(), 1);
        assert_eq!(canvas.text_runs()[0].text, "0101");
    }
}
