//! Clipping drawing surface addressed in world coordinates.

use glam::{IVec2, Vec2};
use image::RgbaImage;

use crate::color::Color;
use crate::geometry::Rect2i;

/// A write-only view of an RGBA buffer translated into world space.
///
/// World point `origin` maps to pixel `(0, 0)`. Every primitive clips per
/// pixel against the buffer, so callers may pass geometry that lies partly
/// or entirely outside it.
pub struct Canvas<'a> {
    image: &'a mut RgbaImage,
    origin: IVec2,
}

impl<'a> Canvas<'a> {
    pub fn new(image: &'a mut RgbaImage, origin: IVec2) -> Self {
        Self { image, origin }
    }

    /// Canvas for a buffer covering `bounds`, with `bounds.min()` at pixel origin.
    pub fn for_region(image: &'a mut RgbaImage, bounds: Rect2i) -> Self {
        Self::new(image, bounds.min())
    }

    /// World-space area covered by the buffer.
    pub fn bounds(&self) -> Rect2i {
        Rect2i::new(self.origin.x, self.origin.y, self.image.width(), self.image.height())
    }

    /// Sets one world-space pixel; ignored outside the buffer.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        let px = x - self.origin.x;
        let py = y - self.origin.y;
        if px < 0 || py < 0 || px >= self.image.width() as i32 || py >= self.image.height() as i32 {
            return;
        }
        self.image.put_pixel(px as u32, py as u32, color.to_rgba());
    }

    /// Fills the `width × height` rectangle whose top-left pixel is `(x, y)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let area = Rect2i::new(x, y, width.max(0) as u32, height.max(0) as u32);
        let visible = area.intersection(&self.bounds());
        for wy in visible.min_y..visible.max_y() {
            for wx in visible.min_x..visible.max_x() {
                self.put_pixel(wx, wy, color);
            }
        }
    }

    /// Outlines a rectangle; the outline spans `width + 1` by `height + 1` pixels.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width < 0 || height < 0 {
            return;
        }
        let (x1, y1) = (x + width, y + height);
        self.draw_line(x, y, x1, y, color);
        self.draw_line(x, y1, x1, y1, color);
        self.draw_line(x, y, x, y1, color);
        self.draw_line(x1, y, x1, y1, color);
    }

    /// One-pixel line between two world points, both end points included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fills the ellipse inscribed in the given rectangle.
    ///
    /// A pixel is covered when its center lies inside the ellipse.
    pub fn fill_oval(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 0 || height <= 0 {
            return;
        }
        let rx = width as f32 * 0.5;
        let ry = height as f32 * 0.5;
        let cx = x as f32 + rx;
        let cy = y as f32 + ry;

        let area = Rect2i::new(x, y, width as u32, height as u32).intersection(&self.bounds());
        for wy in area.min_y..area.max_y() {
            for wx in area.min_x..area.max_x() {
                let nx = (wx as f32 + 0.5 - cx) / rx;
                let ny = (wy as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.put_pixel(wx, wy, color);
                }
            }
        }
    }

    /// Fills a simple polygon given in world coordinates (even-odd rule).
    ///
    /// Pixels are sampled at their centers with half-open spans, so polygons
    /// that share an edge neither overlap nor leave gaps along it.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }

        let (lo, hi) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let bounds = self.bounds();
        let row_min = (lo.y.floor() as i32).max(bounds.min_y);
        let row_max = (hi.y.ceil() as i32).min(bounds.max_y());

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for wy in row_min..row_max {
            let sample_y = wy as f32 + 0.5;
            crossings.clear();

            for i in 0..points.len() {
                let (mut a, mut b) = (points[i], points[(i + 1) % points.len()]);
                if a.y == b.y {
                    continue;
                }
                if a.y > b.y {
                    std::mem::swap(&mut a, &mut b);
                }
                if sample_y >= a.y && sample_y < b.y {
                    crossings.push(a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i32).max(bounds.min_x);
                let end = ((span[1] - 0.5).ceil() as i32).min(bounds.max_x());
                for wx in start..end {
                    self.put_pixel(wx, wy, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Color::TRANSPARENT.to_rgba())
    }

    fn count(img: &RgbaImage, color: Color) -> usize {
        img.pixels().filter(|p| **p == color.to_rgba()).count()
    }

    #[test]
    fn test_translation_maps_origin_to_pixel_zero() {
        let mut img = blank(4, 4);
        let mut canvas = Canvas::for_region(&mut img, Rect2i::new(100, -50, 4, 4));
        canvas.put_pixel(100, -50, Color::RED);
        canvas.put_pixel(103, -47, Color::BLUE);
        assert_eq!(*img.get_pixel(0, 0), Color::RED.to_rgba());
        assert_eq!(*img.get_pixel(3, 3), Color::BLUE.to_rgba());
    }

    #[test]
    fn test_primitives_clip_silently() {
        let mut img = blank(8, 8);
        let mut canvas = Canvas::new(&mut img, IVec2::ZERO);
        canvas.put_pixel(-1, 3, Color::RED);
        canvas.put_pixel(8, 3, Color::RED);
        canvas.fill_rect(-4, -4, 6, 6, Color::WHITE);
        canvas.draw_line(-100, 7, 100, 7, Color::CYAN);
        canvas.fill_oval(1000, 1000, 4, 4, Color::BLACK);
        canvas.fill_polygon(
            &[Vec2::new(-20.0, -20.0), Vec2::new(-10.0, -20.0), Vec2::new(-10.0, -10.0)],
            Color::MAGENTA,
        );

        assert_eq!(count(&img, Color::RED), 0);
        assert_eq!(count(&img, Color::WHITE), 4);
        assert_eq!(count(&img, Color::CYAN), 8);
        assert_eq!(count(&img, Color::BLACK), 0);
        assert_eq!(count(&img, Color::MAGENTA), 0);
    }

    #[test]
    fn test_draw_line_includes_end_points() {
        let mut img = blank(10, 10);
        let mut canvas = Canvas::new(&mut img, IVec2::ZERO);
        canvas.draw_line(1, 1, 8, 5, Color::CYAN);
        assert_eq!(*img.get_pixel(1, 1), Color::CYAN.to_rgba());
        assert_eq!(*img.get_pixel(8, 5), Color::CYAN.to_rgba());
        assert_eq!(count(&img, Color::CYAN), 8);
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut img = blank(10, 10);
        let mut canvas = Canvas::new(&mut img, IVec2::ZERO);
        canvas.draw_rect(1, 1, 4, 3, Color::PINK);
        // 5 x 4 pixel outline.
        assert_eq!(count(&img, Color::PINK), 2 * 5 + 2 * 2);
        assert_eq!(*img.get_pixel(5, 4), Color::PINK.to_rgba());
        assert_ne!(*img.get_pixel(3, 2), Color::PINK.to_rgba());
    }

    #[test]
    fn test_marker_oval() {
        let mut img = blank(10, 10);
        let mut canvas = Canvas::new(&mut img, IVec2::ZERO);
        canvas.fill_oval(3, 3, 4, 4, Color::WHITE);
        // The four corner pixels of the 4x4 box fall outside the circle.
        assert_eq!(count(&img, Color::WHITE), 12);
    }

    #[test]
    fn test_fill_polygon_square_area() {
        let mut img = blank(16, 16);
        let mut canvas = Canvas::new(&mut img, IVec2::ZERO);
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(12.0, 2.0),
            Vec2::new(12.0, 12.0),
            Vec2::new(2.0, 12.0),
        ];
        canvas.fill_polygon(&square, Color::RED);
        assert_eq!(count(&img, Color::RED), 100);
    }

    #[test]
    fn test_adjacent_triangles_share_edge_without_overlap() {
        let a = [Vec2::new(0.3, 0.7), Vec2::new(13.9, 1.2), Vec2::new(6.1, 14.6)];
        let b = [Vec2::new(13.9, 1.2), Vec2::new(15.2, 15.8), Vec2::new(6.1, 14.6)];

        let mut img_a = blank(16, 16);
        Canvas::new(&mut img_a, IVec2::ZERO).fill_polygon(&a, Color::RED);
        let mut img_b = blank(16, 16);
        Canvas::new(&mut img_b, IVec2::ZERO).fill_polygon(&b, Color::RED);
        let mut img_both = blank(16, 16);
        {
            let mut canvas = Canvas::new(&mut img_both, IVec2::ZERO);
            canvas.fill_polygon(&a, Color::RED);
            canvas.fill_polygon(&b, Color::RED);
        }

        let overlap = img_a
            .pixels()
            .zip(img_b.pixels())
            .filter(|(pa, pb)| **pa == Color::RED.to_rgba() && **pb == Color::RED.to_rgba())
            .count();
        assert_eq!(overlap, 0);
        assert_eq!(
            count(&img_both, Color::RED),
            count(&img_a, Color::RED) + count(&img_b, Color::RED)
        );
    }
}
