//! Software rasterization into an RGBA image.
//!
//! [`RasterSurface`] implements [`Surface`] on top of an
//! [`image::RgbaImage`] so animations can be rendered without a browser,
//! e.g. to export frames as PNG. Shapes are filled with hard edges and
//! source-over alpha blending. Glyphs rasterize as solid cells; there is no
//! font shaping.

use crate::surface::{Fill, Rgba, Surface};
use crate::Result;
use glam::{UVec2, Vec2};
use image::RgbaImage;
use std::path::Path;

/// Width of a monospace glyph cell relative to the font size.
const GLYPH_ADVANCE: f32 = 0.6;
/// Portion of the font size that sits above the baseline.
const GLYPH_ASCENT: f32 = 0.8;

/// An in-memory pixel surface.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba,
}

impl RasterSurface {
    /// Create a surface cleared to opaque black.
    pub fn new(size: UVec2) -> Self {
        Self::with_background(size, Rgba::BLACK)
    }

    /// Create a surface cleared to `background`.
    ///
    /// The background is also used to clear the buffer on resize.
    pub fn with_background(size: UVec2, background: Rgba) -> Self {
        let mut surface = Self {
            image: RgbaImage::new(size.x, size.y),
            background,
        };
        surface.clear();
        surface
    }

    /// Reset every pixel to the background colour.
    pub fn clear(&mut self) {
        let px = to_pixel(self.background);
        for pixel in self.pixels_mut() {
            *pixel = px;
        }
    }

    /// The underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Read one pixel as `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.image.width() && y < self.image.height()).then(|| self.image.get_pixel(x, y).0)
    }

    /// Write the current buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut *self.image)
    }

    /// Blend `shade(x, y)` into every pixel of the clipped box `[min, max)`.
    ///
    /// `shade` is sampled at pixel centres and returns `None` to skip a pixel.
    fn shade_box(&mut self, min: Vec2, max: Vec2, shade: impl Fn(Vec2) -> Option<Rgba>) {
        let width = self.image.width();
        let height = self.image.height();
        if width == 0 || height == 0 {
            return;
        }

        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(height);

        let pixels = self.pixels_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(color) = shade(center) {
                    let idx = (y * width + x) as usize;
                    pixels[idx] = blend(pixels[idx], color);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    fn set_size(&mut self, size: UVec2) {
        if size != self.size() {
            self.image = RgbaImage::new(size.x, size.y);
        }
        self.clear();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let min = origin.min(origin + size);
        let max = origin.max(origin + size);
        self.shade_box(min, max, |_| Some(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = (width * 0.5).max(0.5);
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        self.shade_box(min, max, |p| {
            (distance_to_segment(p, from, to) <= half).then_some(color)
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        let extent = Vec2::splat(radius);
        self.shade_box(center - extent, center + extent, |p| {
            let d = p.distance(center);
            if d > radius {
                return None;
            }
            Some(match fill {
                Fill::Solid(color) => color,
                Fill::Radial { inner, outer } => lerp_rgba(inner, outer, d / radius),
            })
        });
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, font_px: f32, color: Rgba) {
        let advance = font_px * GLYPH_ADVANCE;
        let top = origin.y - font_px * GLYPH_ASCENT;
        for (i, _) in text.chars().enumerate() {
            let left = origin.x + advance * i as f32;
            self.shade_box(
                Vec2::new(left, top),
                Vec2::new(left + advance, top + font_px),
                |_| Some(color),
            );
        }
    }
}

fn to_pixel(color: Rgba) -> [u8; 4] {
    [color.r, color.g, color.b, (color.a.clamp(0.0, 1.0) * 255.0).round() as u8]
}

/// Source-over compositing of a straight-alpha colour onto a pixel.
fn blend(dst: [u8; 4], src: Rgba) -> [u8; 4] {
    let a = src.a.clamp(0.0, 1.0);
    if a <= 0.0 {
        return dst;
    }
    let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    [
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

fn lerp_rgba(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgba {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
        a: from.a + (to.a - from.a) * t,
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared_to_black() {
        let surface = RasterSurface::new(UVec2::new(4, 3));
        assert_eq!(surface.size(), UVec2::new(4, 3));
        assert_eq!(surface.pixel(3, 2), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_opaque_rect_overwrites() {
        let mut surface = RasterSurface::new(UVec2::new(8, 8));
        surface.fill_rect(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0), Rgba::new(255, 0, 0, 1.0));
        assert_eq!(surface.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(4, 4), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_fade_decays_towards_background() {
        let mut surface = RasterSurface::new(UVec2::new(2, 2));
        surface.fill_rect(Vec2::ZERO, Vec2::splat(2.0), Rgba::new(200, 200, 200, 1.0));
        surface.fade(Rgba::BLACK.with_alpha(0.5));
        assert_eq!(surface.pixel(0, 0), Some([100, 100, 100, 255]));
    }

    #[test]
    fn test_circle_is_clipped_and_round() {
        let mut surface = RasterSurface::new(UVec2::new(10, 10));
        surface.fill_circle(Vec2::new(5.0, 5.0), 3.0, Fill::Solid(Rgba::new(0, 255, 0, 1.0)));
        assert_eq!(surface.pixel(5, 5), Some([0, 255, 0, 255]));
        // Corner of the bounding box lies outside the circle.
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 255]));

        // Partially off-surface circles must not panic.
        surface.fill_circle(Vec2::new(-1.0, 12.0), 4.0, Fill::Solid(Rgba::BLACK));
    }

    #[test]
    fn test_radial_fill_fades_outwards() {
        let mut surface = RasterSurface::new(UVec2::new(21, 21));
        surface.fill_circle(
            Vec2::new(10.5, 10.5),
            10.0,
            Fill::Radial {
                inner: Rgba::new(255, 0, 255, 1.0),
                outer: Rgba::new(255, 0, 255, 0.0),
            },
        );
        let center = surface.pixel(10, 10).unwrap();
        let edge = surface.pixel(10, 2).unwrap();
        assert!(center[0] > edge[0]);
    }

    #[test]
    fn test_line_touches_endpoints() {
        let mut surface = RasterSurface::new(UVec2::new(10, 10));
        let cyan = Rgba::new(0, 255, 255, 1.0);
        surface.stroke_line(Vec2::new(0.5, 0.5), Vec2::new(8.5, 0.5), 1.0, cyan);
        assert_eq!(surface.pixel(0, 0), Some([0, 255, 255, 255]));
        assert_eq!(surface.pixel(8, 0), Some([0, 255, 255, 255]));
        assert_eq!(surface.pixel(4, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut surface = RasterSurface::new(UVec2::new(4, 4));
        surface.set_size(UVec2::new(6, 2));
        assert_eq!(surface.size(), UVec2::new(6, 2));
        assert_eq!(surface.image().as_raw().len(), 6 * 2 * 4);
    }
}
