//! In-memory RGBA raster
//!
//! Used by the headless binary and by tests. Coverage is decided at pixel
//! centres and everything blends source-over, like the browser canvas.

use std::ops::Range;

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use glam::Vec2;

use super::{Color, Raster, RasterError, TextStyle};

/// Largest edge we are willing to allocate
const MAX_EDGE: u32 = 16_384;

/// Software raster with a row-major RGBA8 buffer
///
/// Text uses the `font8x8` Basic and Latin tables only. Anything else,
/// CJK included, is drawn as a hollow box per character, so sampled
/// greetings come out as boxes rather than readable shapes.
#[derive(Debug, Clone)]
pub struct SoftCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SoftCanvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Reallocate for a new size, clearing the contents
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// RGBA at a pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Source-over blend of one pixel
    fn blend(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        let i = self.index(x, y);
        let dst = &mut self.pixels[i..i + 4];
        if dst[3] == 255 && dst[..3] == [color.r, color.g, color.b] {
            return;
        }
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);

        for (channel, src) in [color.r, color.g, color.b].into_iter().enumerate() {
            let d = dst[channel] as f32;
            let v = (src as f32 * alpha + d * dst_a * (1.0 - alpha)) / out_a;
            dst[channel] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Pixels whose centres fall inside [start, start + len)
    fn span(start: f32, len: f32, limit: u32) -> Range<u32> {
        let lo = (start - 0.5).ceil().max(0.0);
        let hi = (start + len - 0.5).ceil().max(0.0);
        let lo = (lo as u32).min(limit);
        let hi = (hi as u32).min(limit);
        lo..hi.max(lo)
    }

    fn cover_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, alpha: f32) {
        let xs = Self::span(x, width, self.width);
        for py in Self::span(y, height, self.height) {
            for px in xs.clone() {
                self.blend(px, py, color, alpha);
            }
        }
    }

    /// Draw one 8x8 bitmap glyph (or a tofu box) into a square cell
    fn draw_glyph(&mut self, ch: char, origin: Vec2, cell: f32, bold: bool, color: Color) {
        let scale = cell / 8.0;
        let smear = if bold { scale * 0.25 } else { 0.0 };

        match BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch)) {
            Some(rows) => {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..8 {
                        if bits & (1 << col) == 0 {
                            continue;
                        }
                        self.cover_rect(
                            origin.x + col as f32 * scale,
                            origin.y + row as f32 * scale,
                            scale + smear,
                            scale,
                            color,
                            1.0,
                        );
                    }
                }
            }
            None if ch.is_whitespace() => {}
            None => {
                // Hollow box, one bitmap pixel inset, like a missing-glyph tofu
                let stroke = scale + smear;
                let (left, top) = (origin.x + scale, origin.y + scale);
                let side = cell - 2.0 * scale;
                self.cover_rect(left, top, side, stroke, color, 1.0);
                self.cover_rect(left, top + side - stroke, side, stroke, color, 1.0);
                self.cover_rect(left, top, stroke, side, color, 1.0);
                self.cover_rect(left + side - stroke, top, stroke, side, color, 1.0);
            }
        }
    }
}

impl Raster for SoftCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        self.cover_rect(x, y, width, height, color, alpha);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let r2 = radius * radius;
        let xs = Self::span(center.x - radius, 2.0 * radius, self.width);
        for py in Self::span(center.y - radius, 2.0 * radius, self.height) {
            for px in xs.clone() {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || width <= 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = width / 2.0;
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let seg = to - from;
        let seg_len2 = seg.length_squared();

        let xs = Self::span(min.x, max.x - min.x, self.width);
        for py in Self::span(min.y, max.y - min.y, self.height) {
            for px in xs.clone() {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if seg_len2 > 0.0 {
                    ((p - from).dot(seg) / seg_len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if p.distance_squared(from + seg * t) <= half * half {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, center: Vec2, style: &TextStyle, color: Color) {
        let count = text.chars().count();
        if count == 0 || style.size_px <= 0.0 {
            return;
        }
        let cell = style.size_px;
        let left = center.x - cell * count as f32 / 2.0;
        let top = center.y - cell / 2.0;
        for (i, ch) in text.chars().enumerate() {
            let origin = Vec2::new(left + i as f32 * cell, top);
            self.draw_glyph(ch, origin, cell, style.bold, color);
        }
    }

    fn read_pixels(&self) -> Result<Vec<u8>, RasterError> {
        Ok(self.pixels.clone())
    }

    fn offscreen(&self, width: u32, height: u32) -> Result<Box<dyn Raster>, RasterError> {
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(RasterError::InvalidSize { width, height });
        }
        Ok(Box::new(SoftCanvas::new(width, height)))
    }
}
