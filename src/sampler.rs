//! Text-to-point sampling
//!
//! Renders a string bold and centred onto a scratch raster the size of the
//! visible surface, then walks the pixels on a grid and keeps every opaque
//! one. The resulting points are the destinations for glyph particles.

use glam::Vec2;

use crate::consts::{SAMPLE_ALPHA_THRESHOLD, SAMPLE_MIN_STRIDE, SAMPLE_STRIDE_WIDTH};
use crate::renderer::{Color, Raster, TextStyle};

/// Grid spacing in pixels for a surface of this width
pub fn sample_stride(width: u32) -> u32 {
    (width / SAMPLE_STRIDE_WIDTH).max(SAMPLE_MIN_STRIDE)
}

/// Font size that fits `text` across the width and a third of the height
pub fn font_size_for(text: &str, width: u32, height: u32) -> f32 {
    let len = text.chars().count() as f32;
    (width as f32 / (len + 1.0)).min(height as f32 / 3.0)
}

/// Sample glyph points for `text` at the given surface size.
///
/// Never fails: if the scratch raster cannot be created or read back the
/// problem is logged and no points are returned. The point shapes are only
/// as good as the host's font; `SoftCanvas` has no CJK glyphs.
pub fn sample_text(host: &dyn Raster, text: &str, width: u32, height: u32) -> Vec<Vec2> {
    if text.is_empty() || width == 0 || height == 0 {
        return Vec::new();
    }

    let mut scratch = match host.offscreen(width, height) {
        Ok(raster) => raster,
        Err(e) => {
            log::warn!("Cannot sample {:?}: {}", text, e);
            return Vec::new();
        }
    };

    let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
    let style = TextStyle::bold(font_size_for(text, width, height));
    scratch.fill_text(text, center, &style, Color::WHITE);

    match scratch.read_pixels() {
        Ok(pixels) => collect_points(&pixels, width, height, sample_stride(width)),
        Err(e) => {
            log::warn!("Cannot read back {:?}: {}", text, e);
            Vec::new()
        }
    }
}

/// Walk an RGBA8 buffer on a `stride` grid and keep pixels whose alpha
/// exceeds the foreground threshold
pub fn collect_points(pixels: &[u8], width: u32, height: u32, stride: u32) -> Vec<Vec2> {
    let stride = stride.max(1) as usize;
    let (w, h) = (width as usize, height as usize);
    let mut points = Vec::new();

    for y in (0..h).step_by(stride) {
        for x in (0..w).step_by(stride) {
            let alpha = pixels.get((y * w + x) * 4 + 3).copied().unwrap_or(0);
            if alpha > SAMPLE_ALPHA_THRESHOLD {
                points.push(Vec2::new(x as f32, y as f32));
            }
        }
    }

    points
}
