//! Raster rendering module
//!
//! The show draws through the [`Raster`] trait: a 2D surface with rect, circle,
//! line and text primitives plus RGBA readback. `SoftCanvas` is the in-memory
//! implementation used headless and in tests; `CanvasRaster` wraps the browser
//! 2D context on wasm32.

pub mod color;
pub mod soft;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

pub use color::Color;
pub use soft::SoftCanvas;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasRaster;

use glam::Vec2;
use thiserror::Error;

/// Failures at the raster boundary
#[derive(Debug, Error)]
pub enum RasterError {
    /// The backing surface or document is gone
    #[error("raster surface unavailable: {0}")]
    Unavailable(&'static str),
    /// A browser call threw
    #[error("canvas call failed: {0}")]
    Js(String),
    /// Zero-sized or oversized raster requested
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Font settings for [`Raster::fill_text`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size_px: f32,
    pub bold: bool,
}

impl TextStyle {
    pub fn bold(size_px: f32) -> Self {
        Self { size_px, bold: true }
    }
}

/// A 2D drawing surface.
///
/// Alpha values are clamped to [0, 1]; an alpha of zero draws nothing.
pub trait Raster {
    /// Current size in pixels, read live (the host may resize at any time)
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, alpha: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, alpha: f32);

    /// Draw text centred horizontally and vertically on `center`
    fn fill_text(&mut self, text: &str, center: Vec2, style: &TextStyle, color: Color);

    /// Row-major RGBA8 copy of the whole surface
    fn read_pixels(&self) -> Result<Vec<u8>, RasterError>;

    /// A fresh, fully transparent raster of the same kind
    fn offscreen(&self, width: u32, height: u32) -> Result<Box<dyn Raster>, RasterError>;
}
