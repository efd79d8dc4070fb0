//! Browser 2D canvas raster (wasm32 only)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Raster, RasterError, TextStyle};

/// Font stack used for all text
const FONT_FAMILY: &str = "\"Microsoft YaHei\", \"SimHei\", sans-serif";

fn js_err(e: JsValue) -> RasterError {
    RasterError::Js(format!("{:?}", e))
}

/// `HtmlCanvasElement` plus its 2D context
pub struct CanvasRaster {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRaster {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RasterError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or(RasterError::Unavailable("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RasterError::Unavailable("2d context"))?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to new window dimensions
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Run a draw call with `globalAlpha` scoped to it
    fn with_alpha(&self, alpha: f32, draw: impl FnOnce(&CanvasRenderingContext2d)) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        self.ctx.save();
        self.ctx.set_global_alpha(alpha as f64);
        draw(&self.ctx);
        self.ctx.restore();
    }
}

impl Raster for CanvasRaster {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, alpha: f32) {
        self.with_alpha(alpha, |ctx| {
            ctx.set_fill_style_str(&color.css());
            ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.with_alpha(alpha, |ctx| {
            ctx.begin_path();
            if ctx
                .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
                .is_ok()
            {
                ctx.set_fill_style_str(&color.css());
                ctx.fill();
            }
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, alpha: f32) {
        self.with_alpha(alpha, |ctx| {
            ctx.begin_path();
            ctx.move_to(from.x as f64, from.y as f64);
            ctx.line_to(to.x as f64, to.y as f64);
            ctx.set_stroke_style_str(&color.css());
            ctx.set_line_width(width as f64);
            ctx.stroke();
        });
    }

    fn fill_text(&mut self, text: &str, center: Vec2, style: &TextStyle, color: Color) {
        let weight = if style.bold { "bold" } else { "normal" };
        self.ctx.save();
        self.ctx
            .set_font(&format!("{} {}px {}", weight, style.size_px, FONT_FAMILY));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.css());
        if let Err(e) = self.ctx.fill_text(text, center.x as f64, center.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
        self.ctx.restore();
    }

    fn read_pixels(&self) -> Result<Vec<u8>, RasterError> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Err(RasterError::InvalidSize { width: w, height: h });
        }
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, w as f64, h as f64)
            .map_err(js_err)?;
        Ok(data.data().0)
    }

    fn offscreen(&self, width: u32, height: u32) -> Result<Box<dyn Raster>, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSize { width, height });
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(RasterError::Unavailable("document"))?;
        let canvas = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RasterError::Unavailable("canvas element"))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(Box::new(CanvasRaster::new(canvas)?))
    }
}
