//! New Year Fireworks - a canvas fireworks show
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rockets, sparks, glyph particles, phases)
//! - `renderer`: Raster surface abstraction plus software and browser rasters
//! - `sampler`: Text-to-point sampling for the glyph particles
//! - `overlay`: Floating blessing text

pub mod overlay;
pub mod renderer;
pub mod sampler;
pub mod sim;

pub use overlay::{BLESSINGS, LogOverlay, Overlay, OverlayId};
pub use renderer::{Color, Raster, RasterError, SoftCanvas, TextStyle};
pub use sampler::sample_text;
pub use sim::{Phase, ShowState, ShowStats, tick};

/// Show constants. Everything is fixed; there is no runtime configuration.
pub mod consts {
    /// Opacity of the black rectangle painted every frame (motion trails)
    pub const FADE_ALPHA: f32 = 0.15;

    /// Ticks spent idle before the text rocket launches
    pub const IDLE_TICKS: u32 = 60;
    /// Ticks of text formation before ambient launches begin
    pub const TEXT_FORMATION_TICKS: u32 = 400;
    /// Delay between the text rocket launch and glyph spawning (ms)
    pub const TEXT_SPAWN_DELAY_MS: f64 = 1000.0;
    /// Delay between glyph spawn and the start of gathering (ms)
    pub const GATHER_DELAY_MS: f64 = 1000.0;
    /// Lifetime of a blessing overlay (ms)
    pub const BLESSING_LIFETIME_MS: f64 = 10_000.0;

    /// Greeting assembled by the glyph particles ("Happy New Year")
    pub const GREETING: &str = "新年快乐";

    /// Per-tick chance of an ambient rocket launch
    pub const AMBIENT_LAUNCH_CHANCE: f64 = 0.05;
    /// Per-tick chance of a blessing overlay
    pub const BLESSING_CHANCE: f64 = 0.015;

    /// Spark physics
    pub const SPARK_FRICTION: f32 = 0.95;
    pub const SPARK_GRAVITY: f32 = 0.1;
    pub const SPARK_FADE: f32 = 0.01;
    pub const SPARK_MIN_RADIUS: f32 = 1.0;
    pub const SPARK_MAX_RADIUS: f32 = 3.0;

    /// Rocket physics
    pub const ROCKET_GRAVITY: f32 = 0.15;
    pub const ROCKET_RADIUS: f32 = 3.0;
    pub const ROCKET_TRAIL_SCALE: f32 = 2.0;
    pub const ROCKET_TRAIL_WIDTH: f32 = 2.0;

    /// Burst shape: count is drawn from [MIN, MIN + SPREAD)
    pub const BURST_MIN_SPARKS: u32 = 80;
    pub const BURST_SPARK_SPREAD: u32 = 40;
    pub const BURST_MIN_SPEED: f32 = 2.0;
    pub const BURST_MAX_SPEED: f32 = 8.0;

    /// Glyph particle physics
    pub const GLYPH_FRICTION: f32 = 0.95;
    pub const GLYPH_GATHER_FRICTION: f32 = 0.85;
    pub const GLYPH_PULL: f32 = 0.02;
    pub const GLYPH_MIN_SPEED: f32 = 5.0;
    pub const GLYPH_MAX_SPEED: f32 = 15.0;
    pub const GLYPH_FADE_IN: f32 = 0.05;
    pub const GLYPH_FADE_OUT: f32 = 0.01;
    pub const GLYPH_LIFE_TICKS: u32 = 1200;
    /// Below this many remaining ticks the glyph fades out
    pub const GLYPH_FADE_OUT_TICKS: u32 = 100;
    pub const GLYPH_RADIUS: f32 = 1.8;
    /// Hue window for glyph colours, degrees (wraps past 360)
    pub const GLYPH_HUE_START: f32 = 330.0;
    pub const GLYPH_HUE_SPAN: f32 = 60.0;

    /// Saturation / lightness used for all hue-based colours (percent)
    pub const FIREWORK_SATURATION: f32 = 100.0;
    pub const FIREWORK_LIGHTNESS: f32 = 60.0;

    /// Point sampling: minimum stride and the width that buys one more pixel
    pub const SAMPLE_MIN_STRIDE: u32 = 4;
    pub const SAMPLE_STRIDE_WIDTH: u32 = 400;
    /// Alpha a pixel must exceed to count as glyph foreground
    pub const SAMPLE_ALPHA_THRESHOLD: u8 = 128;
}

/// Reset a vector to zero if any component went NaN or infinite
#[inline]
pub fn finite_or_zero(v: glam::Vec2) -> glam::Vec2 {
    if v.is_finite() { v } else { glam::Vec2::ZERO }
}
