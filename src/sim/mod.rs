//! Deterministic simulation module
//!
//! All show logic lives here:
//! - One tick per host frame, timestamps supplied by the host
//! - Seeded RNG only
//! - Collections are updated, drawn and compacted in a fixed order
//! - Drawing goes through the `Raster` trait; no platform dependencies

pub mod glyph;
pub mod phase;
pub mod rocket;
pub mod spark;
pub mod state;
pub mod tick;
pub mod timers;

pub use glyph::GlyphParticle;
pub use phase::{Cue, Phase, PhaseScheduler};
pub use rocket::{Detonation, Rocket};
pub use spark::Spark;
pub use state::{Deferred, ShowState, ShowStats};
pub use tick::tick;
pub use timers::TimerQueue;

use crate::renderer::Raster;

/// Shared capability of everything the show animates
pub trait Sprite {
    /// What one update step reports back to the tick
    type Event;

    /// Advance one frame; `now_ms` is the host frame timestamp
    fn update(&mut self, now_ms: f64) -> Self::Event;

    fn draw(&self, raster: &mut dyn Raster);

    /// False once the sprite should be removed at the end of this sweep
    fn is_alive(&self) -> bool;
}
