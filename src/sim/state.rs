//! Show state: every live entity, the phase machine and pending timers

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::glyph::GlyphParticle;
use super::phase::{Phase, PhaseScheduler};
use super::rocket::Rocket;
use super::spark::Spark;
use super::timers::TimerQueue;
use crate::consts::*;
use crate::overlay::{BLESSINGS, Overlay, OverlayId};
use crate::renderer::{Color, Raster};
use crate::sampler::sample_text;

/// Work scheduled for a later frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Sample the greeting and spawn its glyph particles
    FormText,
    /// Take a blessing off screen
    DismissBlessing(OverlayId),
}

/// Running totals, mostly for logging and the headless summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowStats {
    pub rockets_launched: u32,
    pub bursts: u32,
    pub sparks_emitted: u64,
    pub glyph_batches: u32,
    pub glyphs_spawned: u64,
    pub blessings_shown: u32,
    pub blessings_dismissed: u32,
    /// Snapshot taken at the end of the latest tick
    pub phase: Phase,
    pub live_rockets: usize,
    pub live_sparks: usize,
    pub live_glyphs: usize,
}

/// Complete show state
pub struct ShowState {
    /// Seed the RNG was built from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Frames ticked since start
    pub time_ticks: u64,
    pub scheduler: PhaseScheduler,
    pub rockets: Vec<Rocket>,
    pub sparks: Vec<Spark>,
    pub glyphs: Vec<GlyphParticle>,
    pub(crate) timers: TimerQueue<Deferred>,
    pub stats: ShowStats,
    next_overlay_id: OverlayId,
}

impl ShowState {
    /// Fresh show in the idle phase
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            scheduler: PhaseScheduler::new(),
            rockets: Vec::new(),
            sparks: Vec::new(),
            glyphs: Vec::new(),
            timers: TimerQueue::new(),
            stats: ShowStats::default(),
            next_overlay_id: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Tasks still waiting on the clock
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// White rocket from the bottom centre to half height; glyphs follow
    /// `TEXT_SPAWN_DELAY_MS` later
    pub fn launch_text_rocket(&mut self, raster: &dyn Raster, now_ms: f64) {
        let (w, h) = raster.size();
        let (w, h) = (w as f32, h as f32);
        let rocket = Rocket::launch(&mut self.rng, w / 2.0, h, h / 2.0, Color::WHITE);
        self.rockets.push(rocket);
        self.stats.rockets_launched += 1;
        self.timers
            .schedule(now_ms + TEXT_SPAWN_DELAY_MS, Deferred::FormText);
    }

    /// Rocket at a random spot on the bottom edge, bursting in the top half
    pub fn launch_ambient_rocket(&mut self, raster: &dyn Raster) {
        let (w, h) = raster.size();
        let (w, h) = (w as f32, h as f32);
        let x = self.rng.random::<f32>() * w;
        let target_y = self.rng.random::<f32>() * h * 0.5;
        let hue = self.rng.random_range(0.0..360.0);
        let color = Color::hsl(hue, FIREWORK_SATURATION, FIREWORK_LIGHTNESS);
        let rocket = Rocket::launch(&mut self.rng, x, h, target_y, color);
        self.rockets.push(rocket);
        self.stats.rockets_launched += 1;
    }

    /// Sample the greeting with the raster's current size and spawn one glyph
    /// particle per point, all starting from the current centre
    pub fn form_text(&mut self, raster: &dyn Raster, now_ms: f64) {
        let (w, h) = raster.size();
        let points = sample_text(raster, GREETING, w, h);
        let origin = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);

        self.glyphs.reserve(points.len());
        for dest in &points {
            let hue = GLYPH_HUE_START + self.rng.random::<f32>() * GLYPH_HUE_SPAN;
            let color = Color::hsl(hue, FIREWORK_SATURATION, FIREWORK_LIGHTNESS);
            let glyph = GlyphParticle::new(&mut self.rng, origin, *dest, color, now_ms);
            self.glyphs.push(glyph);
        }

        self.stats.glyph_batches += 1;
        self.stats.glyphs_spawned += points.len() as u64;
        log::debug!("Greeting sampled at {}x{}: {} glyph particles", w, h, points.len());
    }

    /// Float a random blessing and schedule its removal
    pub fn show_blessing(&mut self, overlay: &mut dyn Overlay, now_ms: f64) {
        let Some(text) = BLESSINGS.choose(&mut self.rng).copied() else {
            return;
        };
        let left_percent = self.rng.random_range(10.0..90.0);
        let id = self.next_overlay_id;
        self.next_overlay_id += 1;

        overlay.show(id, text, left_percent);
        self.stats.blessings_shown += 1;
        self.timers
            .schedule(now_ms + BLESSING_LIFETIME_MS, Deferred::DismissBlessing(id));
    }

    /// Run one deferred task
    pub(crate) fn run_deferred(
        &mut self,
        task: Deferred,
        raster: &dyn Raster,
        overlay: &mut dyn Overlay,
        now_ms: f64,
    ) {
        match task {
            Deferred::FormText => self.form_text(raster, now_ms),
            Deferred::DismissBlessing(id) => {
                overlay.dismiss(id);
                self.stats.blessings_dismissed += 1;
            }
        }
    }
}
