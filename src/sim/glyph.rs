//! Glyph particles: burst from the screen centre, then gather onto a sampled
//! text point and hold it until they fade

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Sprite;
use crate::consts::*;
use crate::finite_or_zero;
use crate::renderer::{Color, Raster};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphParticle {
    pub pos: Vec2,
    /// Sampled glyph point this particle settles on
    pub dest: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub friction: f32,
    /// Starts at 0 and fades in
    pub alpha: f32,
    pub active: bool,
    /// Ticks left before the fade-out starts to matter
    pub life: u32,
    pub gathering: bool,
    /// Host time (ms) at which gathering begins
    pub gather_at_ms: f64,
}

impl GlyphParticle {
    /// Spawn at `origin` with a random outward velocity
    pub fn new<R: Rng>(rng: &mut R, origin: Vec2, dest: Vec2, color: Color, now_ms: f64) -> Self {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(GLYPH_MIN_SPEED..GLYPH_MAX_SPEED);
        Self {
            pos: origin,
            dest,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            friction: GLYPH_FRICTION,
            alpha: 0.0,
            active: true,
            life: GLYPH_LIFE_TICKS,
            gathering: false,
            gather_at_ms: now_ms + GATHER_DELAY_MS,
        }
    }

    pub fn distance_to_dest(&self) -> f32 {
        self.pos.distance(self.dest)
    }

    fn fading_out(&self) -> bool {
        self.life < GLYPH_FADE_OUT_TICKS
    }
}

impl Sprite for GlyphParticle {
    type Event = ();

    fn update(&mut self, now_ms: f64) {
        if !self.gathering && now_ms >= self.gather_at_ms {
            self.gathering = true;
            self.friction = GLYPH_GATHER_FRICTION;
        }

        if self.gathering {
            // Spring toward the destination: |pull| = distance * GLYPH_PULL
            let pull = finite_or_zero((self.dest - self.pos) * GLYPH_PULL);
            self.vel += pull;
        }

        self.vel = finite_or_zero(self.vel * self.friction);
        self.pos += self.vel;

        self.life = self.life.saturating_sub(1);
        if self.fading_out() {
            self.alpha -= GLYPH_FADE_OUT;
            if self.alpha <= 0.0 {
                self.active = false;
            }
        } else if self.alpha < 1.0 {
            self.alpha = (self.alpha + GLYPH_FADE_IN).min(1.0);
        }
    }

    fn draw(&self, raster: &mut dyn Raster) {
        if self.alpha <= 0.0 {
            return;
        }
        raster.fill_circle(self.pos, GLYPH_RADIUS, self.color, self.alpha.min(1.0));
    }

    fn is_alive(&self) -> bool {
        self.active
    }
}
