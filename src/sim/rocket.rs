//! Rockets: rise from the bottom edge, detonate into a ring of sparks

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Spark, Sprite};
use crate::consts::*;
use crate::renderer::{Color, Raster};

/// A rising rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Screen-space y at which the rocket bursts (y grows downward)
    pub target_y: f32,
    pub color: Color,
    pub alive: bool,
}

/// Where and in what colour a rocket burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub pos: Vec2,
    pub color: Color,
}

impl Rocket {
    /// Launch from `(x, launch_y)` with a little lateral drift and a strong
    /// upward kick
    pub fn launch<R: Rng>(rng: &mut R, x: f32, launch_y: f32, target_y: f32, color: Color) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0,
            -rng.random::<f32>() * 5.0 - 12.0,
        );
        Self {
            pos: Vec2::new(x, launch_y),
            vel,
            target_y,
            color,
            alive: true,
        }
    }
}

impl Sprite for Rocket {
    type Event = Option<Detonation>;

    /// Move, apply gravity, then burst once the rocket stalls or reaches its
    /// target height, whichever comes first
    fn update(&mut self, _now_ms: f64) -> Option<Detonation> {
        if !self.alive {
            return None;
        }

        self.pos += self.vel;
        self.vel.y += ROCKET_GRAVITY;

        if self.vel.y >= 0.0 || self.pos.y <= self.target_y {
            self.alive = false;
            return Some(Detonation {
                pos: self.pos,
                color: self.color,
            });
        }
        None
    }

    fn draw(&self, raster: &mut dyn Raster) {
        raster.fill_circle(self.pos, ROCKET_RADIUS, self.color, 1.0);
        let tail = self.pos - self.vel * ROCKET_TRAIL_SCALE;
        raster.stroke_line(self.pos, tail, ROCKET_TRAIL_WIDTH, self.color, 1.0);
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Detonation {
    /// Ring of sparks at equal angular spacing with random radial speeds
    pub fn burst<R: Rng>(&self, rng: &mut R) -> Vec<Spark> {
        let count = BURST_MIN_SPARKS + rng.random_range(0..BURST_SPARK_SPREAD);
        (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                let speed = rng.random_range(BURST_MIN_SPEED..BURST_MAX_SPEED);
                let radius = rng.random_range(SPARK_MIN_RADIUS..SPARK_MAX_RADIUS);
                Spark::new(
                    self.pos,
                    Vec2::new(angle.cos(), angle.sin()) * speed,
                    self.color,
                    radius,
                )
            })
            .collect()
    }
}
