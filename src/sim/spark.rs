//! Explosion sparks: the debris of every burst

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Sprite;
use crate::consts::*;
use crate::finite_or_zero;
use crate::renderer::{Color, Raster};

/// A single decaying spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 1 at birth, falls by `SPARK_FADE` per tick; dead at <= 0
    pub alpha: f32,
    pub radius: f32,
}

impl Spark {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, radius: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            alpha: 1.0,
            radius,
        }
    }
}

impl Sprite for Spark {
    type Event = ();

    fn update(&mut self, _now_ms: f64) -> Self::Event {
        self.vel *= SPARK_FRICTION;
        self.vel.y += SPARK_GRAVITY;
        self.vel = finite_or_zero(self.vel);
        self.pos += self.vel;
        self.alpha -= SPARK_FADE;
    }

    fn draw(&self, raster: &mut dyn Raster) {
        if self.alpha <= 0.0 {
            return;
        }
        raster.fill_circle(self.pos, self.radius, self.color, self.alpha.min(1.0));
    }

    fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}
