use rand::Rng;

use super::{Step, unit};
use crate::sim::math::{Intensity, Viewport};

const SPLASH_GROWTH: f32 = 140.0;
const SPLASH_FADE: f32 = 2.5;
const SPLASH_SPREAD: f32 = 30.0;
const SPLASH_LIFT: f32 = 30.0;
/// Splashes start this far above the bottom edge.
const SPLASH_INSET: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub length: f32,
    pub width: f32,
}

impl Raindrop {
    /// A drop anywhere in the viewport.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            speed: intensity.lerp(600.0, 1800.0),
            length: intensity.lerp(10.0, 60.0),
            width: intensity.lerp(0.5, 4.5),
        }
    }

    /// Re-enters just above the top edge at a new column.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport) {
        self.x = unit(rng) * viewport.width;
        self.y = -self.length;
    }

    pub fn advance(&mut self, dt: f32, viewport: Viewport) -> Step {
        self.y += self.speed * dt;
        if self.y > viewport.height {
            Step::Exited
        } else {
            Step::Alive
        }
    }
}

/// Ring thrown up where a drop hit the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Splash {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub alpha: f32,
}

impl Splash {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, x: f32, viewport: Viewport) -> Self {
        Self {
            x,
            y: viewport.height - SPLASH_INSET,
            vx: unit(rng) * 2.0 * SPLASH_SPREAD - SPLASH_SPREAD,
            vy: -unit(rng) * SPLASH_LIFT,
            radius: 0.0,
            alpha: 1.0,
        }
    }

    pub fn advance(&mut self, dt: f32) -> Step {
        self.radius += SPLASH_GROWTH * dt;
        self.alpha -= SPLASH_FADE * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        if self.alpha <= 0.0 {
            self.alpha = 0.0;
            Step::Faded
        } else {
            Step::Alive
        }
    }
}
