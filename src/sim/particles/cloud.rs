use rand::Rng;

use super::{Step, random_sign, unit};
use crate::sim::math::{Viewport, lerp};

/// Clouds stay in the upper part of the sky.
const SKY_FRACTION: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub alpha: f32,
}

impl Cloud {
    /// Depth drives parallax: near clouds are larger, faster and denser.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let depth = unit(rng);
        let direction = random_sign(rng);
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height * SKY_FRACTION,
            speed: lerp(4.0, 20.0, depth) * direction,
            width: lerp(150.0, 500.0, depth),
            height: lerp(40.0, 120.0, depth),
            alpha: lerp(0.1, 0.35, depth),
        }
    }

    /// Drifts and wraps around in the direction of travel.
    pub fn advance(&mut self, dt: f32, viewport: Viewport) -> Step {
        self.x += self.speed * dt;
        if self.speed > 0.0 && self.x > viewport.width + self.width {
            self.x = -self.width;
        } else if self.speed < 0.0 && self.x + self.width < 0.0 {
            self.x = viewport.width;
        }
        Step::Alive
    }
}
