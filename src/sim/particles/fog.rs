use rand::Rng;

use super::{Step, random_sign, unit};
use crate::sim::math::{Intensity, Viewport, lerp};

/// Fog banks hang over the upper part of the frame.
const BAND_FRACTION: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct FogBand {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// 0 = far, 1 = near.
    pub depth: f32,
}

impl FogBand {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        let depth = unit(rng);
        let direction = random_sign(rng);
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height * BAND_FRACTION,
            speed: intensity.lerp(5.0, 30.0) * lerp(0.4, 1.0, depth) * direction,
            width: intensity.lerp(300.0, 900.0) * lerp(0.6, 1.3, depth),
            height: intensity.lerp(80.0, 200.0) * lerp(0.7, 1.2, depth),
            depth,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        lerp(0.08, 0.25, self.depth)
    }

    pub fn advance(&mut self, dt: f32, viewport: Viewport) -> Step {
        let x = self.x + self.speed * dt;
        self.x = if x > viewport.width + self.width {
            -self.width
        } else if x + self.width < 0.0 {
            viewport.width
        } else {
            x
        };
        Step::Alive
    }
}
