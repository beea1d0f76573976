use rand::Rng;

use super::{Step, random_phase, unit};
use crate::sim::math::{Intensity, Viewport};

/// Horizontal slack before a wind-blown flake counts as gone.
const GUST_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub wind: f32,
    pub fall: f32,
    pub size: f32,
    pub rotation: f32,
    pub spin: f32,
    pub alpha: f32,
    pub drift_amplitude: f32,
    pub phase: f32,
}

impl Snowflake {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            wind: intensity.lerp(30.0, 100.0),
            fall: intensity.lerp(40.0, 120.0),
            size: intensity.lerp(6.0, 9.0),
            rotation: unit(rng) * 360.0,
            spin: intensity.lerp(-30.0, 30.0),
            alpha: intensity.lerp(0.3, 0.8),
            drift_amplitude: intensity.lerp(10.0, 30.0),
            phase: random_phase(rng),
        }
    }

    /// Fresh flake just above the top edge.
    pub fn respawn_top<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
    ) -> Self {
        let mut flake = Self::random(rng, viewport, intensity);
        flake.y = -flake.size;
        flake
    }

    /// Fresh flake entering from the left edge, for wind gusts.
    pub fn respawn_left<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
    ) -> Self {
        let mut flake = Self::random(rng, viewport, intensity);
        flake.x = 0.0;
        flake
    }

    /// Calm fall with sinusoidal sideways drift; stays inside the columns.
    /// Landing is decided by the owner against the snow pile.
    pub fn drift(&mut self, dt: f32, viewport: Viewport) {
        let sway = (self.y / 20.0 + self.phase).sin() * self.drift_amplitude;
        self.x = (self.x + sway * dt).clamp(0.0, viewport.width);
        self.y += self.fall * dt;
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(360.0);
    }

    /// Wind-driven flight used by the wind effect.
    pub fn gust(&mut self, dt: f32, viewport: Viewport) -> Step {
        self.x += self.wind * dt;
        self.y += self.fall * dt;
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(360.0);
        let off_side = self.x < -GUST_MARGIN || self.x > viewport.width + GUST_MARGIN;
        if self.y > viewport.height || off_side {
            Step::Exited
        } else {
            Step::Alive
        }
    }

    /// Sparkle alpha used when drawing falling snow.
    #[must_use]
    pub fn shimmer(&self) -> f32 {
        let sparkle = 0.6 + 0.4 * (self.y / 10.0 + self.phase).sin();
        let size_fade = 1.0 - (self.size / 10.0).clamp(0.0, 1.0);
        (sparkle * size_fade).clamp(0.0, 1.0)
    }
}
