use rand::{Rng, seq::IndexedRandom};

use super::{Step, random_phase, unit};
use crate::{
    domain::season::Season,
    sim::{
        draw::Rgba,
        math::{Intensity, Viewport},
    },
};

const WOBBLE_AMPLITUDE: f32 = 5.0;
const WOBBLE_WAVELENGTH: f32 = 50.0;

const SPRING_LEAVES: &[u32] = &[0x81C784, 0xAED581, 0xF48FB1];
const SUMMER_LEAVES: &[u32] = &[0x4CAF50, 0x81C784];
const FALL_LEAVES: &[u32] = &[0xE57373, 0xFFB74D, 0xFFF176];

#[must_use]
pub fn leaf_palette(season: Season) -> &'static [u32] {
    match season {
        Season::Spring => SPRING_LEAVES,
        Season::Summer => SUMMER_LEAVES,
        Season::Fall => FALL_LEAVES,
        Season::Winter => &[],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafParticle {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub drift: f32,
    pub size: f32,
    pub rotation: f32,
    pub spin: f32,
    pub color: Rgba,
}

impl LeafParticle {
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
        season: Season,
    ) -> Self {
        let color = leaf_palette(season)
            .choose(rng)
            .map_or(Rgba::TRANSPARENT, |hex| Rgba::from_hex(*hex));
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            speed: intensity.lerp(60.0, 180.0),
            drift: intensity.lerp(-30.0, 30.0),
            size: intensity.lerp(8.0, 20.0),
            rotation: unit(rng) * 360.0,
            spin: intensity.lerp(-90.0, 90.0),
            color,
        }
    }

    pub fn respawn_left<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
        season: Season,
    ) -> Self {
        let mut leaf = Self::random(rng, viewport, intensity, season);
        leaf.x = 0.0;
        leaf
    }

    pub fn advance(&mut self, dt: f32, viewport: Viewport) -> Step {
        self.x += self.speed * dt;
        self.y += self.drift * dt;
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(360.0);
        if self.x > viewport.width || self.y > viewport.height || self.y < -self.size {
            Step::Exited
        } else {
            Step::Alive
        }
    }
}

/// Horizontal streak with a gentle vertical wobble.
#[derive(Debug, Clone, PartialEq)]
pub struct WindLine {
    pub x: f32,
    pub base_y: f32,
    pub speed: f32,
    pub length: f32,
    pub thickness: f32,
    pub phase: f32,
}

impl WindLine {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        Self {
            x: unit(rng) * viewport.width,
            base_y: unit(rng) * viewport.height,
            speed: intensity.lerp(100.0, 300.0),
            length: intensity.lerp(30.0, 80.0),
            thickness: intensity.lerp(1.0, 3.0),
            phase: random_phase(rng),
        }
    }

    pub fn respawn_left<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
    ) -> Self {
        let mut line = Self::random(rng, viewport, intensity);
        line.x = 0.0;
        line
    }

    /// Current vertical position; the wobble depends only on `x`.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.base_y + (self.phase + self.x / WOBBLE_WAVELENGTH).sin() * WOBBLE_AMPLITUDE
    }

    pub fn advance(&mut self, dt: f32, viewport: Viewport) -> Step {
        self.x += self.speed * dt;
        if self.x > viewport.width {
            Step::Exited
        } else {
            Step::Alive
        }
    }
}
