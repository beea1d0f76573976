use std::f32::consts::{PI, TAU};

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::Viewport,
};

/// Radians per second; one sweep takes twenty seconds.
const SHIMMER_SPEED: f32 = PI / 10.0;
const SHIMMER_ALPHA: f32 = 0.06;
const SUNLIGHT: u32 = 0xFFFCE5;

/// Slow sunlight glow wandering across a clear sky.
#[derive(Debug, Clone, Default)]
pub struct ClearEffect {
    phase: f32,
}

impl ClearEffect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f32) {
        self.phase = (self.phase + dt * SHIMMER_SPEED).rem_euclid(TAU);
    }

    #[must_use]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[must_use]
    pub fn glow_center(&self, viewport: Viewport) -> Point {
        Point::new(
            viewport.width * (0.5 + 0.4 * self.phase.cos()),
            viewport.height * (0.4 + 0.1 * (self.phase / 2.0).sin()),
        )
    }

    pub fn draw(&self, list: &mut DrawList, viewport: Viewport) {
        list.push(Shape::Glow {
            center: self.glow_center(viewport),
            radius: viewport.width * 0.7,
            color: Rgba::from_hex(SUNLIGHT).with_alpha(SHIMMER_ALPHA),
        });
    }
}
