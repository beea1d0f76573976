use std::f32::consts::FRAC_PI_6;

use rand::Rng;

use super::{Step, unit};
use crate::sim::{
    draw::{Point, Rgba},
    math::Viewport,
};

pub const BOLT_SEGMENTS: usize = 8;
pub const BOLT_SEGMENT_LENGTH: f32 = 80.0;
/// Alpha lost per second once the flicker sequence is over.
const FADE_PER_SECOND: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LightningStrike {
    pub segments: Vec<Point>,
    pub stroke_width: f32,
    pub alpha: f32,
    pub color: Rgba,
}

impl LightningStrike {
    /// A new bolt starting at a random column on the top edge.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let start_x = unit(rng) * viewport.width;
        let segments = bolt_path(rng, start_x, BOLT_SEGMENTS, BOLT_SEGMENT_LENGTH);
        let stroke_width = unit(rng) * 2.0 + 1.5;
        let color = Rgba {
            r: channel(0.9 + unit(rng) * 0.1),
            g: channel(0.9 + unit(rng) * 0.05),
            b: 255,
            a: 1.0,
        };
        Self {
            segments,
            stroke_width,
            alpha: 1.0,
            color,
        }
    }

    pub fn fade(&mut self, dt: f32) -> Step {
        self.alpha = (self.alpha - FADE_PER_SECOND * dt).max(0.0);
        if self.alpha <= 0.0 {
            Step::Faded
        } else {
            Step::Alive
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Builds a jagged polyline downward from `(start_x, 0)`. Every segment
/// deviates at most 30 degrees from vertical and is between half and one
/// and a half nominal lengths long.
pub fn bolt_path<R: Rng + ?Sized>(
    rng: &mut R,
    start_x: f32,
    segment_count: usize,
    segment_length: f32,
) -> Vec<Point> {
    let mut path = Vec::with_capacity(segment_count + 1);
    let mut current = Point::new(start_x, 0.0);
    path.push(current);
    for _ in 0..segment_count {
        let angle = unit(rng) * 2.0 * FRAC_PI_6 - FRAC_PI_6;
        let length = segment_length * (0.5 + unit(rng));
        current = Point::new(
            current.x + angle.sin() * length,
            current.y + angle.cos() * length,
        );
        path.push(current);
    }
    path
}
