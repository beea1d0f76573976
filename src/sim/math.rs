use serde::{Deserialize, Serialize};

/// Linear interpolation with the fraction clamped to `[0, 1]`.
#[must_use]
pub fn lerp(start: f32, end: f32, fraction: f32) -> f32 {
    let t = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    start + (end - start) * t
}

#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_count(start: usize, end: usize, fraction: f32) -> usize {
    lerp(start as f32, end as f32, fraction).round().max(0.0) as usize
}

/// Effect strength from "light" (1.0) to "heavy" (3.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Intensity(f32);

impl Intensity {
    pub const LIGHT: Self = Self(1.0);
    pub const MODERATE: Self = Self(2.0);
    pub const HEAVY: Self = Self(3.0);

    /// Clamps into `[1, 3]`; NaN falls back to light.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::LIGHT;
        }
        Self(value.clamp(1.0, 3.0))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Position inside the light..heavy band, in `[0, 1]`.
    #[must_use]
    pub fn factor(self) -> f32 {
        (self.0 - 1.0) / 2.0
    }

    #[must_use]
    pub fn lerp(self, min: f32, max: f32) -> f32 {
        lerp(min, max, self.factor())
    }

    #[must_use]
    pub fn lerp_count(self, min: usize, max: usize) -> usize {
        lerp_count(min, max, self.factor())
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::MODERATE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[must_use]
    pub fn center(self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
