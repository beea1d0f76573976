use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::sim::math::Viewport;

/// Image scaling policy, applied before any transition transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
pub enum FitMode {
    /// Whole image visible, letterboxed.
    Fit,
    /// Viewport covered, overflow cropped.
    #[default]
    Crop,
    /// Stretched to the viewport on both axes.
    FillBounds,
    /// Like `Fit`, but never enlarged.
    Inside,
    /// Native size, centred.
    None,
}

impl FitMode {
    pub const ALL: [Self; 5] = [
        Self::Fit,
        Self::Crop,
        Self::FillBounds,
        Self::Inside,
        Self::None,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fit => "Fit",
            Self::Crop => "Crop",
            Self::FillBounds => "Fill",
            Self::Inside => "Inside",
            Self::None => "None",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Where an image of the given size lands inside the viewport.
    #[must_use]
    pub fn place(self, image_width: f32, image_height: f32, viewport: Viewport) -> Placement {
        if image_width <= 0.0 || image_height <= 0.0 || viewport.is_empty() {
            return Placement::default();
        }
        let fit_x = viewport.width / image_width;
        let fit_y = viewport.height / image_height;
        let (scale_x, scale_y) = match self {
            Self::Fit => uniform(fit_x.min(fit_y)),
            Self::Crop => uniform(fit_x.max(fit_y)),
            Self::FillBounds => (fit_x, fit_y),
            Self::Inside => uniform(fit_x.min(fit_y).min(1.0)),
            Self::None => uniform(1.0),
        };
        let width = image_width * scale_x;
        let height = image_height * scale_y;
        Placement {
            x: (viewport.width - width) / 2.0,
            y: (viewport.height - height) / 2.0,
            width,
            height,
        }
    }
}

fn uniform(scale: f32) -> (f32, f32) {
    (scale, scale)
}

/// Destination rectangle of a fitted image, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Maps a viewport point to normalized image coordinates, if it hits.
    #[must_use]
    pub fn to_image(self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let u = (x - self.x) / self.width;
        let v = (y - self.y) / self.height;
        ((0.0..1.0).contains(&u) && (0.0..1.0).contains(&v)).then_some((u, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn fit_letterboxes_wide_images() {
        let p = FitMode::Fit.place(200.0, 100.0, Viewport::new(100.0, 100.0));
        assert!(approx(p.width, 100.0));
        assert!(approx(p.height, 50.0));
        assert!(approx(p.y, 25.0));
    }

    #[test]
    fn crop_covers_the_viewport() {
        let p = FitMode::Crop.place(200.0, 100.0, Viewport::new(100.0, 100.0));
        assert!(approx(p.width, 200.0));
        assert!(approx(p.height, 100.0));
        assert!(approx(p.x, -50.0));
    }

    #[test]
    fn fill_bounds_stretches_both_axes() {
        let p = FitMode::FillBounds.place(10.0, 40.0, Viewport::new(100.0, 80.0));
        assert!(approx(p.width, 100.0));
        assert!(approx(p.height, 80.0));
    }

    #[test]
    fn inside_never_upscales() {
        let p = FitMode::Inside.place(20.0, 10.0, Viewport::new(100.0, 100.0));
        assert!(approx(p.width, 20.0));
        assert!(approx(p.x, 40.0));
    }

    #[test]
    fn none_keeps_native_size_centred() {
        let p = FitMode::None.place(300.0, 300.0, Viewport::new(100.0, 100.0));
        assert!(approx(p.width, 300.0));
        assert!(approx(p.x, -100.0));
    }

    #[test]
    fn to_image_misses_outside_placement() {
        let p = FitMode::Fit.place(200.0, 100.0, Viewport::new(100.0, 100.0));
        assert!(p.to_image(50.0, 10.0).is_none());
        let (u, v) = p.to_image(50.0, 50.0).expect("centre hits");
        assert!(approx(u, 0.5));
        assert!(approx(v, 0.5));
    }

    #[test]
    fn cycling_visits_every_mode() {
        let mut mode = FitMode::Fit;
        for _ in 0..FitMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, FitMode::Fit);
    }
}
