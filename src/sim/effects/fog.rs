use rand::Rng;

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::{Intensity, Viewport},
    particles::FogBand,
};

#[derive(Debug, Clone)]
pub struct FogEffect {
    bands: Vec<FogBand>,
}

impl FogEffect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        Self {
            bands: (0..band_count(intensity))
                .map(|_| FogBand::random(rng, viewport, intensity))
                .collect(),
        }
    }

    pub fn tick(&mut self, dt: f32, viewport: Viewport) {
        for band in &mut self.bands {
            band.advance(dt, viewport);
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        for band in &self.bands {
            list.push(Shape::RoundedRect {
                origin: Point::new(band.x, band.y),
                width: band.width,
                height: band.height,
                corner: band.height / 2.0,
                color: Rgba::WHITE.with_alpha(band.alpha()),
            });
        }
    }

    #[must_use]
    pub fn bands(&self) -> &[FogBand] {
        &self.bands
    }
}

#[must_use]
pub fn band_count(intensity: Intensity) -> usize {
    intensity.lerp_count(4, 10)
}
