use rand::Rng;

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::Viewport,
    particles::Cloud,
};

pub const CLOUD_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct CloudsEffect {
    clouds: Vec<Cloud>,
}

impl CloudsEffect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            clouds: (0..CLOUD_COUNT)
                .map(|_| Cloud::random(rng, viewport))
                .collect(),
        }
    }

    pub fn tick(&mut self, dt: f32, viewport: Viewport) {
        for cloud in &mut self.clouds {
            cloud.advance(dt, viewport);
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        for cloud in &self.clouds {
            list.push(Shape::RoundedRect {
                origin: Point::new(cloud.x, cloud.y),
                width: cloud.width,
                height: cloud.height,
                corner: cloud.height / 2.0,
                color: Rgba::WHITE.with_alpha(cloud.alpha),
            });
        }
    }

    #[must_use]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}
