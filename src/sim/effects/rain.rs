use rand::Rng;

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::{Intensity, Viewport},
    particles::{Raindrop, Splash, Step},
};

const DROP_ALPHA: f32 = 0.3;
const SPLASH_ALPHA: f32 = 0.7;
const SPLASH_STROKE: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct RainEffect {
    intensity: Intensity,
    drops: Vec<Raindrop>,
    splashes: Vec<Splash>,
}

impl RainEffect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        let count = drop_count(intensity);
        Self {
            intensity,
            drops: (0..count)
                .map(|_| Raindrop::random(rng, viewport, intensity))
                .collect(),
            splashes: Vec::new(),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        for drop in &mut self.drops {
            if drop.advance(dt, viewport) == Step::Exited {
                self.splashes.push(Splash::spawn(rng, drop.x, viewport));
                drop.respawn(rng, viewport);
            }
        }
        self.splashes
            .retain_mut(|splash| splash.advance(dt) == Step::Alive);
    }

    pub fn draw(&self, list: &mut DrawList) {
        let drop_color = Rgba::WHITE.with_alpha(DROP_ALPHA);
        for drop in &self.drops {
            list.push(Shape::Line {
                from: Point::new(drop.x, drop.y),
                to: Point::new(drop.x, drop.y + drop.length),
                width: drop.width,
                color: drop_color,
            });
        }
        for splash in &self.splashes {
            list.push(Shape::Ring {
                center: Point::new(splash.x, splash.y),
                radius: splash.radius,
                width: SPLASH_STROKE,
                color: Rgba::WHITE.with_alpha(splash.alpha * SPLASH_ALPHA),
            });
        }
    }

    #[must_use]
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    #[must_use]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    #[must_use]
    pub fn splashes(&self) -> &[Splash] {
        &self.splashes
    }
}

#[must_use]
pub fn drop_count(intensity: Intensity) -> usize {
    intensity.lerp_count(75, 250)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn drop_count_follows_intensity() {
        assert_eq!(drop_count(Intensity::LIGHT), 75);
        assert_eq!(drop_count(Intensity::HEAVY), 250);
    }

    #[test]
    fn exiting_drops_leave_splashes_behind() {
        let mut rng = StdRng::seed_from_u64(20);
        let viewport = Viewport::new(400.0, 300.0);
        let mut rain = RainEffect::new(&mut rng, viewport, Intensity::HEAVY);
        rain.tick(&mut rng, 0.1, viewport);
        assert!(!rain.splashes().is_empty());
        for splash in rain.splashes() {
            assert!(splash.alpha > 0.0);
        }
        for drop in rain.drops() {
            assert!(drop.y <= viewport.height);
        }
    }

    #[test]
    fn splashes_disappear_once_faded() {
        let mut rng = StdRng::seed_from_u64(21);
        let viewport = Viewport::new(400.0, 300.0);
        let mut rain = RainEffect::new(&mut rng, viewport, Intensity::LIGHT);
        rain.splashes.push(Splash::spawn(&mut rng, 10.0, viewport));
        rain.drops.clear();
        for _ in 0..10 {
            rain.tick(&mut rng, 0.1, viewport);
        }
        assert!(rain.splashes().is_empty());
    }
}
