use rand::Rng;

use super::{lightning::LightningEffect, rain::RainEffect};
use crate::sim::{
    draw::DrawList,
    math::{Intensity, Viewport},
};

/// Rain with lightning on top; each half keeps its own intensity.
#[derive(Debug, Clone)]
pub struct ThunderstormEffect {
    rain: RainEffect,
    lightning: LightningEffect,
}

impl ThunderstormEffect {
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        rain: Intensity,
        lightning: Intensity,
    ) -> Self {
        Self {
            rain: RainEffect::new(rng, viewport, rain),
            lightning: LightningEffect::new(rng, lightning),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        self.rain.tick(rng, dt, viewport);
        self.lightning.tick(rng, dt, viewport);
    }

    pub fn draw(&self, list: &mut DrawList, viewport: Viewport) {
        self.rain.draw(list);
        self.lightning.draw(list, viewport);
    }

    #[must_use]
    pub fn rain(&self) -> &RainEffect {
        &self.rain
    }

    #[must_use]
    pub fn lightning(&self) -> &LightningEffect {
        &self.lightning
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::sim::effects::rain::drop_count;

    #[test]
    fn halves_are_parameterized_independently() {
        let mut rng = StdRng::seed_from_u64(40);
        let storm = ThunderstormEffect::new(
            &mut rng,
            Viewport::new(200.0, 200.0),
            Intensity::LIGHT,
            Intensity::HEAVY,
        );
        assert_eq!(storm.rain().drops().len(), drop_count(Intensity::LIGHT));
        assert_eq!(storm.lightning().intensity(), Intensity::HEAVY);
    }
}
