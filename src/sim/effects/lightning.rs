use std::ops::RangeInclusive;

use rand::Rng;

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::{Intensity, Viewport},
    particles::{LightningStrike, Step},
};

pub const FLASH_ON: f32 = 0.06;
pub const FLASH_OFF: f32 = 0.08;

/// Where the storm is in its strike cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StormPhase {
    Idle { wait: f32 },
    Flash { flickers_left: usize, lit: bool, timer: f32 },
    Fade,
}

#[derive(Debug, Clone)]
pub struct LightningEffect {
    intensity: Intensity,
    phase: StormPhase,
    strikes: Vec<LightningStrike>,
}

impl LightningEffect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, intensity: Intensity) -> Self {
        Self {
            intensity,
            phase: StormPhase::Idle {
                wait: sample_delay(rng, intensity),
            },
            strikes: Vec::new(),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        self.phase = match self.phase {
            StormPhase::Idle { wait } => {
                let wait = wait - dt;
                if wait > 0.0 {
                    StormPhase::Idle { wait }
                } else {
                    let flickers = rng.random_range(flicker_range(self.intensity));
                    tracing::trace!(flickers, "lightning strike");
                    self.regenerate(rng, viewport);
                    StormPhase::Flash {
                        flickers_left: flickers,
                        lit: true,
                        timer: FLASH_ON,
                    }
                }
            }
            StormPhase::Flash {
                flickers_left,
                lit,
                timer,
            } => {
                let timer = timer - dt;
                if timer > 0.0 {
                    StormPhase::Flash {
                        flickers_left,
                        lit,
                        timer,
                    }
                } else if lit {
                    StormPhase::Flash {
                        flickers_left: flickers_left.saturating_sub(1),
                        lit: false,
                        timer: FLASH_OFF,
                    }
                } else if flickers_left == 0 {
                    StormPhase::Fade
                } else {
                    self.regenerate(rng, viewport);
                    StormPhase::Flash {
                        flickers_left,
                        lit: true,
                        timer: FLASH_ON,
                    }
                }
            }
            StormPhase::Fade => {
                self.strikes.retain_mut(|strike| strike.fade(dt) == Step::Alive);
                if self.strikes.is_empty() {
                    StormPhase::Idle {
                        wait: sample_delay(rng, self.intensity),
                    }
                } else {
                    StormPhase::Fade
                }
            }
        };
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport) {
        let count = rng.random_range(bolt_range(self.intensity));
        self.strikes = (0..count)
            .map(|_| LightningStrike::random(rng, viewport))
            .collect();
    }

    /// Alpha of the full-screen white flash this frame.
    #[must_use]
    pub fn screen_alpha(&self) -> f32 {
        match self.phase {
            StormPhase::Flash { lit: true, .. } => self.intensity.lerp(0.2, 1.0),
            _ => 0.0,
        }
    }

    pub fn draw(&self, list: &mut DrawList, viewport: Viewport) {
        list.push(Shape::Rect {
            origin: Point::new(0.0, 0.0),
            width: viewport.width,
            height: viewport.height,
            color: Rgba::WHITE.with_alpha(self.screen_alpha()),
        });
        for strike in &self.strikes {
            list.push(Shape::Polyline {
                points: strike.segments.clone(),
                width: strike.stroke_width,
                color: strike.color.with_alpha(strike.alpha),
            });
        }
    }

    #[must_use]
    pub fn phase(&self) -> StormPhase {
        self.phase
    }

    #[must_use]
    pub fn strikes(&self) -> &[LightningStrike] {
        &self.strikes
    }

    #[must_use]
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }
}

/// Seconds between strikes: `[base, 2·base)` where heavier storms shrink `base`.
#[must_use]
pub fn delay_range(intensity: Intensity) -> (f32, f32) {
    let base = intensity.lerp(6.0, 1.5);
    (base, base * 2.0)
}

#[must_use]
pub fn bolt_range(intensity: Intensity) -> RangeInclusive<usize> {
    intensity.lerp_count(1, 2)..=intensity.lerp_count(2, 5)
}

#[must_use]
pub fn flicker_range(intensity: Intensity) -> RangeInclusive<usize> {
    intensity.lerp_count(1, 3)..=intensity.lerp_count(2, 5)
}

fn sample_delay<R: Rng + ?Sized>(rng: &mut R, intensity: Intensity) -> f32 {
    let (low, high) = delay_range(intensity);
    low + rng.random::<f32>() * (high - low)
}
