//! Effect simulators. Each owns its particles and applies spawn, advance
//! and cull policy; [`WeatherLayer`] owns the active one for the frame loop.

pub mod clear;
pub mod clouds;
pub mod fog;
pub mod lightning;
pub mod rain;
pub mod snow;
pub mod thunderstorm;
pub mod wind;

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub use clear::ClearEffect;
pub use clouds::CloudsEffect;
pub use fog::FogEffect;
pub use lightning::{LightningEffect, StormPhase};
pub use rain::RainEffect;
pub use snow::{SnowEffect, SnowPile};
pub use thunderstorm::ThunderstormEffect;
pub use wind::WindEffect;

use crate::{
    domain::season::Season,
    sim::{
        draw::DrawList,
        math::{Intensity, Viewport},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    Rain,
    Snow,
    Wind { season: Season },
    Fog,
    Clear,
    Clouds,
    /// `intensity` on the config drives the rain half.
    Thunderstorm { lightning: Intensity },
}

impl EffectKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Wind { .. } => "wind",
            Self::Fog => "fog",
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Thunderstorm { .. } => "thunderstorm",
        }
    }
}

/// Which simulator to run, and how hard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub kind: EffectKind,
    pub intensity: Intensity,
}

impl EffectConfig {
    #[must_use]
    pub fn new(kind: EffectKind, intensity: Intensity) -> Self {
        Self { kind, intensity }
    }
}

#[derive(Debug, Clone)]
pub enum Effect {
    Rain(RainEffect),
    Snow(SnowEffect),
    Wind(WindEffect),
    Fog(FogEffect),
    Clear(ClearEffect),
    Clouds(CloudsEffect),
    Thunderstorm(ThunderstormEffect),
}

impl Effect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: EffectConfig, viewport: Viewport) -> Self {
        let intensity = config.intensity;
        match config.kind {
            EffectKind::Rain => Self::Rain(RainEffect::new(rng, viewport, intensity)),
            EffectKind::Snow => Self::Snow(SnowEffect::new(rng, viewport, intensity)),
            EffectKind::Wind { season } => {
                Self::Wind(WindEffect::new(rng, viewport, intensity, season))
            }
            EffectKind::Fog => Self::Fog(FogEffect::new(rng, viewport, intensity)),
            EffectKind::Clear => Self::Clear(ClearEffect::new()),
            EffectKind::Clouds => Self::Clouds(CloudsEffect::new(rng, viewport)),
            EffectKind::Thunderstorm { lightning } => Self::Thunderstorm(
                ThunderstormEffect::new(rng, viewport, intensity, lightning),
            ),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        match self {
            Self::Rain(effect) => effect.tick(rng, dt, viewport),
            Self::Snow(effect) => effect.tick(rng, dt, viewport),
            Self::Wind(effect) => effect.tick(rng, dt, viewport),
            Self::Fog(effect) => effect.tick(dt, viewport),
            Self::Clear(effect) => effect.tick(dt),
            Self::Clouds(effect) => effect.tick(dt, viewport),
            Self::Thunderstorm(effect) => effect.tick(rng, dt, viewport),
        }
    }

    pub fn draw(&self, list: &mut DrawList, viewport: Viewport) {
        match self {
            Self::Rain(effect) => effect.draw(list),
            Self::Snow(effect) => effect.draw(list, viewport),
            Self::Wind(effect) => effect.draw(list),
            Self::Fog(effect) => effect.draw(list),
            Self::Clear(effect) => effect.draw(list, viewport),
            Self::Clouds(effect) => effect.draw(list),
            Self::Thunderstorm(effect) => effect.draw(list, viewport),
        }
    }
}

/// The live weather overlay: at most one effect, rebuilt whenever its
/// configuration or the viewport changes.
#[derive(Debug)]
pub struct WeatherLayer {
    rng: StdRng,
    config: Option<EffectConfig>,
    viewport: Viewport,
    effect: Option<Effect>,
}

impl WeatherLayer {
    /// A fixed seed makes every particle reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            rng,
            config: None,
            viewport: Viewport::default(),
            effect: None,
        }
    }

    pub fn configure(&mut self, config: Option<EffectConfig>) {
        if config == self.config {
            return;
        }
        tracing::debug!(
            from = self.config.map(|c| c.kind.label()),
            to = config.map(|c| c.kind.label()),
            "weather effect changed"
        );
        self.config = config;
        self.rebuild();
    }

    pub fn tick(&mut self, dt: Duration, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.rebuild();
        }
        if let Some(effect) = self.effect.as_mut() {
            effect.tick(&mut self.rng, dt.as_secs_f32(), viewport);
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        if let Some(effect) = &self.effect {
            effect.draw(list, self.viewport);
        }
    }

    fn rebuild(&mut self) {
        self.effect = match self.config {
            Some(config) if !self.viewport.is_empty() => {
                Some(Effect::new(&mut self.rng, config, self.viewport))
            }
            _ => None,
        };
    }

    #[must_use]
    pub fn config(&self) -> Option<EffectConfig> {
        self.config
    }

    #[must_use]
    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 320.0,
        height: 240.0,
    };

    #[test]
    fn unconfigured_layer_draws_nothing() {
        let mut layer = WeatherLayer::new(Some(1));
        layer.tick(Duration::from_millis(16), VIEWPORT);
        let mut list = DrawList::new();
        layer.draw(&mut list);
        assert!(list.is_empty());
        assert!(layer.effect().is_none());
    }

    #[test]
    fn configuring_builds_the_matching_simulator() {
        let mut layer = WeatherLayer::new(Some(2));
        layer.tick(Duration::ZERO, VIEWPORT);
        layer.configure(Some(EffectConfig::new(EffectKind::Snow, Intensity::LIGHT)));
        assert!(matches!(layer.effect(), Some(Effect::Snow(_))));

        layer.configure(None);
        assert!(layer.effect().is_none());
    }

    #[test]
    fn same_config_keeps_the_running_simulation() {
        let mut layer = WeatherLayer::new(Some(3));
        let config = EffectConfig::new(EffectKind::Snow, Intensity::HEAVY);
        layer.configure(Some(config));
        for _ in 0..120 {
            layer.tick(Duration::from_millis(50), VIEWPORT);
        }
        let piled = match layer.effect() {
            Some(Effect::Snow(snow)) => snow.pile().total(),
            other => panic!("expected snow, got {other:?}"),
        };
        assert!(piled > 0.0);

        layer.configure(Some(config));
        let after = match layer.effect() {
            Some(Effect::Snow(snow)) => snow.pile().total(),
            other => panic!("expected snow, got {other:?}"),
        };
        assert!((after - piled).abs() < f32::EPSILON);
    }

    #[test]
    fn resizing_rebuilds_against_the_new_bounds() {
        let mut layer = WeatherLayer::new(Some(4));
        layer.configure(Some(EffectConfig::new(EffectKind::Rain, Intensity::MODERATE)));
        layer.tick(Duration::from_millis(16), VIEWPORT);
        let wide = Viewport::new(1280.0, 240.0);
        layer.tick(Duration::ZERO, wide);
        assert_eq!(layer.viewport(), wide);
        let Some(Effect::Rain(rain)) = layer.effect() else {
            panic!("expected rain");
        };
        assert!(rain.drops().iter().all(|d| d.x <= wide.width));
    }

    #[test]
    fn every_kind_draws_without_panicking() {
        let kinds = [
            EffectKind::Rain,
            EffectKind::Snow,
            EffectKind::Wind {
                season: Season::Winter,
            },
            EffectKind::Wind {
                season: Season::Spring,
            },
            EffectKind::Fog,
            EffectKind::Clear,
            EffectKind::Clouds,
            EffectKind::Thunderstorm {
                lightning: Intensity::HEAVY,
            },
        ];
        for kind in kinds {
            let mut layer = WeatherLayer::new(Some(5));
            layer.configure(Some(EffectConfig::new(kind, Intensity::MODERATE)));
            for _ in 0..30 {
                layer.tick(Duration::from_millis(33), VIEWPORT);
            }
            let mut list = DrawList::new();
            layer.draw(&mut list);
            assert!(!list.is_empty(), "{kind:?} drew nothing");
        }
    }
}
