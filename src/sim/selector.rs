//! Weather condition code to effect mapping. Codes follow the
//! OpenWeatherMap condition id table.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    domain::season::Season,
    sim::{
        effects::{EffectConfig, EffectKind},
        math::Intensity,
    },
};

/// Picks the effect for a condition code, or `None` for codes outside
/// every known band.
#[must_use]
pub fn effect_for_code(code: u16, season: Season) -> Option<EffectConfig> {
    let config = match code {
        200..=232 => thunderstorm(Intensity::MODERATE, Intensity::MODERATE),
        300..=321 => EffectConfig::new(EffectKind::Rain, Intensity::LIGHT),
        500..=531 => EffectConfig::new(EffectKind::Rain, Intensity::MODERATE),
        600..=622 => EffectConfig::new(EffectKind::Snow, snow_intensity(code)),
        701..=781 => EffectConfig::new(EffectKind::Fog, Intensity::LIGHT),
        800 => EffectConfig::new(EffectKind::Clear, Intensity::MODERATE),
        801..=804 => EffectConfig::new(EffectKind::Clouds, Intensity::MODERATE),
        900..=906 | 958..=962 => thunderstorm(Intensity::HEAVY, Intensity::HEAVY),
        951..=957 => EffectConfig::new(EffectKind::Wind { season }, Intensity::MODERATE),
        _ => return None,
    };
    Some(config)
}

fn snow_intensity(code: u16) -> Intensity {
    match code {
        602 | 622 => Intensity::HEAVY,
        600 | 612 | 615 | 620 => Intensity::LIGHT,
        _ => Intensity::MODERATE,
    }
}

fn thunderstorm(rain: Intensity, lightning: Intensity) -> EffectConfig {
    EffectConfig::new(EffectKind::Thunderstorm { lightning }, rain)
}

/// Fixed weather used instead of the live report, for trying effects out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum TestPreset {
    Thunderstorm,
    Rain,
    LightRain,
    HeavyStorm,
    Snow,
    Fog,
    Clear,
    Clouds,
    Extreme,
    Wind,
}

impl TestPreset {
    pub const ALL: [Self; 10] = [
        Self::Thunderstorm,
        Self::Rain,
        Self::LightRain,
        Self::HeavyStorm,
        Self::Snow,
        Self::Fog,
        Self::Clear,
        Self::Clouds,
        Self::Extreme,
        Self::Wind,
    ];

    #[must_use]
    pub fn config(self, season: Season) -> EffectConfig {
        match self {
            Self::Thunderstorm => thunderstorm(Intensity::MODERATE, Intensity::MODERATE),
            Self::Rain => EffectConfig::new(EffectKind::Rain, Intensity::MODERATE),
            Self::LightRain => EffectConfig::new(EffectKind::Rain, Intensity::LIGHT),
            Self::HeavyStorm | Self::Extreme => thunderstorm(Intensity::HEAVY, Intensity::HEAVY),
            Self::Snow => EffectConfig::new(EffectKind::Snow, Intensity::LIGHT),
            Self::Fog => EffectConfig::new(EffectKind::Fog, Intensity::LIGHT),
            Self::Clear => EffectConfig::new(EffectKind::Clear, Intensity::MODERATE),
            Self::Clouds => EffectConfig::new(EffectKind::Clouds, Intensity::MODERATE),
            Self::Wind => EffectConfig::new(EffectKind::Wind { season }, Intensity::MODERATE),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Rain => "Rain",
            Self::LightRain => "Light rain",
            Self::HeavyStorm => "Heavy storm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Extreme => "Extreme",
            Self::Wind => "Wind",
        }
    }

    /// Next preset in the cycle; `None` returns to live weather after the last.
    #[must_use]
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::ALL[0]),
            Some(preset) => {
                let idx = Self::ALL.iter().position(|p| *p == preset).unwrap_or(0);
                Self::ALL.get(idx + 1).copied()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(code: u16) -> Option<&'static str> {
        effect_for_code(code, Season::Summer).map(|c| c.kind.label())
    }

    #[test]
    fn condition_bands_map_to_effects() {
        let table: Vec<(u16, Option<&str>)> = [200, 311, 502, 601, 741, 800, 803, 901, 955, 100, 999]
            .into_iter()
            .map(|code| (code, kind(code)))
            .collect();
        insta::assert_debug_snapshot!(table, @r#"
        [
            (
                200,
                Some(
                    "thunderstorm",
                ),
            ),
            (
                311,
                Some(
                    "rain",
                ),
            ),
            (
                502,
                Some(
                    "rain",
                ),
            ),
            (
                601,
                Some(
                    "snow",
                ),
            ),
            (
                741,
                Some(
                    "fog",
                ),
            ),
            (
                800,
                Some(
                    "clear",
                ),
            ),
            (
                803,
                Some(
                    "clouds",
                ),
            ),
            (
                901,
                Some(
                    "thunderstorm",
                ),
            ),
            (
                955,
                Some(
                    "wind",
                ),
            ),
            (
                100,
                None,
            ),
            (
                999,
                None,
            ),
        ]
        "#);
    }

    #[test]
    fn drizzle_is_lighter_than_rain() {
        let drizzle = effect_for_code(301, Season::Spring).expect("drizzle maps");
        let rain = effect_for_code(501, Season::Spring).expect("rain maps");
        assert!(drizzle.intensity < rain.intensity);
    }

    #[test]
    fn snow_intensity_follows_sub_code() {
        let light = effect_for_code(600, Season::Winter).expect("snow");
        let moderate = effect_for_code(601, Season::Winter).expect("snow");
        let heavy = effect_for_code(602, Season::Winter).expect("snow");
        assert_eq!(light.intensity, Intensity::LIGHT);
        assert_eq!(moderate.intensity, Intensity::MODERATE);
        assert_eq!(heavy.intensity, Intensity::HEAVY);
    }

    #[test]
    fn extreme_codes_are_the_heaviest_storm() {
        for code in [900, 906, 958, 962] {
            let config = effect_for_code(code, Season::Fall).expect("extreme");
            assert_eq!(config.intensity, Intensity::HEAVY);
            assert_eq!(
                config.kind,
                EffectKind::Thunderstorm {
                    lightning: Intensity::HEAVY
                }
            );
        }
    }

    #[test]
    fn wind_carries_the_season() {
        let config = effect_for_code(951, Season::Winter).expect("wind");
        assert_eq!(
            config.kind,
            EffectKind::Wind {
                season: Season::Winter
            }
        );
    }

    #[test]
    fn gaps_between_bands_select_nothing() {
        for code in [0, 199, 233, 299, 322, 499, 532, 599, 623, 700, 782, 799, 805, 907, 950, 963] {
            assert!(effect_for_code(code, Season::Summer).is_none(), "{code}");
        }
    }

    #[test]
    fn preset_cycle_ends_on_live_weather() {
        let mut current = None;
        for _ in 0..TestPreset::ALL.len() {
            current = TestPreset::cycle(current);
            assert!(current.is_some());
        }
        assert_eq!(TestPreset::cycle(current), None);
    }
}
