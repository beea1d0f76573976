use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::resilience::freshness::Freshness;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Units {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            name: format!("{lat:.4}, {lon:.4}"),
            latitude: lat,
            longitude: lon,
        }
    }
}

/// Current conditions as reported by the weather service, always metric.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub condition_code: u16,
    pub condition: String,
    pub description: String,
    pub temperature_c: f32,
    pub location_name: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    #[must_use]
    pub fn temperature(&self, units: Units) -> i32 {
        round_temp(convert_temp(self.temperature_c, units))
    }

    /// `21°C · light rain · Lisbon`
    #[must_use]
    pub fn summary(&self, units: Units) -> String {
        let mut parts = vec![format!("{}{}", self.temperature(units), units.symbol())];
        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }
        if !self.location_name.is_empty() {
            parts.push(self.location_name.clone());
        }
        parts.join(" · ")
    }
}

#[must_use]
pub fn convert_temp(celsius: f32, units: Units) -> f32 {
    match units {
        Units::Celsius => celsius,
        Units::Fahrenheit => celsius * 1.8 + 32.0,
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_temp(value: f32) -> i32 {
    value.round() as i32
}

/// Bookkeeping for the refresh loop and the overlay's freshness badge.
#[derive(Debug, Clone, Default)]
pub struct RefreshMetadata {
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl RefreshMetadata {
    pub fn mark_attempt(&mut self, now: DateTime<Utc>) {
        self.last_attempt = Some(now);
    }

    pub fn mark_success(&mut self, now: DateTime<Utc>) {
        self.last_success = Some(now);
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    pub fn mark_failure(&mut self, error: impl Into<String>) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.into());
    }

    #[must_use]
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        Freshness::evaluate(self.last_success, self.consecutive_failures, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> WeatherReport {
        WeatherReport {
            condition_code: 500,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            temperature_c: 21.4,
            location_name: "Lisbon".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn fahrenheit_conversion() {
        assert!((convert_temp(100.0, Units::Fahrenheit) - 212.0).abs() < 1e-4);
        assert_eq!(report().temperature(Units::Fahrenheit), 71);
    }

    #[test]
    fn summary_joins_available_parts() {
        assert_eq!(report().summary(Units::Celsius), "21°C · light rain · Lisbon");
        let bare = WeatherReport {
            description: String::new(),
            location_name: String::new(),
            ..report()
        };
        assert_eq!(bare.summary(Units::Celsius), "21°C");
    }

    #[test]
    fn success_clears_failures() {
        let mut meta = RefreshMetadata::default();
        meta.mark_failure("timeout");
        meta.mark_failure("timeout");
        assert_eq!(meta.consecutive_failures, 2);
        let now = Utc::now();
        meta.mark_success(now);
        assert_eq!(meta.consecutive_failures, 0);
        assert!(meta.last_error.is_none());
        assert_eq!(meta.freshness(now), Freshness::Fresh);
    }
}
