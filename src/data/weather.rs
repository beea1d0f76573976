use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::weather::{Location, WeatherReport};

pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeatherError {
    #[error("no OpenWeatherMap API key configured")]
    MissingApiKey,
    #[error("weather response carried no condition")]
    NoConditions,
}

/// Current-conditions client for the OpenWeatherMap `weather` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(WEATHER_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Always requests metric units; conversion happens at display time.
    pub async fn fetch(&self, location: &Location) -> Result<WeatherReport> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .context("weather request failed")?
            .error_for_status()
            .context("weather request returned non-success status")?;

        let payload: WeatherResponse = response
            .json()
            .await
            .context("failed to parse weather payload")?;
        report_from(payload, location)
    }
}

fn report_from(payload: WeatherResponse, location: &Location) -> Result<WeatherReport> {
    let condition = payload
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::NoConditions)?;
    let location_name = payload
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| location.name.clone());
    Ok(WeatherReport {
        condition_code: condition.id,
        condition: condition.main,
        description: condition.description,
        temperature_c: payload.main.temp,
        location_name,
        fetched_at: Utc::now(),
    })
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    main: MainBlock,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    id: u16,
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f32,
}
