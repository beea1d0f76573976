#![allow(clippy::missing_errors_doc)]

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    data::{geoip::GEOIP_URL, weather::WEATHER_URL},
    domain::weather::Units,
    sim::{fit::FitMode, selector::TestPreset, transition::TransitionType},
};

pub const DEFAULT_SLIDE_SECS: u64 = 5;
pub const DEFAULT_REFRESH_SECS: u64 = 600;

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "aurashow",
    version,
    about = "Ambient terminal slideshow with live weather effects"
)]
pub struct Cli {
    /// Folder of images to show
    pub folder: PathBuf,

    /// Seconds each image stays on screen (2..3600)
    #[arg(long, default_value_t = DEFAULT_SLIDE_SECS, value_parser = clap::value_parser!(u64).range(2..=3600))]
    pub slide_duration: u64,

    /// How images are scaled into the terminal
    #[arg(long, value_enum, default_value_t = FitMode::Crop)]
    pub fit: FitMode,

    /// Transition between images
    #[arg(long, value_enum, default_value_t = TransitionType::Crossfade)]
    pub transition: TransitionType,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Hide the clock
    #[arg(long)]
    pub no_clock: bool,

    /// 24-hour clock
    #[arg(long)]
    pub clock_24h: bool,

    /// Disable weather fetching and the weather line
    #[arg(long)]
    pub no_weather: bool,

    /// Keep the weather line but skip the particle effects
    #[arg(long)]
    pub no_weather_effects: bool,

    /// Fill letterbox bars with a dimmed, enlarged copy of the image
    #[arg(long)]
    pub backdrop: bool,

    /// Temperature units
    #[arg(long, value_enum, default_value_t = Units::Celsius)]
    pub units: Units,

    /// Latitude (requires --lon); otherwise located by IP
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, hide = true, default_value = WEATHER_URL)]
    pub weather_url: String,

    #[arg(long, hide = true, default_value = GEOIP_URL)]
    pub geoip_url: String,

    /// Weather refresh interval in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Show a fixed weather effect instead of live weather
    #[arg(long, value_enum)]
    pub test_weather: Option<TestPreset>,

    /// Seed for shuffling and particles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (filter with AURASHOW_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon)) if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) => {
                anyhow::bail!("coordinates out of range: {lat}, {lon}")
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}
