use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    cli::{Cli, DEFAULT_REFRESH_SECS, DEFAULT_SLIDE_SECS},
    domain::weather::Units,
    sim::{fit::FitMode, transition::TransitionType},
};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub slide_duration_secs: u64,
    pub fit: FitMode,
    pub transition: TransitionType,
    pub show_clock: bool,
    pub clock_24h: bool,
    pub show_weather: bool,
    pub weather_effects: bool,
    pub backdrop: bool,
    pub units: Units,
    pub refresh_interval_secs: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            slide_duration_secs: DEFAULT_SLIDE_SECS,
            fit: FitMode::Crop,
            transition: TransitionType::Crossfade,
            show_clock: true,
            clock_24h: false,
            show_weather: true,
            weather_effects: true,
            backdrop: false,
            units: Units::Celsius,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            slide_duration_secs: cli.slide_duration,
            fit: cli.fit,
            transition: cli.transition,
            show_clock: !cli.no_clock,
            clock_24h: cli.clock_24h,
            show_weather: !cli.no_weather,
            weather_effects: !cli.no_weather_effects,
            backdrop: cli.backdrop,
            units: cli.units,
            refresh_interval_secs: cli.refresh_interval,
        }
    }

    /// Flags passed explicitly win over whatever was saved.
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.slide_duration != DEFAULT_SLIDE_SECS {
            self.slide_duration_secs = cli.slide_duration;
        }
        if cli.fit != FitMode::Crop {
            self.fit = cli.fit;
        }
        if cli.transition != TransitionType::Crossfade {
            self.transition = cli.transition;
        }
        if cli.no_clock {
            self.show_clock = false;
        }
        if cli.clock_24h {
            self.clock_24h = true;
        }
        if cli.no_weather {
            self.show_weather = false;
        }
        if cli.no_weather_effects {
            self.weather_effects = false;
        }
        if cli.backdrop {
            self.backdrop = true;
        }
        if cli.units != Units::Celsius {
            self.units = cli.units;
        }
        if cli.refresh_interval != DEFAULT_REFRESH_SECS {
            self.refresh_interval_secs = cli.refresh_interval;
        }
    }

    #[must_use]
    pub fn slide_interval(&self) -> Duration {
        Duration::from_secs(self.slide_duration_secs)
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    match settings_path() {
        Some(path) => (load_runtime_settings_from(cli, &path), Some(path)),
        None => (RuntimeSettings::from_cli_defaults(cli), None),
    }
}

/// Saved settings from `path` with CLI overrides applied. A missing or
/// unreadable file falls back to the CLI values.
pub fn load_runtime_settings_from(cli: &Cli, path: &Path) -> RuntimeSettings {
    let saved = fs::read_to_string(path)
        .ok()
        .and_then(|content| match serde_json::from_str::<RuntimeSettings>(&content) {
            Ok(saved) => Some(saved),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed settings");
                None
            }
        });
    let Some(mut settings) = saved else {
        return RuntimeSettings::from_cli_defaults(cli);
    };
    settings.apply_cli_overrides(cli);
    settings
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("AURASHOW_CONFIG_DIR") {
        return Some(PathBuf::from(base).join("settings.json"));
    }
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("aurashow")
            .join("settings.json"),
    )
}
