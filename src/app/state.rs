mod input;
mod weather;

pub use input::{Command, command_for_key};

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::mpsc;

use crate::{
    app::{
        events::{
            AppEvent, schedule_retry, spawn_decode, spawn_folder_scan, start_frame_task,
            start_refresh_task,
        },
        settings::{RuntimeSettings, load_runtime_settings, save_runtime_settings},
    },
    cli::Cli,
    data::{
        images::{DecodeOutcome, ImageSet, ImageStore},
        weather::WeatherClient,
    },
    domain::{
        season::{Season, current_season},
        weather::{Location, RefreshMetadata, WeatherReport},
    },
    resilience::backoff::Backoff,
    sim::{
        clock::FrameClock,
        effects::{EffectConfig, WeatherLayer},
        math::Viewport,
        selector::{TestPreset, effect_for_code},
        sequencer::{SlideEvent, Slideshow},
    },
    ui::logical_viewport,
};

const TOAST_TIME: Duration = Duration::from_secs(2);

/// Short-lived notice drawn over the slideshow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub remaining: Duration,
}

#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub settings: RuntimeSettings,
    settings_path: Option<PathBuf>,
    pub images: ImageSet,
    pub store: ImageStore,
    pub slideshow: Slideshow,
    pub weather_layer: WeatherLayer,
    pub clock: FrameClock,
    pub viewport: Viewport,
    pub weather: Option<WeatherReport>,
    pub refresh_meta: RefreshMetadata,
    pub location: Option<Location>,
    pub backoff: Backoff,
    pub fetch_in_flight: bool,
    weather_client: WeatherClient,
    pub test_preset: Option<TestPreset>,
    pub season: Season,
    pub status: Option<String>,
    pub toast: Option<Toast>,
    rng: StdRng,
    scan_generation: u64,
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        let (settings, settings_path) = load_runtime_settings(cli, true);
        Self::with_settings(cli, settings, settings_path)
    }

    /// State with explicit settings; `settings_path: None` never touches disk.
    pub fn with_settings(
        cli: &Cli,
        settings: RuntimeSettings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let rng = cli
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            running: true,
            settings,
            settings_path,
            images: ImageSet::default(),
            store: ImageStore::default(),
            slideshow: Slideshow::new(settings.slide_interval(), settings.transition),
            weather_layer: WeatherLayer::new(cli.seed),
            clock: FrameClock::new(),
            viewport: Viewport::default(),
            weather: None,
            refresh_meta: RefreshMetadata::default(),
            location: None,
            backoff: Backoff::for_weather(),
            fetch_in_flight: false,
            weather_client: WeatherClient::with_base_url(
                cli.weather_url.clone(),
                cli.api_key.clone(),
            ),
            test_preset: cli.test_weather,
            season: current_season(),
            status: Some(format!("Scanning {}...", cli.folder.display())),
            toast: None,
            rng,
            scan_generation: 0,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                start_frame_task(tx.clone(), cli.frame_interval());
                self.rescan(tx, cli);
                if self.settings.show_weather && self.weather_configured() {
                    start_refresh_task(tx.clone(), self.settings.refresh_interval_secs);
                    self.start_fetch(tx, cli);
                }
            }
            AppEvent::TickFrame => {
                let dt = self.clock.tick(Instant::now());
                self.advance_frame(dt);
                self.request_decodes(tx);
            }
            AppEvent::TickRefresh => {
                if self.settings.show_weather {
                    self.start_fetch(tx, cli);
                }
            }
            AppEvent::Input(event) => self.handle_input(event, tx, cli).await?,
            AppEvent::FolderScanned { generation, result } => {
                if generation != self.scan_generation {
                    return Ok(());
                }
                match result {
                    Ok(paths) => self.load_images(generation, paths, &cli.folder),
                    Err(err) => {
                        tracing::warn!(error = %err, "folder scan failed");
                        self.status = Some(format!("{err}"));
                    }
                }
                self.request_decodes(tx);
            }
            AppEvent::ImageDecoded {
                generation,
                index,
                result,
            } => {
                if self.store.finish(generation, index, result) == DecodeOutcome::Failed {
                    self.slideshow.mark_failed(index);
                }
            }
            AppEvent::LocationResolved(location) => match location {
                Some(location) => {
                    tracing::info!(name = %location.name, "location resolved");
                    self.location = Some(location.clone());
                    self.fetch_weather(tx, location);
                }
                None => self.fetch_failed(tx, "could not determine location".to_string()),
            },
            AppEvent::WeatherFetched(report) => {
                tracing::info!(
                    code = report.condition_code,
                    temperature = report.temperature_c,
                    "weather updated"
                );
                self.fetch_in_flight = false;
                self.refresh_meta.mark_success(report.fetched_at);
                self.backoff.reset();
                self.season = current_season();
                self.weather = Some(report);
            }
            AppEvent::WeatherFailed(err) => self.fetch_failed(tx, err),
            AppEvent::Quit => {
                self.running = false;
            }
        }
        Ok(())
    }

    /// Advances every simulation by one frame.
    pub fn advance_frame(&mut self, dt: Duration) {
        match self.slideshow.tick(dt) {
            Some(SlideEvent::Started { from, to, .. }) => {
                tracing::debug!(from, to, "slide transition started");
            }
            Some(SlideEvent::Completed { image }) => {
                tracing::debug!(image, "slide transition completed");
            }
            None => {}
        }
        self.weather_layer.configure(self.active_effect());
        self.weather_layer.tick(dt, self.viewport);
        if let Some(toast) = self.toast.as_mut() {
            toast.remaining = toast.remaining.saturating_sub(dt);
            if toast.remaining.is_zero() {
                self.toast = None;
            }
        }
    }

    /// Effect for this frame: the test preset if one is active, otherwise
    /// the live weather, unless effects are switched off.
    #[must_use]
    pub fn active_effect(&self) -> Option<EffectConfig> {
        if !self.settings.weather_effects {
            return None;
        }
        if let Some(preset) = self.test_preset {
            return Some(preset.config(self.season));
        }
        if !self.settings.show_weather {
            return None;
        }
        let report = self.weather.as_ref()?;
        effect_for_code(report.condition_code, self.season)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = logical_viewport(cols, rows);
    }

    fn rescan(&mut self, tx: &mpsc::Sender<AppEvent>, cli: &Cli) {
        self.scan_generation = self.scan_generation.wrapping_add(1);
        spawn_folder_scan(tx.clone(), self.scan_generation, cli.folder.clone());
    }

    /// Installs a freshly scanned image set and reshuffles the show.
    pub fn load_images(&mut self, generation: u64, paths: Vec<PathBuf>, folder: &Path) {
        tracing::info!(count = paths.len(), folder = %folder.display(), "image folder scanned");
        self.status = paths
            .is_empty()
            .then(|| format!("No images found in {}", folder.display()));
        self.images = ImageSet { generation, paths };
        self.store.reset(generation);
        self.slideshow.load(self.images.len(), &mut self.rng);
    }

    /// Images the next frames need that are neither cached nor in flight.
    pub fn pending_decodes(&mut self) -> Vec<usize> {
        let wanted = [
            self.slideshow.from_image(),
            self.slideshow.to_image(),
            self.slideshow.upcoming_image(),
        ];
        let mut requests = Vec::new();
        for index in wanted.into_iter().flatten() {
            if !requests.contains(&index) && self.store.request(index) {
                requests.push(index);
            }
        }
        requests
    }

    fn request_decodes(&mut self, tx: &mpsc::Sender<AppEvent>) {
        for index in self.pending_decodes() {
            if let Some(path) = self.images.get(index) {
                spawn_decode(tx.clone(), self.images.generation, index, path.to_path_buf());
            }
        }
    }

    pub fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            text: text.into(),
            remaining: TOAST_TIME,
        });
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = save_runtime_settings(path, &self.settings) {
            tracing::warn!(error = %err, "saving settings failed");
        }
    }
}
