use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{
    sync::mpsc::Sender,
    task,
    time::{MissedTickBehavior, interval, sleep},
};

use crate::{
    data::images::{self, Bitmap, ImageError},
    domain::weather::{Location, WeatherReport},
};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    TickRefresh,
    Input(Event),
    FolderScanned {
        generation: u64,
        result: Result<Vec<PathBuf>, ImageError>,
    },
    ImageDecoded {
        generation: u64,
        index: usize,
        result: Result<Bitmap, ImageError>,
    },
    LocationResolved(Option<Location>),
    WeatherFetched(WeatherReport),
    WeatherFailed(String),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// Turns Ctrl-C delivered as a signal (outside raw mode) into a quit.
pub fn spawn_signal_task(tx: Sender<AppEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(AppEvent::Quit).await;
        }
    });
}

pub fn start_frame_task(tx: Sender<AppEvent>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

pub fn start_refresh_task(tx: Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(60);
        loop {
            sleep(jittered(base)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}

/// `base` seconds ±10%.
#[allow(clippy::cast_precision_loss)]
fn jittered(base: u64) -> Duration {
    let jitter = rand::rng().random_range(-0.1f32..0.1f32);
    Duration::from_secs_f32((base as f32 * (1.0 + jitter)).max(1.0))
}

pub fn schedule_retry(tx: Sender<AppEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay.max(Duration::from_secs(1))).await;
        let _ = tx.send(AppEvent::TickRefresh).await;
    });
}

pub fn spawn_folder_scan(tx: Sender<AppEvent>, generation: u64, folder: PathBuf) {
    tokio::spawn(async move {
        let result = run_blocking(folder, images::scan_folder).await;
        let _ = tx.send(AppEvent::FolderScanned { generation, result }).await;
    });
}

pub fn spawn_decode(tx: Sender<AppEvent>, generation: u64, index: usize, path: PathBuf) {
    tokio::spawn(async move {
        let result = run_blocking(path, images::decode).await;
        let _ = tx
            .send(AppEvent::ImageDecoded {
                generation,
                index,
                result,
            })
            .await;
    });
}

/// Runs `job` on the blocking pool. A panicking job still yields an error
/// for `path`, so its caller always hears back.
async fn run_blocking<T, F>(path: PathBuf, job: F) -> Result<T, ImageError>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T, ImageError> + Send + 'static,
{
    let worker_path = path.clone();
    match task::spawn_blocking(move || job(&worker_path)).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "image worker panicked");
            Err(ImageError::WorkerPanicked { path })
        }
    }
}
