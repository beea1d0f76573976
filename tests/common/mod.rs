#![allow(dead_code)]

use std::{path::Path, time::Duration};

use aurashow::{
    app::{events::AppEvent, settings::RuntimeSettings, state::AppState},
    cli::Cli,
};
use clap::Parser;
use image::{Rgb, RgbImage};
use tokio::sync::mpsc;

/// Offline CLI for `folder`: fixed seed, no network, no settings on disk.
pub fn offline_cli(folder: &Path, extra: &[&str]) -> Cli {
    let folder = folder.to_string_lossy().into_owned();
    let mut args = vec![
        "aurashow".to_string(),
        folder,
        "--seed".to_string(),
        "7".to_string(),
        "--no-weather".to_string(),
    ];
    args.extend(extra.iter().map(ToString::to_string));
    Cli::parse_from(args)
}

pub fn state_for(cli: &Cli) -> AppState {
    let mut state = AppState::with_settings(cli, RuntimeSettings::from_cli_defaults(cli), None);
    state.resize(40, 12);
    state
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(dir.join(name))
        .expect("write fixture png");
}

/// Feeds queued events back into the state until `done` holds.
pub async fn pump_until(
    state: &mut AppState,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
    cli: &Cli,
    done: impl Fn(&AppState) -> bool,
) {
    let wait = async {
        while !done(state) {
            let event = rx.recv().await.expect("event channel open");
            state.handle_event(event, tx, cli).await.expect("event handled");
        }
    };
    tokio::time::timeout(Duration::from_secs(10), wait)
        .await
        .expect("condition reached in time");
}
