use std::path::PathBuf;

use aurashow::{
    app::{settings::RuntimeSettings, state::AppState},
    cli::Cli,
    data::images::Bitmap,
    domain::weather::WeatherReport,
    ui,
};
use chrono::Utc;
use clap::Parser;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, style::Color};

const WIDTH: u16 = 40;
const HEIGHT: u16 = 12;

fn state(extra: &[&str]) -> AppState {
    let mut args = vec!["aurashow", "/pictures", "--seed", "1", "--no-clock"];
    args.extend_from_slice(extra);
    let cli = Cli::parse_from(args);
    let mut state = AppState::with_settings(&cli, RuntimeSettings::from_cli_defaults(&cli), None);
    state.resize(WIDTH, HEIGHT);
    state
}

fn with_solid_image(state: &mut AppState, color: [u8; 3]) {
    state.load_images(1, vec![PathBuf::from("/pictures/only.png")], &PathBuf::from("/pictures"));
    state.store.request(0);
    state
        .store
        .finish(1, 0, Ok(Bitmap::from_rgb(1, 1, color.to_vec())));
}

fn draw(state: &AppState) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("draw");
    terminal.backend().buffer().clone()
}

fn row(buffer: &Buffer, y: u16) -> String {
    (0..WIDTH).map(|x| buffer[(x, y)].symbol()).collect()
}

#[test]
fn image_fills_the_screen_in_half_blocks() {
    let mut state = state(&["--no-weather"]);
    with_solid_image(&mut state, [30, 60, 90]);
    let buffer = draw(&state);
    let cell = &buffer[(20, 4)];
    assert_eq!(cell.symbol(), "▀");
    assert_eq!(cell.fg, Color::Rgb(30, 60, 90));
    assert_eq!(cell.bg, Color::Rgb(30, 60, 90));
}

#[test]
fn letterbox_stays_black_unless_backdrop_is_requested() {
    let mut plain = state(&["--no-weather", "--fit", "fit"]);
    with_solid_image(&mut plain, [200, 100, 50]);
    let fb = ui::compose_frame(&plain, WIDTH, HEIGHT);
    assert!(!plain.settings.backdrop);
    assert_eq!(fb.get(0, 8), [0, 0, 0]);
    assert_eq!(fb.get(WIDTH / 2, 8), [200, 100, 50]);

    let mut backed = state(&["--no-weather", "--fit", "fit", "--backdrop"]);
    with_solid_image(&mut backed, [200, 100, 50]);
    let fb = ui::compose_frame(&backed, WIDTH, HEIGHT);
    assert_ne!(fb.get(0, 8), [0, 0, 0]);
    assert_eq!(fb.get(WIDTH / 2, 8), [200, 100, 50]);
}

#[test]
fn weather_panel_sits_bottom_left() {
    let mut state = state(&[]);
    with_solid_image(&mut state, [0, 0, 0]);
    state.weather = Some(WeatherReport {
        condition_code: 500,
        condition: "Rain".to_string(),
        description: "light rain".to_string(),
        temperature_c: 21.2,
        location_name: "Lisbon".to_string(),
        fetched_at: Utc::now(),
    });
    state.refresh_meta.mark_success(Utc::now());
    let buffer = draw(&state);
    let panel = row(&buffer, HEIGHT - 2);
    insta::assert_snapshot!(panel.trim_matches('▀').trim(), @"21°C · light rain · Lisbon");
}

#[test]
fn stale_weather_carries_a_badge() {
    let mut state = state(&[]);
    with_solid_image(&mut state, [0, 0, 0]);
    state.weather = Some(WeatherReport {
        condition_code: 800,
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
        temperature_c: 5.0,
        location_name: String::new(),
        fetched_at: Utc::now(),
    });
    state.refresh_meta.mark_success(Utc::now() - chrono::Duration::minutes(15));
    let panel = row(&draw(&state), HEIGHT - 2);
    assert!(panel.contains("⚠ stale"), "{panel}");
}

#[test]
fn empty_folder_message_and_toast_render() {
    let mut state = state(&["--no-weather"]);
    state.load_images(1, Vec::new(), &PathBuf::from("/empty"));
    state.show_toast("Fit: Crop");
    let buffer = draw(&state);
    assert!(row(&buffer, HEIGHT - 2).contains("No images found in /empty"));
    assert!(row(&buffer, 1).contains("Fit: Crop"));
    assert_eq!(buffer[(WIDTH - 1, 5)].bg, Color::Rgb(0, 0, 0));
}

#[test]
fn weather_effects_paint_over_the_image() {
    let mut state = state(&["--no-weather", "--test-weather", "fog"]);
    with_solid_image(&mut state, [0, 0, 0]);
    for _ in 0..5 {
        state.advance_frame(std::time::Duration::from_millis(50));
    }
    let fb = ui::compose_frame(&state, WIDTH, HEIGHT);
    let lit = (0..fb.height())
        .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
        .any(|(x, y)| fb.get(x, y) != [0, 0, 0]);
    assert!(lit, "fog bands should brighten some pixels");
}

#[test]
fn tiny_terminals_do_not_panic() {
    let state = state(&[]);
    let mut terminal = Terminal::new(TestBackend::new(1, 1)).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("draw");
}
