use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{app::state::AppState, resilience::freshness::Freshness};

const PANEL_BG: Color = Color::Rgb(12, 12, 16);
const TEXT: Color = Color::Rgb(236, 236, 240);
const MUTED: Color = Color::Rgb(150, 150, 160);

#[must_use]
pub fn clock_text(now: DateTime<Local>, clock_24h: bool) -> String {
    if clock_24h {
        now.format("%H:%M:%S").to_string()
    } else {
        now.format("%I:%M:%S %p").to_string()
    }
}

/// Bottom-left info panel plus the toast line above it.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, now: DateTime<Local>) {
    let lines = panel_lines(state, now);
    if !lines.is_empty() {
        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2;
        let height = lines.len() as u16;
        let panel = Rect {
            x: area.x + 1,
            y: area.bottom().saturating_sub(height + 1),
            width: width.min(area.width.saturating_sub(1)),
            height: height.min(area.height),
        }
        .intersection(area);
        frame.render_widget(Clear, panel);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(PANEL_BG).fg(TEXT)),
            panel,
        );
    }

    if let Some(toast) = &state.toast {
        let width = (toast.text.chars().count() as u16 + 2).min(area.width);
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + 1.min(area.height.saturating_sub(1)),
            width,
            height: 1.min(area.height),
        }
        .intersection(area);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(Line::from(format!(" {} ", toast.text))).style(
                Style::default()
                    .bg(PANEL_BG)
                    .fg(TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
            toast_area,
        );
    }
}

fn panel_lines(state: &AppState, now: DateTime<Local>) -> Vec<Line<'static>> {
    let settings = &state.settings;
    let mut lines = Vec::new();

    if settings.show_clock {
        lines.push(Line::from(Span::styled(
            format!(" {} ", clock_text(now, settings.clock_24h)),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    if settings.show_weather {
        let mut spans = vec![Span::raw(" ")];
        match &state.weather {
            Some(report) => spans.push(Span::raw(report.summary(settings.units))),
            None => {
                let text = match &state.refresh_meta.last_error {
                    Some(err) => format!("Weather unavailable: {}", error_head(err)),
                    None => "Loading weather...".to_string(),
                };
                spans.push(Span::styled(text, Style::default().fg(MUTED)));
            }
        }
        let freshness = state.refresh_meta.freshness(now.with_timezone(&Utc));
        if state.weather.is_some()
            && let Some(badge) = freshness.badge()
        {
            let color = match freshness {
                Freshness::Offline => Color::LightRed,
                _ => Color::Yellow,
            };
            spans.push(Span::styled(
                format!("  ⚠ {badge}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::raw(" "));
        lines.push(Line::from(spans));
    }

    if let Some(preset) = state.test_preset {
        lines.push(Line::from(Span::styled(
            format!(" Test weather: {} ", preset.label()),
            Style::default().fg(MUTED),
        )));
    }

    if let Some(status) = &state.status {
        lines.push(Line::from(Span::styled(
            format!(" {status} "),
            Style::default().fg(MUTED),
        )));
    }

    lines
}

/// Outermost context of an error chain rendered with `{:#}`.
fn error_head(err: &str) -> &str {
    err.split(": ").next().unwrap_or(err)
}
