//! Plain-text rendering of the application state.

use chrono::FixedOffset;
use std::fmt::Write;

use skycheck_core::{
    AppState, CurrentConditions, HourlyForecastPoint, MinutelyPrecipitationPoint, Verdict,
    model::{degrees_label, display_degrees, hour_label, marker_caption, pop_label},
    precip::{BarScale, IntensityTier, bars, max_intensity},
    tiles::icon_url,
};

const CHART_ROWS: usize = 5;
const HOURS_PER_ROW: usize = 8;
const HOUR_COLUMN: usize = 10;

pub fn report(state: &AppState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Weather App\n");
    if let Some(err) = &state.error {
        let _ = writeln!(out, "Error: {err}\n");
    }

    match &state.current {
        Some(current) => out.push_str(&current_block(current, state)),
        None if state.error.is_none() => out.push_str("Fetching weather data...\n"),
        None => {}
    }

    let marker_title =
        if state.location_name.is_empty() { "Current location" } else { &state.location_name };
    let _ = writeln!(
        out,
        "\nMap pin: {marker_title} ({}): {}",
        state.coordinates,
        marker_caption(state.current.as_ref())
    );

    out.push_str("\nNext 60 Minutes\n");
    out.push_str(&precipitation_chart(&state.minutely));

    if let Some(verdict) = state.verdict() {
        out.push('\n');
        out.push_str(&verdict_banner(verdict));
    }

    out.push_str("\n48-Hour Forecast\n");
    out.push_str(&hourly_strip(&state.hourly, state.timezone_offset_secs));

    out
}

fn current_block(current: &CurrentConditions, state: &AppState) -> String {
    let mut out = String::new();
    let title =
        if state.location_name.is_empty() { "Current Weather" } else { &state.location_name };

    let _ = writeln!(out, "{title}");
    if let Some(cond) = &current.condition {
        let _ = writeln!(out, "  {} ({})  {}", cond.main, cond.description, icon_url(&cond.icon));
    }
    let _ = writeln!(out, "  {}°F", degrees_label(current.temperature_f));
    let _ = writeln!(out, "  Feels like: {}°F", degrees_label(current.feels_like_f));
    let _ = writeln!(out, "  Humidity: {}%", current.humidity_pct);

    if let (Some(at), Some(offset)) =
        (current.observed_at, FixedOffset::east_opt(state.timezone_offset_secs))
    {
        let _ = writeln!(out, "  Observed at {}", at.with_timezone(&offset).format("%H:%M"));
    }

    out
}

fn glyph(tier: IntensityTier) -> char {
    match tier {
        IntensityTier::Light => '░',
        IntensityTier::Moderate => '▒',
        IntensityTier::Heavy => '█',
    }
}

pub fn precipitation_chart(minutely: &[MinutelyPrecipitationPoint]) -> String {
    let Some(peak) = max_intensity(minutely) else {
        return "No minutely data available\n".to_string();
    };

    let scale = BarScale::default();
    let bars = bars(minutely, &scale);
    let mut out = String::from("Rain intensity (mm/hr)\n");

    for row in (1..=CHART_ROWS).rev() {
        let line: String = bars
            .iter()
            .map(|bar| {
                let filled = (bar.height / scale.max_height * CHART_ROWS as f64).ceil() as usize;
                if filled >= row { glyph(bar.tier) } else { ' ' }
            })
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let mut axis = vec![' '; bars.len() + 2];
    for minute in [0usize, 15, 30, 45, 60] {
        for (i, ch) in minute.to_string().chars().enumerate() {
            if let Some(slot) = axis.get_mut(minute + i) {
                *slot = ch;
            }
        }
    }
    let _ = writeln!(out, "{}", axis.into_iter().collect::<String>().trim_end());

    let _ = writeln!(out, "Max intensity in next 60 min: {peak:.2} mm/hr");
    let legend: Vec<String> = IntensityTier::all()
        .iter()
        .map(|tier| format!("{} {}", glyph(*tier), tier.label()))
        .collect();
    let _ = writeln!(out, "{}", legend.join("   "));

    out
}

pub fn verdict_banner(verdict: Verdict) -> String {
    format!("Can LeBron go out?\n  {}  [{}]\n", verdict.message(), verdict.illustration())
}

pub fn hourly_strip(hourly: &[HourlyForecastPoint], offset_secs: i32) -> String {
    let mut out = String::new();

    for chunk in hourly.chunks(HOURS_PER_ROW) {
        let mut labels = String::new();
        let mut temps = String::new();
        let mut rain = String::new();

        for h in chunk {
            let label = hour_label(h.time, offset_secs);
            let temp = format!("{}°", display_degrees(h.temperature_f));
            let _ = write!(labels, "{:<width$}", label, width = HOUR_COLUMN);
            let _ = write!(temps, "{:<width$}", temp, width = HOUR_COLUMN);
            let _ = write!(rain, "{:<width$}", pop_label(h.pop), width = HOUR_COLUMN);
        }

        for line in [labels, temps, rain] {
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out.push('\n');
    }

    out
}
