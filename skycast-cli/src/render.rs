//! Terminal rendering of the orchestrator state.

use skycast_core::format::{day_label, map_url, temp_label, time_label, wind_label};
use skycast_core::model::Condition;
use skycast_core::{AppState, Units};

/// Print the selected place and its forecast bundle, if any.
pub fn state(state: &AppState) {
    if let Some(error) = &state.error {
        println!("{error}");
        return;
    }

    let Some(place) = &state.selected_place else {
        println!("No location selected.");
        return;
    };
    let Some(forecast) = &state.forecast else {
        println!("No forecast loaded for {}.", place.label());
        return;
    };

    let units = forecast.units;
    let offset = forecast.utc_offset_secs;

    println!();
    println!("{}  [{:.3}, {:.3}]", place.label(), place.lat, place.lon);
    println!("Map: {}", map_url(place.lat, place.lon));
    println!();

    let current = &forecast.current;
    println!(
        "Now: {}  {}",
        opt_temp(units, current.temp),
        condition_text(&current.weather)
    );
    if let Some(feels) = current.feels_like {
        println!("Feels like {}", temp_label(units, feels));
    }
    println!(
        "Humidity {}   Wind {}",
        current
            .humidity
            .map_or_else(|| "-".to_string(), |h| format!("{h}%")),
        current
            .wind_speed
            .map_or_else(|| "-".to_string(), |w| wind_label(units, w)),
    );

    println!();
    println!("Next hours:");
    if forecast.hourly.is_empty() {
        println!("  no hourly data available");
    }
    for sample in &forecast.hourly {
        println!(
            "  {}  {:>5}  {}",
            time_label(sample.dt, offset),
            opt_temp(units, sample.temp),
            condition_text(&sample.weather)
        );
    }

    println!();
    println!("Daily outlook:");
    if forecast.daily.is_empty() {
        println!("  no daily data available");
    }
    for day in &forecast.daily {
        println!(
            "  {:<11}  {:>5} / {:<5}  {}",
            day_label(day.dt, offset),
            opt_temp(units, day.temp.min),
            opt_temp(units, day.temp.max),
            condition_text(&day.weather)
        );
    }
    println!();
    println!("Free forecast provides ~5 days (not full 7).");
}

fn opt_temp(units: Units, temp: Option<f64>) -> String {
    temp.map_or_else(|| "-".to_string(), |t| temp_label(units, t))
}

fn condition_text(weather: &[Condition]) -> &str {
    weather
        .first()
        .and_then(|c| c.description.as_deref().or(c.main.as_deref()))
        .unwrap_or("-")
}
