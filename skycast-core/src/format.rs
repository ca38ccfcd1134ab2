//! Display formatting helpers: pure functions from unix timestamps and the
//! unit system to strings, plus the local-day boundary math used by the
//! daily aggregation.

use chrono::{DateTime, FixedOffset};

use crate::model::Units;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;

/// Unix second of local midnight for the calendar day containing `dt`,
/// under a fixed UTC offset in seconds.
#[must_use]
pub fn start_of_local_day(dt: i64, utc_offset_secs: i32) -> i64 {
    let local = dt + i64::from(utc_offset_secs);
    let midnight_local = local - local.rem_euclid(SECS_PER_DAY);
    midnight_local - i64::from(utc_offset_secs)
}

/// Local hour of day (0..=23) for `dt` under a fixed UTC offset in seconds.
#[must_use]
pub fn local_hour(dt: i64, utc_offset_secs: i32) -> u32 {
    let local = dt + i64::from(utc_offset_secs);
    (local.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR) as u32
}

fn local_datetime(dt: i64, utc_offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_secs)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    DateTime::from_timestamp(dt, 0).map(|t| t.with_timezone(&offset))
}

/// Time-of-day label, e.g. `14:00`.
#[must_use]
pub fn time_label(dt: i64, utc_offset_secs: i32) -> String {
    local_datetime(dt, utc_offset_secs)
        .map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string())
}

/// Weekday/date label, e.g. `Thu Aug 7`.
#[must_use]
pub fn day_label(dt: i64, utc_offset_secs: i32) -> String {
    local_datetime(dt, utc_offset_secs)
        .map_or_else(|| "--".to_string(), |t| t.format("%a %b %-d").to_string())
}

/// Wind speed label. The provider reports m/s under metric units and mph
/// under imperial, so metric is converted to km/h for display and imperial
/// is shown as-is.
#[must_use]
pub fn wind_label(units: Units, wind_speed: f64) -> String {
    match units {
        Units::Metric => format!("{:.0} km/h", wind_speed * 3.6),
        Units::Imperial => format!("{wind_speed:.0} mph"),
    }
}

/// Rounded temperature with the unit suffix, e.g. `31°C`.
#[must_use]
pub fn temp_label(units: Units, temp: f64) -> String {
    format!("{:.0}°{}", temp.round(), units.temp_suffix())
}

/// Icon image size for [`icon_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small,
    Medium,
}

/// URL of the provider's condition icon, e.g. `10d`.
#[must_use]
pub fn icon_url(icon_code: &str, size: IconSize) -> String {
    match size {
        IconSize::Small => format!("https://openweathermap.org/img/wn/{icon_code}.png"),
        IconSize::Medium => format!("https://openweathermap.org/img/wn/{icon_code}@2x.png"),
    }
}

/// OpenStreetMap link with a marker on the given coordinates.
#[must_use]
pub fn map_url(lat: f64, lon: f64) -> String {
    format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=11/{lat}/{lon}")
}
