//! Reshapes the two free-tier payloads (current-conditions snapshot +
//! 5-day/3-hour forecast) into one `{current, hourly, daily}` bundle.

use std::collections::BTreeMap;

use crate::format::{local_hour, start_of_local_day};
use crate::model::{
    CurrentConditions, DailyAggregate, ForecastBundle, HourlySample, TempRange, Units,
};
use crate::provider::{RawCurrent, RawForecast, RawSample};

/// Provenance tag attached to every bundle.
pub const SOURCE_TAG: &str = "free_current+5day_forecast";

/// Number of forecast-list entries taken for the hourly strip. At the
/// provider's 3-hour resolution this spans roughly 36 hours.
pub const MAX_HOURLY: usize = 12;

/// Maximum daily buckets emitted; free-tier data usually yields 5.
pub const MAX_DAILY: usize = 7;

/// Local hour whose sample supplies a bucket's display condition.
const REPRESENTATIVE_HOUR: u32 = 12;

/// Build a [`ForecastBundle`] from the two raw payloads.
///
/// Infallible by design: a sparse payload degrades to `None` fields and
/// empty lists. Upstream failures are handled before this point.
#[must_use]
pub fn normalize(current: RawCurrent, forecast: RawForecast, units: Units) -> ForecastBundle {
    let offset = forecast.utc_offset_secs();

    ForecastBundle {
        current: project_current(current),
        hourly: project_hourly(&forecast.list),
        daily: aggregate_daily(&forecast.list, offset),
        source: SOURCE_TAG.to_string(),
        units,
        utc_offset_secs: offset,
    }
}

fn project_current(raw: RawCurrent) -> CurrentConditions {
    let main = raw.main.unwrap_or_default();
    let wind = raw.wind.unwrap_or_default();

    CurrentConditions {
        dt: raw.dt,
        temp: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
        wind_speed: wind.speed,
        weather: raw.weather,
    }
}

/// First [`MAX_HOURLY`] forecast entries verbatim, order preserved.
fn project_hourly(list: &[RawSample]) -> Vec<HourlySample> {
    list.iter()
        .take(MAX_HOURLY)
        .map(|sample| HourlySample {
            dt: sample.dt,
            temp: sample.temp(),
            weather: sample.weather.clone(),
        })
        .collect()
}

/// Partition the full list into local-calendar-day buckets and aggregate
/// each one. `BTreeMap` keeps bucket keys ascending.
fn aggregate_daily(list: &[RawSample], utc_offset_secs: i32) -> Vec<DailyAggregate> {
    let mut buckets: BTreeMap<i64, Vec<&RawSample>> = BTreeMap::new();
    for sample in list {
        let day_key = start_of_local_day(sample.dt, utc_offset_secs);
        buckets.entry(day_key).or_default().push(sample);
    }

    buckets
        .into_iter()
        .take(MAX_DAILY)
        .map(|(day_dt, samples)| DailyAggregate {
            dt: day_dt,
            temp: temp_range(&samples),
            weather: representative(&samples, utc_offset_secs)
                .map(|s| s.weather.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Min/max over samples with a numeric temperature. Samples without one are
/// skipped here but still count for representative selection.
fn temp_range(samples: &[&RawSample]) -> TempRange {
    samples
        .iter()
        .filter_map(|s| s.temp())
        .fold(TempRange::default(), |acc, t| TempRange {
            min: Some(acc.min.map_or(t, |m| m.min(t))),
            max: Some(acc.max.map_or(t, |m| m.max(t))),
        })
}

/// The sample at local noon if the bucket has one, else the bucket's first
/// sample in original order.
fn representative<'a>(samples: &[&'a RawSample], utc_offset_secs: i32) -> Option<&'a RawSample> {
    samples
        .iter()
        .find(|s| local_hour(s.dt, utc_offset_secs) == REPRESENTATIVE_HOUR)
        .or_else(|| samples.first())
        .copied()
}
