//! Raw payload schema for the free OpenWeather endpoints, and the HTTP
//! client that fetches them.
//!
//! The schema below is the single place that says which upstream fields are
//! required and which are optional. A forecast entry without a timestamp is
//! unusable and fails decoding; every other field degrades to `None` or an
//! empty list, so a sparse payload never aborts normalization.

use serde::Deserialize;

use crate::model::{Condition, PlaceCandidate};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Shared `main` block of the current and forecast payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    #[serde(default)]
    pub speed: Option<f64>,
}

/// `/data/2.5/weather` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub main: Option<RawMain>,
    #[serde(default)]
    pub wind: Option<RawWind>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// One 3-hour-step record of the forecast list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub dt: i64,
    #[serde(default)]
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl RawSample {
    /// Numeric temperature, when the sample has one.
    #[must_use]
    pub fn temp(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }
}

/// `city` block of the forecast payload. Carries the place's UTC offset,
/// which defines the "local calendar day" for bucketing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: Option<i32>,
}

/// `/data/2.5/forecast` response, list ordered ascending by `dt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub list: Vec<RawSample>,
    #[serde(default)]
    pub city: Option<RawCity>,
}

impl RawForecast {
    /// UTC offset of the forecast place in seconds, defaulting to UTC.
    #[must_use]
    pub fn utc_offset_secs(&self) -> i32 {
        self.city.as_ref().and_then(|c| c.timezone).unwrap_or(0)
    }
}

/// One entry of the `geo/1.0` direct or reverse response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeoPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl RawGeoPlace {
    /// Convert to a candidate. Entries without numeric coordinates are
    /// unusable and yield `None`; missing labels become empty strings.
    #[must_use]
    pub fn into_candidate(self) -> Option<PlaceCandidate> {
        Some(PlaceCandidate {
            name: self.name.unwrap_or_default(),
            lat: self.lat?,
            lon: self.lon?,
            country: self.country.unwrap_or_default(),
            state: self.state,
        })
    }
}
