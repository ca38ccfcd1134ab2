use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system used for provider requests and display.
///
/// Conversion between systems is always done by refetching from the provider,
/// never by client-side arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }

    /// Temperature suffix for display, e.g. `31°C`.
    #[must_use]
    pub fn temp_suffix(self) -> &'static str {
        match self {
            Units::Metric => "C",
            Units::Imperial => "F",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// One entry of the provider's weather-condition list.
///
/// Every field is optional; malformed entries degrade to empty values
/// instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A resolved place returned by geocoding.
///
/// Identity for de-duplication is the `(lat, lon)` pair, not the name:
/// two candidates with identical coordinates are the same place regardless
/// of label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl PlaceCandidate {
    /// Whether the other candidate refers to the same coordinates.
    #[must_use]
    pub fn same_spot(&self, other: &PlaceCandidate) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }

    /// Display label, e.g. `Lagos, Lagos State (NG)`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {} ({})", self.name, state, self.country),
            None => format!("{} ({})", self.name, self.country),
        }
    }
}

/// A place the user chose to keep around. Persisted, most recently added
/// first, unique by coordinates, capped by the orchestrator.
pub type SavedPlace = PlaceCandidate;

/// Snapshot projected from the current-conditions call. No aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub dt: Option<i64>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub weather: Vec<Condition>,
}

/// One forecast-list entry taken verbatim (3-hour resolution).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub dt: i64,
    pub temp: Option<f64>,
    pub weather: Vec<Condition>,
}

/// Min/max temperature over a daily bucket. Both `None` when no sample in
/// the bucket carried a numeric temperature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TempRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Aggregate over all forecast samples sharing one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Start of the local calendar day, unix seconds.
    pub dt: i64,
    pub temp: TempRange,
    /// Condition list of the representative sample (local noon if present,
    /// otherwise the bucket's first sample).
    pub weather: Vec<Condition>,
}

/// Unified current/hourly/daily shape built from the two free-tier calls.
/// Transient: rebuilt on every search, selection, or unit change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailyAggregate>,
    /// Data provenance tag.
    pub source: String,
    /// Unit system the bundle was fetched under.
    pub units: Units,
    /// UTC offset of the place in seconds, for local-time display.
    pub utc_offset_secs: i32,
}
