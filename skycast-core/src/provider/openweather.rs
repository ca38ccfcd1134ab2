use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::Units;
use crate::provider::{RawCurrent, RawForecast, RawGeoPlace};
use crate::{Error, Result};

const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";

/// Maximum number of forward-geocode candidates requested upstream.
pub const GEOCODE_LIMIT: usize = 5;

/// Client for the free OpenWeather endpoints.
///
/// No request timeout is applied; a failed call surfaces immediately and the
/// user re-triggers manually.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    api_base: String,
    geo_base: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            geo_base: DEFAULT_GEO_BASE.to_string(),
        }
    }

    /// Point both endpoint families at custom base URLs. Used by tests to
    /// target a local mock server.
    #[must_use]
    pub fn with_base_urls(mut self, api_base: impl Into<String>, geo_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.geo_base = geo_base.into();
        self
    }

    /// Current conditions snapshot for a coordinate.
    pub async fn current(&self, lat: f64, lon: f64, units: Units) -> Result<RawCurrent> {
        let url = format!("{}/weather", self.api_base);
        self.fetch_json(
            "Current weather fetch",
            &url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.as_str().to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .await
    }

    /// 5-day forecast at 3-hour resolution for a coordinate.
    pub async fn forecast(&self, lat: f64, lon: f64, units: Units) -> Result<RawForecast> {
        let url = format!("{}/forecast", self.api_base);
        self.fetch_json(
            "Forecast fetch",
            &url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.as_str().to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .await
    }

    /// Forward geocode: provider-ranked candidates for a free-text query.
    pub async fn geocode(&self, query: &str) -> Result<Vec<RawGeoPlace>> {
        let url = format!("{}/direct", self.geo_base);
        self.fetch_json(
            "Geocode lookup",
            &url,
            &[
                ("q", query.to_string()),
                ("limit", GEOCODE_LIMIT.to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .await
    }

    /// Reverse geocode: at most one candidate for a coordinate.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Vec<RawGeoPlace>> {
        let url = format!("{}/reverse", self.geo_base);
        self.fetch_json(
            "Reverse geocode",
            &url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .await
    }

    /// Shared fetch path: send, capture status and body, pass non-success
    /// responses through verbatim, decode success bodies against the schema.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        label: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(label, url, "issuing provider request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| Error::Transport { label, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| Error::Transport { label, source })?;

        if !status.is_success() {
            return Err(Error::Upstream {
                label,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| Error::Decode { label, source })
    }
}
