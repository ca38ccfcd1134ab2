//! Typed mirror of the three service operations: forward geocode, reverse
//! geocode, and the combined forecast. Each validates its input, requires a
//! configured credential before any network call, and passes upstream
//! failures through verbatim.

use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{ForecastBundle, PlaceCandidate, Units};
use crate::normalize::normalize;
use crate::provider::OpenWeatherClient;
use crate::{Error, Result};

/// Sentinel name used when reverse geocoding yields nothing usable.
pub const FALLBACK_PLACE_NAME: &str = "My location";

/// Fixed default country code for the sentinel candidate.
pub const FALLBACK_COUNTRY: &str = "NG";

/// Facade over the provider client plus normalization.
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: OpenWeatherClient,
}

impl WeatherService {
    #[must_use]
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    /// Build a service from configuration. A missing credential is reported
    /// here, before any network call is attempted.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(Error::MissingApiKey)?;
        Ok(Self::new(OpenWeatherClient::new(api_key)))
    }

    /// Forward geocode: up to 5 provider-ranked candidates for a free-text
    /// query. Zero matches is a successful empty response, not a failure.
    pub async fn geocode(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("Missing city query".into()));
        }

        let raw = self.client.geocode(query).await?;
        let candidates: Vec<PlaceCandidate> = raw
            .into_iter()
            .filter_map(crate::provider::RawGeoPlace::into_candidate)
            .take(crate::provider::openweather::GEOCODE_LIMIT)
            .collect();

        debug!(query, count = candidates.len(), "geocode resolved");
        Ok(candidates)
    }

    /// Reverse geocode: at most one candidate, `None` when the provider has
    /// nothing usable for the coordinate.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<PlaceCandidate>> {
        validate_coordinates(lat, lon)?;

        let raw = self.client.reverse(lat, lon).await?;
        Ok(raw
            .into_iter()
            .filter_map(crate::provider::RawGeoPlace::into_candidate)
            .next())
    }

    /// Fetch current conditions and the 5-day forecast concurrently, then
    /// normalize. Either upstream failure short-circuits the combined
    /// operation; no partial bundle is ever produced.
    pub async fn forecast(&self, lat: f64, lon: f64, units: Units) -> Result<ForecastBundle> {
        validate_coordinates(lat, lon)?;

        let (current, forecast) = tokio::join!(
            self.client.current(lat, lon, units),
            self.client.forecast(lat, lon, units),
        );

        let current = current?;
        let forecast = forecast?;

        Ok(normalize(current, forecast, units))
    }

    /// Resolve a raw position into a candidate: reverse geocode, falling
    /// back to the sentinel candidate on an empty or failed lookup.
    pub async fn place_for_position(&self, lat: f64, lon: f64) -> PlaceCandidate {
        match self.reverse(lat, lon).await {
            Ok(Some(candidate)) => candidate,
            Ok(None) => fallback_candidate(lat, lon),
            Err(err) => {
                warn!(%err, "reverse geocode failed, using sentinel place");
                fallback_candidate(lat, lon)
            }
        }
    }
}

/// Sentinel candidate for a coordinate reverse geocoding could not resolve.
#[must_use]
pub fn fallback_candidate(lat: f64, lon: f64) -> PlaceCandidate {
    PlaceCandidate {
        name: FALLBACK_PLACE_NAME.to_string(),
        lat,
        lon,
        country: FALLBACK_COUNTRY.to_string(),
        state: None,
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(Error::Validation("Missing lat/lon".into()));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Error::Validation(format!(
            "Coordinates out of range: {lat}, {lon}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> WeatherService {
        WeatherService::new(OpenWeatherClient::new("KEY".into()))
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_request() {
        let err = service().geocode("   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.status(), 400);
    }

    #[tokio::test]
    async fn non_finite_coordinates_are_rejected() {
        let err = service().forecast(f64::NAN, 7.49, Units::Metric).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains("Missing lat/lon"));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected() {
        let err = service().reverse(91.0, 0.0).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_credential_is_reported_at_construction() {
        let err = WeatherService::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn sentinel_candidate_uses_fixed_defaults() {
        let place = fallback_candidate(9.07, 7.49);
        assert_eq!(place.name, "My location");
        assert_eq!(place.country, "NG");
        assert_eq!(place.lat, 9.07);
        assert!(place.state.is_none());
    }
}
