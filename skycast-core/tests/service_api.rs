//! Integration tests for the service layer against a mock OpenWeather
//! server: upstream pass-through, the combined forecast failure policy,
//! and the geocode adapters.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::provider::OpenWeatherClient;
use skycast_core::{Error, Units, WeatherService};

fn service_for(server: &MockServer) -> WeatherService {
    let client =
        OpenWeatherClient::new("TEST_KEY".into()).with_base_urls(server.uri(), server.uri());
    WeatherService::new(client)
}

fn current_body() -> serde_json::Value {
    json!({
        "dt": 1749988800,
        "main": {"temp": 31.2, "feels_like": 34.0, "humidity": 74},
        "wind": {"speed": 3.4},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]
    })
}

fn forecast_body() -> serde_json::Value {
    // Two calendar days at UTC: four samples on day one, one on day two.
    json!({
        "city": {"timezone": 0},
        "list": [
            {"dt": 1749945600, "main": {"temp": 24.0}, "weather": [{"main": "Clear", "icon": "01d"}]},
            {"dt": 1749956400, "main": {"temp": 27.5}, "weather": [{"main": "Clear", "icon": "01d"}]},
            {"dt": 1749988800, "main": {"temp": 32.0}, "weather": [{"main": "Rain", "icon": "10d"}]},
            {"dt": 1750000600, "main": {"temp": 29.0}, "weather": [{"main": "Clouds", "icon": "02d"}]},
            {"dt": 1750032000, "main": {"temp": 22.0}, "weather": [{"main": "Clear", "icon": "01n"}]}
        ]
    })
}

#[tokio::test]
async fn forecast_combines_both_calls_into_one_bundle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let bundle = service_for(&server)
        .forecast(9.07, 7.49, Units::Metric)
        .await
        .unwrap();

    assert_eq!(bundle.source, "free_current+5day_forecast");
    assert_eq!(bundle.current.temp, Some(31.2));
    assert_eq!(bundle.current.humidity, Some(74));
    assert_eq!(bundle.hourly.len(), 5);
    assert_eq!(bundle.hourly[0].dt, 1_749_945_600);

    assert_eq!(bundle.daily.len(), 2);
    assert_eq!(bundle.daily[0].temp.min, Some(24.0));
    assert_eq!(bundle.daily[0].temp.max, Some(32.0));
    // The 12:00 UTC sample supplies the first day's condition.
    assert_eq!(bundle.daily[0].weather[0].main.as_deref(), Some("Rain"));
    assert_eq!(bundle.daily[1].temp.min, Some(22.0));
}

#[tokio::test]
async fn current_failure_short_circuits_with_status_and_body() {
    let server = MockServer::start().await;

    let upstream_body = r#"{"cod":401,"message":"Invalid API key"}"#;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string(upstream_body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .forecast(9.07, 7.49, Units::Metric)
        .await
        .unwrap_err();

    match err {
        Error::Upstream { label, status, body } => {
            assert_eq!(label, "Current weather fetch");
            assert_eq!(status, 401);
            assert_eq!(body, upstream_body);
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_failure_surfaces_even_when_current_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .forecast(9.07, 7.49, Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(err.status(), 429);
    assert!(err.to_string().contains("Forecast fetch"));
    assert!(err.to_string().contains("rate limited"));
}

#[tokio::test]
async fn geocode_returns_provider_ranked_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Lagos"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Lagos", "lat": 6.45, "lon": 3.39, "country": "NG", "state": "Lagos State"},
            {"name": "Lagos", "lat": 37.1, "lon": -8.67, "country": "PT"},
            {"name": "Broken", "country": "??"}
        ])))
        .mount(&server)
        .await;

    let candidates = service_for(&server).geocode("Lagos").await.unwrap();

    // The entry without coordinates is unusable and dropped; order is kept.
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].state.as_deref(), Some("Lagos State"));
    assert_eq!(candidates[1].country, "PT");
}

#[tokio::test]
async fn geocode_upstream_error_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(500).set_body_string("geo down"))
        .mount(&server)
        .await;

    let err = service_for(&server).geocode("Lagos").await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert!(err.to_string().contains("geo down"));
}

#[tokio::test]
async fn reverse_geocode_yields_at_most_one_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Abuja", "lat": 9.07, "lon": 7.49, "country": "NG"}
        ])))
        .mount(&server)
        .await;

    let candidate = service_for(&server).reverse(9.07, 7.49).await.unwrap();
    assert_eq!(candidate.unwrap().name, "Abuja");
}

#[tokio::test]
async fn unresolved_position_falls_back_to_sentinel_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let place = service_for(&server).place_for_position(9.07, 7.49).await;
    assert_eq!(place.name, "My location");
    assert_eq!(place.country, "NG");
    assert_eq!(place.lat, 9.07);
}

#[tokio::test]
async fn failed_reverse_lookup_also_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let place = service_for(&server).place_for_position(6.45, 3.39).await;
    assert_eq!(place.name, "My location");
    assert_eq!(place.lon, 3.39);
}
