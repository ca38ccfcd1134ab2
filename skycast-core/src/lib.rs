//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A client for the free OpenWeather endpoints (current conditions,
//!   5-day/3-hour forecast, forward and reverse geocoding)
//! - Normalization of the two raw payloads into one current/hourly/daily bundle
//! - The client orchestrator: app state, events, and a pure reducer
//! - Durable storage for the theme preference and saved places
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod store;

pub use app::{App, AppState, Event, reduce};
pub use config::Config;
pub use error::Error;
pub use location::{Coordinates, LocationError, LocationSource};
pub use model::{
    CurrentConditions, DailyAggregate, ForecastBundle, HourlySample, PlaceCandidate, SavedPlace,
    Theme, Units,
};
pub use provider::OpenWeatherClient;
pub use service::WeatherService;
pub use store::PrefsStore;

/// Core result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
