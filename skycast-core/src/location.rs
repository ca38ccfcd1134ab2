//! Geolocation capability seam.
//!
//! The core does not know how a host environment obtains a position; the
//! orchestrator only needs some [`LocationSource`] and a bounded wait.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the wait for a position fix.
pub const LOCATION_WAIT: Duration = Duration::from_secs(15);

/// A raw position, before reverse geocoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Geolocation failures, distinguished so the user-facing message can tell
/// a denial from an unavailable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied.")]
    PermissionDenied,
    #[error("Geolocation is not supported in this environment.")]
    Unsupported,
    #[error("Failed to get location.")]
    Unavailable,
}

/// Something that can produce the user's current position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Ask `source` for a position, giving up after [`LOCATION_WAIT`].
pub async fn locate(source: &dyn LocationSource) -> Result<Coordinates, LocationError> {
    tokio::time::timeout(LOCATION_WAIT, source.current_position())
        .await
        .unwrap_or(Err(LocationError::Unavailable))
}
