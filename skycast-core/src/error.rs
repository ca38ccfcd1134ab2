use thiserror::Error;

use crate::location::LocationError;

/// Main error type for the skycast core library.
///
/// `status()` maps each variant to the HTTP-style status code the original
/// service contract used, so callers embedding this library behind a route
/// can surface the same codes.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request parameter was absent or unusable.
    #[error("{0}")]
    Validation(String),

    /// The OpenWeather credential is not configured.
    #[error("Missing API key. Hint: run `skycast configure` or set SKYCAST_API_KEY.")]
    MissingApiKey,

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An upstream provider call returned a non-success status.
    /// The body is kept verbatim for diagnostics.
    #[error("{label} failed with status {status}: {body}")]
    Upstream {
        label: &'static str,
        status: u16,
        body: String,
    },

    /// The request could not be sent or its body could not be read.
    #[error("{label} request failed: {source}")]
    Transport {
        label: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A success response did not match the expected payload schema.
    #[error("failed to decode {label} response: {source}")]
    Decode {
        label: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Geolocation capability failure (unsupported, denied, or timed out).
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Durable storage I/O failure.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl Error {
    /// HTTP-style status code for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MissingApiKey | Error::Config(_) | Error::Location(_) | Error::Storage(_) => 500,
            Error::Upstream { status, .. } => *status,
            Error::Transport { .. } | Error::Decode { .. } => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = Error::Validation("Missing city query".into());
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn missing_api_key_maps_to_500() {
        assert_eq!(Error::MissingApiKey.status(), 500);
        assert!(Error::MissingApiKey.to_string().contains("API key"));
    }

    #[test]
    fn upstream_keeps_provider_status_and_body() {
        let err = Error::Upstream {
            label: "Current weather fetch",
            status: 401,
            body: r#"{"cod":401,"message":"Invalid API key"}"#.into(),
        };
        assert_eq!(err.status(), 401);
        let msg = err.to_string();
        assert!(msg.contains("Current weather fetch"));
        assert!(msg.contains("Invalid API key"));
    }
}
