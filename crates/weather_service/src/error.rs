//! Weather client error types

use thiserror::Error;

/// Errors that can occur while talking to the weather service
///
/// Only transport and HTTP status failures are represented here. Missing or
/// malformed fields in a successful response are never reported as errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be initialized
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WeatherError {
    /// Returns true if the same request may succeed when repeated later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_) | Self::ServiceUnavailable(_) | Self::RateLimitExceeded
        )
    }
}

impl From<config::ConfigError> for WeatherError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
