//! Weather service configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WeatherError;

/// Prefix for environment variable overrides (e.g. `WEATHER_BASE_URL`)
const ENV_PREFIX: &str = "WEATHER";

/// Default configuration file name, resolved against the working directory
const DEFAULT_FILE_NAME: &str = "weather";

/// Configuration for the Open-Meteo client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; `None` keeps the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Timezone sent with every request (default: `auto`)
    ///
    /// `None` or an empty string omits the parameter, which makes the API
    /// report timestamps in GMT.
    #[serde(default = "default_timezone")]
    pub timezone: Option<String>,

    /// Custom `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_timezone() -> Option<String> {
    Some("auto".to_string())
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            timezone: default_timezone(),
            user_agent: None,
        }
    }
}

impl WeatherConfig {
    /// Create a configuration suitable for testing against a local server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: Some(5),
            ..Default::default()
        }
    }

    /// Load from an optional `weather.toml` in the working directory,
    /// overridden by `WEATHER_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self, WeatherError> {
        Self::build(config::File::with_name(DEFAULT_FILE_NAME).required(false))
    }

    /// Load from the given file, overridden by `WEATHER_*` environment variables
    ///
    /// The file format is inferred from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or the
    /// result is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WeatherError> {
        Self::build(config::File::from(path.as_ref()))
    }

    fn build<S>(file: S) -> Result<Self, WeatherError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate().map_err(WeatherError::Configuration)?;

        debug!(base_url = %loaded.base_url, "Loaded weather configuration");
        Ok(loaded)
    }

    /// Timezone query value, if one should be sent
    #[must_use]
    pub fn timezone_param(&self) -> Option<&str> {
        self.timezone.as_deref().filter(|tz| !tz.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("base_url must be an http(s) URL, got {}", self.base_url));
        }

        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
