//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo forecast endpoint.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::models::{
    ApiResponse, CurrentData, CurrentSnapshot, DailyData, DailyPoint, HourlyData, HourlyPoint,
};

/// Latitude of the forecast location (Jakarta)
pub const DEFAULT_LATITUDE: f64 = -6.2;

/// Longitude of the forecast location (Jakarta)
pub const DEFAULT_LONGITUDE: f64 = 106.8;

const HOURLY_TEMPERATURE_FIELDS: &str = "temperature_2m";

const HOURLY_PRECIPITATION_FIELDS: &str = "precipitation_probability";

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,weathercode,relativehumidity_2m,windspeed_10m";

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,\
                            precipitation_probability_max,windspeed_10m_max";

/// Weather client trait for fetching forecast data
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Hourly temperatures; readings without a numeric temperature are dropped
    async fn fetch_hourly(&self) -> Result<Vec<HourlyPoint>, WeatherError>;

    /// Current conditions with the precipitation chance for the current hour
    async fn fetch_current(&self) -> Result<CurrentSnapshot, WeatherError>;

    /// One record per day of the forecast window, unfiltered
    async fn fetch_daily(&self) -> Result<Vec<DailyPoint>, WeatherError>;

    /// Check if the weather service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        config.validate().map_err(WeatherError::Configuration)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    /// Build query parameters: location, the requested field selectors, timezone
    fn build_query(&self, selectors: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(selectors.len() + 3);
        query.push(("latitude", DEFAULT_LATITUDE.to_string()));
        query.push(("longitude", DEFAULT_LONGITUDE.to_string()));
        query.extend(
            selectors
                .iter()
                .map(|(key, value)| (*key, (*value).to_string())),
        );
        if let Some(timezone) = self.config.timezone_param() {
            query.push(("timezone", timezone.to_string()));
        }
        query
    }

    /// Issue one forecast request and decode the body leniently
    async fn request(&self, selectors: &[(&'static str, &str)]) -> Result<ApiResponse, WeatherError> {
        let url = self.forecast_url();
        let query = self.build_query(selectors);

        debug!(url = %url, ?query, "Requesting forecast");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        Ok(ApiResponse::from_body(&body).unwrap_or_else(|e| {
            warn!(error = %e, "Forecast body is not a JSON object, treating it as empty");
            ApiResponse::default()
        }))
    }

    /// Zip hourly timestamps with temperatures, dropping entries without a
    /// timestamp or a numeric reading
    fn parse_hourly(hourly: Option<HourlyData>) -> Vec<HourlyPoint> {
        let Some(hourly) = hourly else {
            return Vec::new();
        };

        hourly
            .time
            .into_iter()
            .zip(hourly.temperature_2m)
            .filter_map(|(time, temperature)| {
                let temperature = temperature.filter(|t| !t.is_nan())?;
                Some(HourlyPoint {
                    time: time?,
                    temperature,
                })
            })
            .collect()
    }

    /// Precipitation probability at the hour matching `time`, else the first hour
    fn precipitation_at(time: Option<&str>, hourly: &HourlyData) -> Option<f64> {
        let index = time
            .and_then(|time| hourly.time.iter().position(|hour| hour.as_deref() == Some(time)))
            .unwrap_or(0);

        value_at(&hourly.precipitation_probability, index)
    }

    fn parse_current(current: Option<CurrentData>, hourly: Option<HourlyData>) -> CurrentSnapshot {
        let current = current.unwrap_or_default();
        let hourly = hourly.unwrap_or_default();
        let precipitation_chance = Self::precipitation_at(current.time.as_deref(), &hourly);

        CurrentSnapshot {
            weather_code: current.code(),
            wind_speed: current.wind_speed(),
            humidity: current.humidity(),
            temperature: current.temperature_2m,
            apparent_temperature: current.apparent_temperature,
            time: current.time,
            precipitation_chance,
        }
    }

    /// One record per daily timestamp; values are index-aligned, never filtered
    fn parse_daily(daily: Option<DailyData>) -> Vec<DailyPoint> {
        let Some(daily) = daily else {
            return Vec::new();
        };

        daily
            .time
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailyPoint {
                date,
                max_temp: value_at(&daily.temperature_2m_max, i),
                min_temp: value_at(&daily.temperature_2m_min, i),
                weather_code: value_at(&daily.weathercode, i)
                    .or_else(|| value_at(&daily.weather_code, i)),
                precipitation_chance: value_at(&daily.precipitation_probability_max, i),
                wind_speed: value_at(&daily.windspeed_10m_max, i)
                    .or_else(|| value_at(&daily.wind_speed_10m_max, i)),
            })
            .collect()
    }
}

fn value_at<T: Copy>(series: &[Option<T>], index: usize) -> Option<T> {
    series.get(index).copied().flatten()
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn fetch_hourly(&self) -> Result<Vec<HourlyPoint>, WeatherError> {
        let response = self
            .request(&[("hourly", HOURLY_TEMPERATURE_FIELDS)])
            .await?;

        let points = Self::parse_hourly(response.hourly);
        debug!(count = points.len(), "Parsed hourly temperatures");
        Ok(points)
    }

    #[instrument(skip(self))]
    async fn fetch_current(&self) -> Result<CurrentSnapshot, WeatherError> {
        let response = self
            .request(&[
                ("current", CURRENT_FIELDS),
                ("hourly", HOURLY_PRECIPITATION_FIELDS),
            ])
            .await?;

        if response.current.is_none() {
            warn!("No current block in forecast response");
        }

        Ok(Self::parse_current(response.current, response.hourly))
    }

    #[instrument(skip(self))]
    async fn fetch_daily(&self) -> Result<Vec<DailyPoint>, WeatherError> {
        let response = self.request(&[("daily", DAILY_FIELDS)]).await?;

        let points = Self::parse_daily(response.daily);
        debug!(count = points.len(), "Parsed daily forecast");
        Ok(points)
    }

    async fn is_healthy(&self) -> bool {
        self.fetch_current().await.is_ok()
    }
}
