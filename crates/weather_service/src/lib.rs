//! Open-Meteo forecast client
//!
//! Client for the Open-Meteo Weather API (<https://open-meteo.com>).
//! Fetches hourly temperatures, daily aggregates and current conditions for a
//! fixed location and reshapes them into small, caller-friendly types.
//!
//! Decoding is lenient: missing or mismatched fields in the response become
//! empty series or `None` values. Only transport failures and non-success
//! HTTP statuses are reported as errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use weather_service::{OpenMeteoClient, WeatherClient, WeatherConfig, describe_weather};
//!
//! let client = OpenMeteoClient::new(WeatherConfig::default())?;
//! let current = client.fetch_current().await?;
//! let descriptor = describe_weather(current.weather_code);
//! println!("{} ({})", descriptor.label, descriptor.icon);
//! ```

mod client;
mod config;
mod error;
mod models;
mod service;

pub use client::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, OpenMeteoClient, WeatherClient};
pub use config::WeatherConfig;
pub use error::WeatherError;
pub use models::{
    CurrentSnapshot, DailyPoint, HourlyPoint, WeatherCondition, WeatherDescriptor, WeatherIcon,
    describe_weather,
};
pub use service::{WeatherOverview, WeatherService};
