//! Combined weather view
//!
//! Runs the three forecast requests side by side for callers that render
//! everything at once, e.g. a dashboard.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::WeatherClient;
use crate::error::WeatherError;
use crate::models::{CurrentSnapshot, DailyPoint, HourlyPoint};

/// Current conditions together with the hourly and daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverview {
    pub current: CurrentSnapshot,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

impl WeatherOverview {
    /// Today's forecast
    #[must_use]
    pub fn today(&self) -> Option<&DailyPoint> {
        self.daily.first()
    }

    /// The next `n` hourly readings
    #[must_use]
    pub fn next_hours(&self, n: usize) -> &[HourlyPoint] {
        let end = n.min(self.hourly.len());
        &self.hourly[..end]
    }
}

/// Service that fetches a full [`WeatherOverview`]
pub struct WeatherService {
    client: Arc<dyn WeatherClient>,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService").finish_non_exhaustive()
    }
}

impl WeatherService {
    /// Create a service on top of any [`WeatherClient`] implementation
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Fetch current conditions, hourly and daily series concurrently
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any of the three requests.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<WeatherOverview, WeatherError> {
        let (current, hourly, daily) = tokio::try_join!(
            self.client.fetch_current(),
            self.client.fetch_hourly(),
            self.client.fetch_daily(),
        )?;

        debug!(
            hourly = hourly.len(),
            daily = daily.len(),
            "Fetched weather overview"
        );

        Ok(WeatherOverview {
            current,
            hourly,
            daily,
        })
    }
}
