//! Weather data models
//!
//! Output shapes handed to callers, the weather code classification, and the
//! raw Open-Meteo response types they are built from.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Icon name for a weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    Rainy,
    Cloudy,
    PartlySunny,
    Sunny,
    Thunderstorm,
}

impl WeatherIcon {
    /// Icon identifier as used by icon sets (`partly-sunny`, ...)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rainy => "rainy",
            Self::Cloudy => "cloudy",
            Self::PartlySunny => "partly-sunny",
            Self::Sunny => "sunny",
            Self::Thunderstorm => "thunderstorm",
        }
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse weather condition derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear sky (WMO 0)
    Sunny,
    /// Mainly clear, partly cloudy (WMO 1, 2)
    PartlyCloudy,
    /// Overcast, and any code without a dedicated bucket
    Cloudy,
    /// Fog and depositing rime fog (WMO 45, 48)
    Foggy,
    /// Drizzle, rain and rain showers
    Rainy,
    /// Freezing rain, snow fall, snow grains and snow showers
    Snowy,
    /// Thunderstorm, with or without hail (WMO 95, 96, 99)
    Thunder,
    /// No code reported
    Unknown,
}

impl WeatherCondition {
    /// Classify a WMO weather code
    ///
    /// See: <https://open-meteo.com/en/docs> for the code reference.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Sunny,
            1 | 2 => Self::PartlyCloudy,
            45 | 48 => Self::Foggy,
            51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 80..=82 => Self::Rainy,
            66 | 67 | 71 | 73 | 75 | 77 | 85 | 86 => Self::Snowy,
            95 | 96 | 99 => Self::Thunder,
            _ => Self::Cloudy,
        }
    }

    /// Classify an optional code; `None` is [`WeatherCondition::Unknown`]
    #[must_use]
    pub const fn from_optional_code(code: Option<i32>) -> Self {
        match code {
            Some(code) => Self::from_code(code),
            None => Self::Unknown,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Foggy => "Foggy",
            Self::Rainy => "Rainy",
            Self::Snowy => "Snowy",
            Self::Thunder => "Thunder",
            Self::Unknown => "Unknown",
        }
    }

    /// Icon for the condition
    #[must_use]
    pub const fn icon(&self) -> WeatherIcon {
        match self {
            Self::Sunny => WeatherIcon::Sunny,
            Self::PartlyCloudy => WeatherIcon::PartlySunny,
            Self::Cloudy | Self::Foggy | Self::Unknown => WeatherIcon::Cloudy,
            Self::Rainy | Self::Snowy => WeatherIcon::Rainy,
            Self::Thunder => WeatherIcon::Thunderstorm,
        }
    }

    /// Label and icon pair
    #[must_use]
    pub const fn descriptor(&self) -> WeatherDescriptor {
        WeatherDescriptor {
            label: self.label(),
            icon: self.icon(),
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label and icon describing a weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherDescriptor {
    pub label: &'static str,
    pub icon: WeatherIcon,
}

/// Map a weather code to a simple label and icon
///
/// Missing codes are `Unknown`/`cloudy`; unmapped codes are `Cloudy`/`cloudy`.
#[must_use]
pub const fn describe_weather(code: Option<i32>) -> WeatherDescriptor {
    WeatherCondition::from_optional_code(code).descriptor()
}

/// Parse an Open-Meteo local timestamp (`2026-02-05T14:00`, seconds optional)
fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// One hourly temperature reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Local timestamp as reported by the API
    pub time: String,
    /// Temperature at 2 m in Celsius
    pub temperature: f64,
}

impl HourlyPoint {
    /// Timestamp parsed as local date-time, if well-formed
    #[must_use]
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        parse_local_time(&self.time)
    }
}

/// One day of the forecast window
///
/// Values are index-aligned with `date` and not filtered, so any of them may
/// be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Forecast date (`YYYY-MM-DD`); `None` when the API sent a non-string entry
    pub date: Option<String>,
    /// Maximum temperature in Celsius
    pub max_temp: Option<f64>,
    /// Minimum temperature in Celsius
    pub min_temp: Option<f64>,
    /// WMO weather code
    pub weather_code: Option<i32>,
    /// Maximum precipitation probability percentage
    pub precipitation_chance: Option<f64>,
    /// Maximum wind speed in km/h
    pub wind_speed: Option<f64>,
}

impl DailyPoint {
    /// Date parsed as a calendar date, if well-formed
    #[must_use]
    pub fn naive_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }

    /// Label and icon for the day's weather code
    #[must_use]
    pub const fn descriptor(&self) -> WeatherDescriptor {
        describe_weather(self.weather_code)
    }
}

/// Current conditions
///
/// Every field is optional; absent values in the response stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    /// Local observation time as reported by the API
    pub time: Option<String>,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Apparent (feels like) temperature in Celsius
    pub apparent_temperature: Option<f64>,
    /// WMO weather code
    pub weather_code: Option<i32>,
    /// Wind speed at 10 m in km/h
    pub wind_speed: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Precipitation probability for the current hour
    pub precipitation_chance: Option<f64>,
}

impl CurrentSnapshot {
    /// Observation time parsed as local date-time, if present and well-formed
    #[must_use]
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        self.time.as_deref().and_then(parse_local_time)
    }

    /// Label and icon for the current weather code
    #[must_use]
    pub const fn descriptor(&self) -> WeatherDescriptor {
        describe_weather(self.weather_code)
    }

    /// One-line summary of the known values
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![self.descriptor().label.to_string()];
        if let Some(t) = self.temperature {
            parts.push(format!("{t:.1}°C"));
        }
        if let Some(t) = self.apparent_temperature {
            parts.push(format!("feels like {t:.1}°C"));
        }
        if let Some(h) = self.humidity {
            parts.push(format!("humidity {h:.0}%"));
        }
        if let Some(w) = self.wind_speed {
            parts.push(format!("wind {w:.1} km/h"));
        }
        if let Some(p) = self.precipitation_chance {
            parts.push(format!("rain {p:.0}%"));
        }
        parts.join(", ")
    }
}

// ============================================================================
// Raw API response
// ============================================================================

/// Decode any JSON value into `T`, falling back to `T::default()` on mismatch
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a JSON array element-wise; elements of the wrong type become `None`
fn lenient_series<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Weather code from a JSON number; integral floats such as `3.0` are accepted
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn code_from_value(value: &Value) -> Option<i32> {
    if let Some(code) = value.as_i64() {
        return i32::try_from(code).ok();
    }
    value
        .as_f64()
        .filter(|code| code.fract() == 0.0)
        .filter(|code| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(code))
        .map(|code| code as i32)
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(code_from_value(&value))
}

fn lenient_code_series<'de, D>(deserializer: D) -> Result<Vec<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().map(code_from_value).collect(),
        _ => Vec::new(),
    })
}

// Legacy (`weathercode`) and current (`weather_code`) key names are decoded
// into separate fields so a response carrying both never fails the block.

/// Raw hourly block
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct HourlyData {
    #[serde(default, deserialize_with = "lenient_series")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub precipitation_probability: Vec<Option<f64>>,
}

/// Raw daily block
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DailyData {
    #[serde(default, deserialize_with = "lenient_series")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_code_series")]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default, deserialize_with = "lenient_code_series")]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub windspeed_10m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub wind_speed_10m_max: Vec<Option<f64>>,
}

/// Raw current block
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CurrentData {
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub apparent_temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub weathercode: Option<i32>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub weather_code: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub relativehumidity_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub windspeed_10m: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed_10m: Option<f64>,
}

impl CurrentData {
    pub(crate) fn code(&self) -> Option<i32> {
        self.weathercode.or(self.weather_code)
    }

    pub(crate) fn humidity(&self) -> Option<f64> {
        self.relativehumidity_2m.or(self.relative_humidity_2m)
    }

    pub(crate) fn wind_speed(&self) -> Option<f64> {
        self.windspeed_10m.or(self.wind_speed_10m)
    }
}

/// Raw API response
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub hourly: Option<HourlyData>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily: Option<DailyData>,
    #[serde(default, deserialize_with = "lenient")]
    pub current: Option<CurrentData>,
}

impl ApiResponse {
    /// Decode a response body
    ///
    /// Fails only when the body is not a JSON object; nested blocks and
    /// series of the wrong shape decode as absent.
    pub(crate) fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_sunny() {
        let d = describe_weather(Some(0));
        assert_eq!(d.label, "Sunny");
        assert_eq!(d.icon, WeatherIcon::Sunny);
    }

    #[test]
    fn test_describe_partly_cloudy() {
        for code in [1, 2] {
            let d = describe_weather(Some(code));
            assert_eq!(d.label, "Partly Cloudy");
            assert_eq!(d.icon, WeatherIcon::PartlySunny);
        }
    }

    #[test]
    fn test_describe_missing_code() {
        let d = describe_weather(None);
        assert_eq!(d.label, "Unknown");
        assert_eq!(d.icon, WeatherIcon::Cloudy);
    }

    #[test]
    fn test_describe_unmapped_code() {
        for code in [4, 50, 100, 999, -1] {
            let d = describe_weather(Some(code));
            assert_eq!(d.label, "Cloudy", "code {code}");
            assert_eq!(d.icon, WeatherIcon::Cloudy, "code {code}");
        }
    }

    #[test]
    fn test_describe_full_table() {
        let table: &[(&[i32], &str, WeatherIcon)] = &[
            (&[3], "Cloudy", WeatherIcon::Cloudy),
            (&[45, 48], "Foggy", WeatherIcon::Cloudy),
            (
                &[51, 53, 55, 56, 57, 61, 63, 65, 80, 81, 82],
                "Rainy",
                WeatherIcon::Rainy,
            ),
            (
                &[66, 67, 71, 73, 75, 77, 85, 86],
                "Snowy",
                WeatherIcon::Rainy,
            ),
            (&[95, 96, 99], "Thunder", WeatherIcon::Thunderstorm),
        ];

        for (codes, label, icon) in table {
            for &code in *codes {
                let d = describe_weather(Some(code));
                assert_eq!(d.label, *label, "code {code}");
                assert_eq!(d.icon, *icon, "code {code}");
            }
        }
    }

    #[test]
    fn test_codes_between_buckets_fall_back_to_cloudy() {
        assert_eq!(WeatherCondition::from_code(52), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_code(79), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_code(83), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_code(97), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_icon_serializes_kebab_case() {
        let json = serde_json::to_string(&WeatherIcon::PartlySunny).expect("serialize");
        assert_eq!(json, "\"partly-sunny\"");
        assert_eq!(WeatherIcon::Thunderstorm.to_string(), "thunderstorm");
    }

    #[test]
    fn test_descriptor_serialization() {
        let json = serde_json::to_value(describe_weather(Some(95))).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "label": "Thunder", "icon": "thunderstorm" })
        );
    }

    #[test]
    fn test_condition_display() {
        assert_eq!(WeatherCondition::PartlyCloudy.to_string(), "Partly Cloudy");
        assert_eq!(WeatherCondition::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_hourly_local_time() {
        let point = HourlyPoint {
            time: "2026-02-05T14:00".to_string(),
            temperature: 27.5,
        };
        let dt = point.local_time().expect("should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2026-02-05 14:00");

        let point = HourlyPoint {
            time: "2026-02-05T14:00:30".to_string(),
            temperature: 27.5,
        };
        assert!(point.local_time().is_some());

        let point = HourlyPoint {
            time: "not a time".to_string(),
            temperature: 27.5,
        };
        assert!(point.local_time().is_none());
    }

    #[test]
    fn test_daily_naive_date() {
        let point = DailyPoint {
            date: Some("2026-02-05".to_string()),
            max_temp: None,
            min_temp: None,
            weather_code: Some(61),
            precipitation_chance: None,
            wind_speed: None,
        };
        assert_eq!(
            point.naive_date(),
            NaiveDate::from_ymd_opt(2026, 2, 5)
        );
        assert_eq!(point.descriptor().label, "Rainy");
    }

    #[test]
    fn test_current_summary() {
        let snapshot = CurrentSnapshot {
            time: Some("2026-02-05T14:00".to_string()),
            temperature: Some(31.2),
            apparent_temperature: Some(35.0),
            weather_code: Some(2),
            wind_speed: Some(9.4),
            humidity: Some(70.0),
            precipitation_chance: Some(40.0),
        };
        assert_eq!(
            snapshot.summary(),
            "Partly Cloudy, 31.2°C, feels like 35.0°C, humidity 70%, wind 9.4 km/h, rain 40%"
        );
    }

    #[test]
    fn test_current_summary_empty() {
        assert_eq!(CurrentSnapshot::default().summary(), "Unknown");
        assert!(CurrentSnapshot::default().local_time().is_none());
    }

    #[test]
    fn test_raw_response_missing_blocks() {
        let raw = ApiResponse::from_body("{}").expect("should decode");
        assert!(raw.hourly.is_none());
        assert!(raw.daily.is_none());
        assert!(raw.current.is_none());
    }

    #[test]
    fn test_raw_hourly_mismatched_elements() {
        let raw = ApiResponse::from_body(
            r#"{"hourly": {"time": ["t1", "t2", "t3"], "temperature_2m": [20.5, null, "hot"]}}"#,
        )
        .expect("should decode");
        let hourly = raw.hourly.expect("hourly block");
        assert_eq!(
            hourly.time,
            vec![Some("t1".to_string()), Some("t2".to_string()), Some("t3".to_string())]
        );
        assert_eq!(hourly.temperature_2m, vec![Some(20.5), None, None]);
        assert!(hourly.precipitation_probability.is_empty());
    }

    #[test]
    fn test_raw_block_of_wrong_type() {
        let raw = ApiResponse::from_body(r#"{"hourly": [1, 2], "current": "now", "daily": null}"#)
            .expect("should decode");
        assert!(raw.hourly.is_none());
        assert!(raw.current.is_none());
        assert!(raw.daily.is_none());
    }

    #[test]
    fn test_raw_series_of_wrong_type() {
        let raw = ApiResponse::from_body(r#"{"daily": {"time": "2026-02-05", "weathercode": 3}}"#)
            .expect("should decode");
        let daily = raw.daily.expect("daily block");
        assert!(daily.time.is_empty());
        assert!(daily.weathercode.is_empty());
    }

    #[test]
    fn test_raw_current_accepts_new_field_names() {
        let raw = ApiResponse::from_body(
            r#"{"current": {"time": "2026-02-05T14:00", "weather_code": 61,
                "relative_humidity_2m": 88, "wind_speed_10m": 4.2}}"#,
        )
        .expect("should decode");
        let current = raw.current.expect("current block");
        assert_eq!(current.code(), Some(61));
        assert_eq!(current.humidity(), Some(88.0));
        assert_eq!(current.wind_speed(), Some(4.2));
        assert!(current.temperature_2m.is_none());
    }

    #[test]
    fn test_raw_current_with_legacy_and_new_keys() {
        let raw = ApiResponse::from_body(
            r#"{"current": {"time": "t1", "temperature_2m": 30.0,
                "weathercode": 3, "weather_code": 3,
                "windspeed_10m": 5.0, "wind_speed_10m": 6.0}}"#,
        )
        .expect("should decode");
        let current = raw.current.expect("current block kept");
        assert_eq!(current.time.as_deref(), Some("t1"));
        assert_eq!(current.temperature_2m, Some(30.0));
        assert_eq!(current.code(), Some(3));
        assert_eq!(current.wind_speed(), Some(5.0));
    }

    #[test]
    fn test_raw_time_series_keeps_non_string_slots() {
        let raw = ApiResponse::from_body(
            r#"{"hourly": {"time": ["t1", null, "t3"], "temperature_2m": [20, 21, 22]},
                "daily": {"time": ["d1", 7]}}"#,
        )
        .expect("should decode");
        let hourly = raw.hourly.expect("hourly block");
        assert_eq!(hourly.time, vec![Some("t1".to_string()), None, Some("t3".to_string())]);
        let daily = raw.daily.expect("daily block");
        assert_eq!(daily.time, vec![Some("d1".to_string()), None]);
    }

    #[test]
    fn test_raw_codes_accept_integral_floats() {
        let raw = ApiResponse::from_body(
            r#"{"current": {"weathercode": 3.0},
                "daily": {"time": ["d1", "d2", "d3"], "weathercode": [61.0, 2.5, "3"]}}"#,
        )
        .expect("should decode");
        assert_eq!(raw.current.expect("current block").code(), Some(3));
        assert_eq!(
            raw.daily.expect("daily block").weathercode,
            vec![Some(61), None, None]
        );
    }

    #[test]
    fn test_raw_response_not_an_object() {
        assert!(ApiResponse::from_body("42").is_err());
        assert!(ApiResponse::from_body("\"forecast\"").is_err());
        assert!(ApiResponse::from_body("not json").is_err());
    }
}
