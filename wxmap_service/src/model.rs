/// Core data types for the regional weather map service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond trivial derivations, no I/O, and no external
/// dependencies apart from chrono timestamps.

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// KMA forecast categories
// ---------------------------------------------------------------------------

/// KMA category code for air temperature, in °C.
pub const CATEGORY_TEMPERATURE: &str = "T1H";

/// KMA category code for relative humidity, in percent.
pub const CATEGORY_HUMIDITY: &str = "REH";

/// KMA category code for one-hour precipitation, in mm.
pub const CATEGORY_RAIN: &str = "RN1";

/// KMA category code for wind speed, in m/s.
pub const CATEGORY_WIND: &str = "WSD";

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One region's weather at a given observation hour.
///
/// A fresh set of readings replaces the previous one wholesale whenever the
/// data source is polled or the user picks another hour.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rain_mm: f64,
    pub wind_ms: f64,
    pub observed_at: NaiveDateTime,
}

impl WeatherReading {
    /// Placeholder used for a region the data source did not report, so the
    /// snapshot stays total over the canonical region list.
    pub fn sentinel(observed_at: NaiveDateTime) -> Self {
        Self {
            temperature_c: 0.0,
            humidity_pct: 0.0,
            rain_mm: 0.0,
            wind_ms: 0.0,
            observed_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Range type
// ---------------------------------------------------------------------------

/// Minimum and maximum temperature across one snapshot, in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    /// Computes the range over every value. An empty input yields `{0, 0}`.
    /// Non-finite values are skipped.
    pub fn from_temperatures<I>(temperatures: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut range: Option<TemperatureRange> = None;
        for t in temperatures.into_iter().filter(|t| t.is_finite()) {
            range = Some(match range {
                None => TemperatureRange { min: t, max: t },
                Some(r) => TemperatureRange {
                    min: r.min.min(t),
                    max: r.max.max(t),
                },
            });
        }
        range.unwrap_or(TemperatureRange { min: 0.0, max: 0.0 })
    }

    /// True when every region reported the same temperature.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when configuring the service or fetching data.
///
/// The resolver and color mapper never produce these; unmatched names and
/// degenerate ranges are ordinary outcomes, not failures.
#[derive(Debug, PartialEq)]
pub enum WxError {
    /// Non-2xx HTTP response from the forecast API.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    Request(String),
    /// A response body or data file could not be deserialized.
    ParseError(String),
    /// Every retry for the region came back without a usable forecast.
    NoDataAvailable(String),
    /// Requested observation hour outside 0-23.
    InvalidHour(u32),
    /// Region table or service configuration is invalid.
    Config(String),
    /// A configuration or data file could not be read.
    Io(String),
}

impl std::fmt::Display for WxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WxError::HttpError(code) => write!(f, "HTTP error: {}", code),
            WxError::Request(msg) => write!(f, "Request failed: {}", msg),
            WxError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            WxError::NoDataAvailable(region) => {
                write!(f, "No data available for region: {}", region)
            }
            WxError::InvalidHour(hour) => write!(f, "Invalid hour {} (expected 0-23)", hour),
            WxError::Config(msg) => write!(f, "Configuration error: {}", msg),
            WxError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for WxError {}

impl From<std::io::Error> for WxError {
    fn from(err: std::io::Error) -> Self {
        WxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WxError {
    fn from(err: serde_json::Error) -> Self {
        WxError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for WxError {
    fn from(err: toml::de::Error) -> Self {
        WxError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_over_three_regions() {
        let range = TemperatureRange::from_temperatures([0.0, 10.0, 20.0]);
        assert_eq!(range, TemperatureRange { min: 0.0, max: 20.0 });
        assert!(!range.is_degenerate());
    }

    #[test]
    fn test_range_of_single_value_is_degenerate() {
        let range = TemperatureRange::from_temperatures([7.5]);
        assert_eq!(range.min, 7.5);
        assert_eq!(range.max, 7.5);
        assert!(range.is_degenerate());
    }

    #[test]
    fn test_empty_range_defaults_to_zero() {
        let range = TemperatureRange::from_temperatures(Vec::new());
        assert_eq!(range, TemperatureRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_range_skips_nan() {
        let range = TemperatureRange::from_temperatures([f64::NAN, -3.0, 4.0]);
        assert_eq!(range, TemperatureRange { min: -3.0, max: 4.0 });
    }

    #[test]
    fn test_error_display_messages() {
        assert_eq!(WxError::HttpError(500).to_string(), "HTTP error: 500");
        assert_eq!(
            WxError::NoDataAvailable("경기도".to_string()).to_string(),
            "No data available for region: 경기도"
        );
        assert_eq!(
            WxError::InvalidHour(24).to_string(),
            "Invalid hour 24 (expected 0-23)"
        );
    }
}
