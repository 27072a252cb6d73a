/// KMA (Korea Meteorological Administration) short-term forecast client
///
/// Retrieves the ultra-short-term forecast (초단기예보) for each canonical
/// region's grid point and reduces it to one `WeatherReading` for the
/// requested hour.
///
/// API documentation: https://www.data.go.kr/data/15084084/openapi.do
///
/// A forecast issued at base time B covers the following hours. When the
/// requested base time has not been published yet (or the call fails), the
/// client walks the base time back one hour at a time, up to the configured
/// retry limit.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::KmaSettings;
use crate::ingest::lenient_text;
use crate::logging::{self, DataSource};
use crate::model::{
    WeatherReading, WxError, CATEGORY_HUMIDITY, CATEGORY_RAIN, CATEGORY_TEMPERATURE,
    CATEGORY_WIND,
};
use crate::regions::{CanonicalRegion, RegionConfig};
use crate::snapshot::WeatherSnapshot;

/// Default endpoint for the ultra-short-term forecast.
pub const KMA_FORECAST_URL: &str =
    "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtFcst";

/// Korea Standard Time, UTC+9.
const KST_OFFSET_SECS: i64 = 9 * 3600;

/// Literal the API uses for "no precipitation".
const NO_RAIN: &str = "강수없음";

// ============================================================================
// KMA API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct KmaEnvelope {
    response: KmaResponse,
}

#[derive(Debug, Deserialize)]
struct KmaResponse {
    #[serde(default)]
    body: Option<KmaBody>,
}

#[derive(Debug, Deserialize)]
struct KmaBody {
    #[serde(default)]
    items: Option<KmaItems>,
}

#[derive(Debug, Deserialize)]
struct KmaItems {
    #[serde(default)]
    item: Vec<KmaItem>,
}

/// One category value for one forecast hour.
#[derive(Debug, Deserialize)]
struct KmaItem {
    category: String,
    #[serde(rename = "fcstDate")]
    fcst_date: String, // YYYYMMDD
    #[serde(rename = "fcstTime")]
    fcst_time: String, // HHMM
    #[serde(default, rename = "fcstValue", deserialize_with = "lenient_text")]
    fcst_value: Option<String>,
}

/// Forecast values for a single hour, as extracted from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedForecast {
    pub forecast_at: NaiveDateTime,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub rain_mm: Option<f64>,
    pub wind_ms: Option<f64>,
}

impl ParsedForecast {
    /// Categories the response did not carry read as 0.
    pub fn into_reading(self) -> WeatherReading {
        WeatherReading {
            temperature_c: self.temperature_c.unwrap_or(0.0),
            humidity_pct: self.humidity_pct.unwrap_or(0.0),
            rain_mm: self.rain_mm.unwrap_or(0.0),
            wind_ms: self.wind_ms.unwrap_or(0.0),
            observed_at: self.forecast_at,
        }
    }
}

// ============================================================================
// Time helpers
// ============================================================================

/// Current wall-clock time in Korea.
pub fn kst_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::seconds(KST_OFFSET_SECS)
}

/// The observation hour to query: `hour` on `now`'s date, or `now`
/// truncated to the hour when no hour is requested.
pub fn target_hour(now: NaiveDateTime, hour: Option<u32>) -> Result<NaiveDateTime, WxError> {
    let hour = hour.unwrap_or_else(|| now.hour());
    now.date()
        .and_hms_opt(hour, 0, 0)
        .ok_or(WxError::InvalidHour(hour))
}

/// `HH00` string the API uses for `fcstTime`.
pub fn fcst_time_str(target: NaiveDateTime) -> String {
    target.format("%H00").to_string()
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a precipitation value.
///
/// The API reports "강수없음" for none, "1.0mm" for light amounts,
/// "30.0~50.0mm" for a band (lower bound taken), and "50.0mm 이상" for
/// the open-ended top band. Anything else reads as 0.
pub fn parse_rain_mm(text: &str) -> f64 {
    let text = text.trim();
    if text == NO_RAIN || text.is_empty() {
        return 0.0;
    }
    let lower = text.split('~').next().unwrap_or(text);
    let numeric: String = lower
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts the forecast for `fcst_time` (`HH00`) from a response body.
///
/// Returns `Ok(None)` when the response carries no item for that hour,
/// including error envelopes with no body.
pub fn parse_forecast_response(
    json: &str,
    fcst_time: &str,
) -> Result<Option<ParsedForecast>, WxError> {
    let envelope: KmaEnvelope = serde_json::from_str(json)?;
    let items = envelope
        .response
        .body
        .and_then(|b| b.items)
        .map(|i| i.item)
        .unwrap_or_default();

    let mut parsed: Option<ParsedForecast> = None;
    for item in items.iter().filter(|i| i.fcst_time == fcst_time) {
        if parsed.is_none() {
            let date = NaiveDate::parse_from_str(&item.fcst_date, "%Y%m%d")
                .map_err(|e| WxError::ParseError(format!("fcstDate '{}': {}", item.fcst_date, e)))?;
            let time = NaiveTime::parse_from_str(&item.fcst_time, "%H%M")
                .map_err(|e| WxError::ParseError(format!("fcstTime '{}': {}", item.fcst_time, e)))?;
            parsed = Some(ParsedForecast {
                forecast_at: date.and_time(time),
                temperature_c: None,
                humidity_pct: None,
                rain_mm: None,
                wind_ms: None,
            });
        }
        let Some(forecast) = parsed.as_mut() else {
            continue;
        };

        let value = item.fcst_value.as_deref();
        match item.category.as_str() {
            CATEGORY_TEMPERATURE => forecast.temperature_c = value.and_then(parse_number),
            CATEGORY_HUMIDITY => forecast.humidity_pct = value.and_then(parse_number),
            CATEGORY_RAIN => forecast.rain_mm = Some(value.map(parse_rain_mm).unwrap_or(0.0)),
            CATEGORY_WIND => forecast.wind_ms = value.and_then(parse_number),
            _ => {}
        }
    }

    Ok(parsed)
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the forecast request URL for a grid point and base time.
pub fn build_forecast_url(
    base_url: &str,
    service_key: &str,
    base: NaiveDateTime,
    nx: u32,
    ny: u32,
) -> String {
    format!(
        "{}?serviceKey={}&pageNo=1&numOfRows=1000&dataType=JSON&base_date={}&base_time={}&nx={}&ny={}",
        base_url,
        service_key,
        base.format("%Y%m%d"),
        base.format("%H%M"),
        nx,
        ny
    )
}

/// One request for one base time.
fn fetch_once(
    client: &reqwest::blocking::Client,
    settings: &KmaSettings,
    service_key: &str,
    region: &CanonicalRegion,
    base: NaiveDateTime,
    fcst_time: &str,
) -> Result<Option<ParsedForecast>, WxError> {
    let url = build_forecast_url(&settings.base_url, service_key, base, region.nx, region.ny);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| WxError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(WxError::HttpError(response.status().as_u16()));
    }

    let text = response.text().map_err(|e| WxError::Request(e.to_string()))?;
    parse_forecast_response(&text, fcst_time)
}

/// Base times tried for `target`, newest first: `target` itself, then one
/// hour earlier per attempt, crossing midnight into the previous day.
pub fn base_times(target: NaiveDateTime, max_retries: u32) -> impl Iterator<Item = NaiveDateTime> {
    (0..max_retries).map(move |attempt| target - Duration::hours(i64::from(attempt)))
}

/// Runs `fetch` once per base time until it yields a forecast.
///
/// Both an empty answer (`Ok(None)`) and a failed call step back one hour.
/// Once `max_retries` base times are used up the region has no data.
pub fn walk_back<F>(
    region: &str,
    target: NaiveDateTime,
    max_retries: u32,
    mut fetch: F,
) -> Result<WeatherReading, WxError>
where
    F: FnMut(NaiveDateTime) -> Result<Option<ParsedForecast>, WxError>,
{
    for base in base_times(target, max_retries) {
        match fetch(base) {
            Ok(Some(forecast)) => return Ok(forecast.into_reading()),
            Ok(None) => logging::debug(
                DataSource::Kma,
                Some(region),
                &format!(
                    "no {} forecast in base time {}, stepping back",
                    fcst_time_str(target),
                    base.format("%Y%m%d %H%M")
                ),
            ),
            Err(e) => logging::log_fetch_failure(
                DataSource::Kma,
                region,
                &format!("base time {}", base.format("%Y%m%d %H%M")),
                &e,
            ),
        }
    }

    Err(WxError::NoDataAvailable(region.to_string()))
}

/// Fetches the forecast for `target` at a region's grid point, walking the
/// base time back while the call fails or has nothing for the target hour.
pub fn fetch_region(
    client: &reqwest::blocking::Client,
    settings: &KmaSettings,
    region: &CanonicalRegion,
    target: NaiveDateTime,
) -> Result<WeatherReading, WxError> {
    let service_key = settings
        .service_key
        .as_deref()
        .ok_or_else(|| WxError::Config("KMA service key is not set".to_string()))?;
    let fcst_time = fcst_time_str(target);

    walk_back(&region.name, target, settings.max_retries, |base| {
        fetch_once(client, settings, service_key, region, base, &fcst_time)
    })
}

/// Fetches every region and assembles the snapshot for `target`.
/// Regions that fail all retries fall back to the snapshot's sentinel.
pub fn fetch_snapshot(
    client: &reqwest::blocking::Client,
    settings: &KmaSettings,
    config: &RegionConfig,
    target: NaiveDateTime,
) -> Result<WeatherSnapshot, WxError> {
    if settings.service_key.is_none() {
        return Err(WxError::Config("KMA service key is not set".to_string()));
    }

    let mut readings = HashMap::new();
    let mut failed = 0usize;
    for region in config.regions() {
        match fetch_region(client, settings, region, target) {
            Ok(reading) => {
                readings.insert(region.name.clone(), reading);
            }
            Err(e) => {
                failed += 1;
                logging::warn(
                    DataSource::Kma,
                    Some(&region.name),
                    &format!("{}, falling back to sentinel", e),
                );
            }
        }
    }

    logging::log_fetch_summary(DataSource::Kma, config.regions().len(), readings.len(), failed);
    Ok(WeatherSnapshot::from_readings(config, readings, target))
}

// ============================================================================
// Tests
// ============================================================================
