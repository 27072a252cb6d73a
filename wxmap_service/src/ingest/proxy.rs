/// Parser for the dashboard's `/api/weather/all` payload.
///
/// The back-end answers with one object per region, fields normally strings:
///
/// ```json
/// { "서울특별시": { "tmp": "3.1", "hum": "45", "rain": "강수없음",
///                 "wind": "1.8", "baseTime": "1400" } }
/// ```
///
/// Values are cosmetic inputs, so numbers that fail to parse become 0 and a
/// malformed `baseTime` falls back to the supplied date's midnight hour.
/// Bare JSON numbers are accepted wherever a string is expected. A region
/// whose entry is not an object is skipped; the other regions still load.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;

use crate::ingest::kma::parse_rain_mm;
use crate::ingest::lenient_text;
use crate::logging::{self, DataSource};
use crate::model::{WeatherReading, WxError};

#[derive(Debug, Deserialize)]
struct RegionPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    tmp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    hum: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    rain: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    wind: Option<String>,
    #[serde(default, rename = "baseTime", deserialize_with = "lenient_text")]
    base_time: Option<String>,
}

fn number_or_zero(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn observed_at(date: NaiveDate, base_time: Option<&str>) -> NaiveDateTime {
    let time = base_time
        .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H%M").ok())
        .unwrap_or_default();
    date.and_time(time)
}

/// Parses the payload into readings keyed by region name.
pub fn parse_weather_all(
    json: &str,
    date: NaiveDate,
) -> Result<HashMap<String, WeatherReading>, WxError> {
    let payload: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

    let mut readings = HashMap::with_capacity(payload.len());
    for (region, value) in payload {
        let p: RegionPayload = match serde_json::from_value(value) {
            Ok(p) => p,
            Err(e) => {
                logging::warn(
                    DataSource::Proxy,
                    Some(&region),
                    &format!("entry skipped: {}", e),
                );
                continue;
            }
        };
        let reading = WeatherReading {
            temperature_c: number_or_zero(p.tmp.as_deref()),
            humidity_pct: number_or_zero(p.hum.as_deref()),
            rain_mm: p.rain.as_deref().map(parse_rain_mm).unwrap_or(0.0),
            wind_ms: number_or_zero(p.wind.as_deref()),
            observed_at: observed_at(date, p.base_time.as_deref()),
        };
        readings.insert(region, reading);
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    }

    #[test]
    fn test_parses_region_readings() {
        let json = r#"{
            "서울특별시": {"tmp": "-2.5", "hum": "35", "rain": "강수없음", "wind": "3.2", "baseTime": "0900"},
            "제주특별자치도": {"tmp": "8", "hum": "70", "rain": "1.5mm", "wind": "6.0", "baseTime": "0900"}
        }"#;
        let readings = parse_weather_all(json, date()).expect("valid payload");
        assert_eq!(readings.len(), 2);

        let seoul = &readings["서울특별시"];
        assert_eq!(seoul.temperature_c, -2.5);
        assert_eq!(seoul.humidity_pct, 35.0);
        assert_eq!(seoul.rain_mm, 0.0);
        assert_eq!(seoul.wind_ms, 3.2);
        assert_eq!(seoul.observed_at, date().and_hms_opt(9, 0, 0).unwrap());

        assert_eq!(readings["제주특별자치도"].rain_mm, 1.5);
    }

    #[test]
    fn test_malformed_numbers_coerce_to_zero() {
        let json = r#"{"경기도": {"tmp": "n/a", "wind": "", "baseTime": "later"}}"#;
        let readings = parse_weather_all(json, date()).expect("valid payload");
        let gyeonggi = &readings["경기도"];
        assert_eq!(gyeonggi.temperature_c, 0.0);
        assert_eq!(gyeonggi.humidity_pct, 0.0);
        assert_eq!(gyeonggi.wind_ms, 0.0);
        assert_eq!(gyeonggi.observed_at, date().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_numeric_and_null_fields_are_coerced() {
        // One region sends bare numbers and a null; the other stays intact.
        let json = r#"{
            "경기도": {"tmp": 3.5, "hum": "40", "rain": null, "wind": 2, "baseTime": 1500},
            "서울특별시": {"tmp": "1"}
        }"#;
        let readings = parse_weather_all(json, date()).expect("numbers are accepted");
        assert_eq!(readings.len(), 2);

        let gyeonggi = &readings["경기도"];
        assert_eq!(gyeonggi.temperature_c, 3.5);
        assert_eq!(gyeonggi.humidity_pct, 40.0);
        assert_eq!(gyeonggi.rain_mm, 0.0);
        assert_eq!(gyeonggi.wind_ms, 2.0);
        assert_eq!(gyeonggi.observed_at, date().and_hms_opt(15, 0, 0).unwrap());

        assert_eq!(readings["서울특별시"].temperature_c, 1.0);
    }

    #[test]
    fn test_non_object_region_entry_is_skipped() {
        let json = r#"{"경기도": null, "서울특별시": {"tmp": "4"}, "강원도": [1, 2]}"#;
        let readings = parse_weather_all(json, date()).expect("other regions survive");
        assert_eq!(readings.len(), 1);
        assert_eq!(readings["서울특별시"].temperature_c, 4.0);
    }

    #[test]
    fn test_non_object_payload_is_error() {
        assert!(matches!(
            parse_weather_all("[1, 2, 3]", date()),
            Err(WxError::ParseError(_))
        ));
    }
}
