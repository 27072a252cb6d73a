/// Side-panel legend: one row per region with its temperature, the css
/// color of its gradient position, and a relative bar width.

use serde::Serialize;

use crate::shading::color::color_for;
use crate::snapshot::WeatherSnapshot;

/// Narrowest bar drawn, in percent of the panel width.
pub const MIN_BAR_WIDTH_PCT: f64 = 15.0;

/// Width added on top of the minimum for the hottest region.
pub const BAR_SPAN_PCT: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub region: String,
    pub temperature_c: f64,
    pub css_color: String,
    pub bar_width_pct: f64,
}

/// Bar width for a temperature: 15% for the coldest region, 100% for the
/// hottest, 15% for everything when the range is degenerate.
pub fn bar_width_pct(temperature: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    let ratio = if span == 0.0 || !span.is_finite() || !temperature.is_finite() {
        0.0
    } else {
        ((temperature - min) / span).clamp(0.0, 1.0)
    };
    ratio * BAR_SPAN_PCT + MIN_BAR_WIDTH_PCT
}

/// Legend rows in the snapshot's region order.
pub fn build_legend(snapshot: &WeatherSnapshot) -> Vec<LegendEntry> {
    let range = snapshot.range();
    snapshot
        .entries()
        .iter()
        .map(|entry| {
            let t = entry.reading.temperature_c;
            LegendEntry {
                region: entry.region.clone(),
                temperature_c: t,
                css_color: color_for(t, range.min, range.max).to_css_string(),
                bar_width_pct: bar_width_pct(t, range.min, range.max),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherReading;
    use crate::regions::RegionConfig;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[test]
    fn test_bar_width_bounds() {
        assert_eq!(bar_width_pct(0.0, 0.0, 20.0), 15.0);
        assert_eq!(bar_width_pct(20.0, 0.0, 20.0), 100.0);
        assert_eq!(bar_width_pct(10.0, 0.0, 20.0), 57.5);
    }

    #[test]
    fn test_bar_width_for_degenerate_range_is_minimum() {
        assert_eq!(bar_width_pct(3.0, 3.0, 3.0), MIN_BAR_WIDTH_PCT);
    }

    #[test]
    fn test_legend_follows_region_order() {
        let observed = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut readings = HashMap::new();
        readings.insert(
            "제주특별자치도".to_string(),
            WeatherReading {
                temperature_c: 30.0,
                humidity_pct: 80.0,
                rain_mm: 0.0,
                wind_ms: 4.1,
                observed_at: observed,
            },
        );
        readings.insert(
            "강원도".to_string(),
            WeatherReading {
                temperature_c: 10.0,
                humidity_pct: 40.0,
                rain_mm: 0.0,
                wind_ms: 1.0,
                observed_at: observed,
            },
        );
        let snapshot = WeatherSnapshot::from_readings(&RegionConfig::korea(), readings, observed);

        let legend = build_legend(&snapshot);
        assert_eq!(legend.len(), 10);
        assert_eq!(legend[0].region, "서울특별시");
        assert_eq!(legend[0].css_color, "rgb(0,0,255)"); // sentinel 0°C is the minimum
        assert_eq!(legend[9].region, "제주특별자치도");
        assert_eq!(legend[9].css_color, "rgb(255,0,0)");
        assert_eq!(legend[9].bar_width_pct, 100.0);
    }
}
