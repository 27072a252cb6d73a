/// Per-hour weather snapshot over the canonical regions, and the paint pass
/// that colors boundary features from it.
///
/// A snapshot is built once per fetch (or hour change) and never mutated;
/// the next fetch replaces it wholesale.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::geo::GeoFeature;
use crate::logging::{self, DataSource};
use crate::model::{TemperatureRange, WeatherReading};
use crate::regions::{RegionConfig, RegionResolver, Resolution};
use crate::shading::color::{color_for, Color};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One region's entry in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionWeather {
    pub region: String,
    pub reading: WeatherReading,
    /// False when the data source did not report this region and the
    /// sentinel reading was substituted.
    pub reported: bool,
}

/// Readings for every canonical region, in display order, with the derived
/// temperature range.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    entries: Vec<RegionWeather>,
    range: TemperatureRange,
}

impl WeatherSnapshot {
    /// Orders `readings` by the region table. Regions missing from the map
    /// get a zero-temperature sentinel stamped with `observed_at`; names the
    /// table does not know are dropped.
    pub fn from_readings(
        config: &RegionConfig,
        mut readings: HashMap<String, WeatherReading>,
        observed_at: NaiveDateTime,
    ) -> Self {
        let entries: Vec<RegionWeather> = config
            .regions()
            .iter()
            .map(|region| match readings.remove(&region.name) {
                Some(reading) => RegionWeather {
                    region: region.name.clone(),
                    reading,
                    reported: true,
                },
                None => {
                    logging::warn(
                        DataSource::System,
                        Some(&region.name),
                        "no reading in snapshot, using 0°C sentinel",
                    );
                    RegionWeather {
                        region: region.name.clone(),
                        reading: WeatherReading::sentinel(observed_at),
                        reported: false,
                    }
                }
            })
            .collect();

        for unknown in readings.keys() {
            logging::debug(
                DataSource::System,
                Some(unknown),
                "reading for unknown region ignored",
            );
        }

        let range =
            TemperatureRange::from_temperatures(entries.iter().map(|e| e.reading.temperature_c));
        Self { entries, range }
    }

    pub fn entries(&self) -> &[RegionWeather] {
        &self.entries
    }

    pub fn range(&self) -> TemperatureRange {
        self.range
    }

    pub fn reading_for(&self, region: &str) -> Option<&WeatherReading> {
        self.entries
            .iter()
            .find(|e| e.region == region)
            .map(|e| &e.reading)
    }

    pub fn temperature_of(&self, region: &str) -> Option<f64> {
        self.reading_for(region).map(|r| r.temperature_c)
    }

    /// Number of regions the data source actually reported.
    pub fn reported_count(&self) -> usize {
        self.entries.iter().filter(|e| e.reported).count()
    }

    /// Gradient color for a region, `None` if the region is not in the table.
    pub fn color_of(&self, region: &str) -> Option<Color> {
        self.temperature_of(region)
            .map(|t| color_for(t, self.range.min, self.range.max))
    }
}

// ---------------------------------------------------------------------------
// Paint pass
// ---------------------------------------------------------------------------

/// Fill decided for one boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Region { region: String, color: Color },
    /// The feature's name resolved to no region.
    Unmatched,
}

impl Fill {
    /// Color the rendering layer should apply. Unmatched features are
    /// fully transparent.
    pub fn color(&self) -> Color {
        match self {
            Fill::Region { color, .. } => *color,
            Fill::Unmatched => Color::TRANSPARENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePaint {
    pub feature_name: Option<String>,
    pub fill: Fill,
}

/// Resolves every feature to a region and colors it by that region's
/// temperature relative to the snapshot range.
pub fn paint_features(
    snapshot: &WeatherSnapshot,
    resolver: &RegionResolver<'_>,
    features: &[GeoFeature],
) -> Vec<FeaturePaint> {
    let range = snapshot.range();
    let mut unmatched = 0usize;

    let painted: Vec<FeaturePaint> = features
        .iter()
        .map(|feature| {
            let fill = match resolver.resolve(feature.name.as_deref()) {
                Resolution::Matched(region) => match snapshot.temperature_of(&region.name) {
                    Some(t) => Fill::Region {
                        region: region.name.clone(),
                        color: color_for(t, range.min, range.max),
                    },
                    None => Fill::Unmatched,
                },
                Resolution::Unmatched => Fill::Unmatched,
            };
            if fill == Fill::Unmatched {
                unmatched += 1;
            }
            FeaturePaint {
                feature_name: feature.name.clone(),
                fill,
            }
        })
        .collect();

    logging::debug(
        DataSource::Geo,
        None,
        &format!(
            "painted {} features ({} unmatched)",
            painted.len(),
            unmatched
        ),
    );
    painted
}
