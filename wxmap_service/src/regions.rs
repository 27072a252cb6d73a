/// Region registry and feature-name resolution.
///
/// Defines the canonical, ordered list of provinces/special cities that the
/// map aggregates weather by, along with the KMA grid coordinates used to
/// query each one and the city alias table. This is the single source of
/// truth for region names; other modules take a `RegionConfig` rather than
/// hardcoding names.
///
/// Feature names in the boundary dataset are free text ("부산광역시 해운대구",
/// "경기도 수원시"), so resolution is by substring containment. Metropolitan
/// cities whose names do not nest inside their province's name are handled by
/// the alias table, which is always consulted first.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::model::WxError;

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// A top-level administrative region used as the unit of aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanonicalRegion {
    /// Identifier, also the key used by the weather data source.
    pub name: String,
    /// KMA forecast grid X coordinate.
    pub nx: u32,
    /// KMA forecast grid Y coordinate.
    pub ny: u32,
}

/// Maps a metropolitan city name to the canonical region enclosing it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityAlias {
    pub city: String,
    pub region: String,
}

/// Immutable region table handed to the resolver at construction.
///
/// Both lists are ordered: `regions` fixes display order and fallback match
/// priority, `aliases` fixes alias match priority.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionConfig {
    regions: Vec<CanonicalRegion>,
    aliases: Vec<CityAlias>,
}

/// On-disk layout of a region table.
#[derive(Debug, Deserialize)]
struct RegionFile {
    #[serde(default, rename = "region")]
    regions: Vec<CanonicalRegion>,
    #[serde(default, rename = "alias")]
    aliases: Vec<CityAlias>,
}

/// Built-in regions in display order: name, nx, ny.
const KOREA_REGIONS: &[(&str, u32, u32)] = &[
    ("서울특별시", 60, 127),
    ("경기도", 60, 120),
    ("강원도", 73, 134),
    ("충청북도", 69, 107),
    ("충청남도", 68, 100),
    ("전라북도", 63, 89),
    ("경상북도", 89, 91),
    ("전라남도", 51, 67),
    ("경상남도", 91, 77),
    ("제주특별자치도", 52, 38),
];

/// Built-in metropolitan aliases in match priority order.
const KOREA_ALIASES: &[(&str, &str)] = &[
    ("광주", "전라남도"),
    ("대구", "경상북도"),
    ("대전", "충청남도"),
    ("울산", "경상남도"),
    ("부산", "경상남도"),
    ("인천", "경기도"),
    ("세종", "충청남도"),
];

impl RegionConfig {
    /// Builds a validated region table.
    ///
    /// Rejects an empty region list, empty names, duplicate region names,
    /// duplicate alias keys, and aliases pointing at unknown regions.
    pub fn new(regions: Vec<CanonicalRegion>, aliases: Vec<CityAlias>) -> Result<Self, WxError> {
        if regions.is_empty() {
            return Err(WxError::Config("region table must not be empty".to_string()));
        }

        let mut names = HashSet::new();
        for region in &regions {
            if region.name.trim().is_empty() {
                return Err(WxError::Config("region name must not be empty".to_string()));
            }
            if !names.insert(region.name.as_str()) {
                return Err(WxError::Config(format!("duplicate region '{}'", region.name)));
            }
        }

        let mut cities = HashSet::new();
        for alias in &aliases {
            if alias.city.trim().is_empty() {
                return Err(WxError::Config("alias city must not be empty".to_string()));
            }
            if !cities.insert(alias.city.as_str()) {
                return Err(WxError::Config(format!("duplicate alias '{}'", alias.city)));
            }
            if !names.contains(alias.region.as_str()) {
                return Err(WxError::Config(format!(
                    "alias '{}' points at unknown region '{}'",
                    alias.city, alias.region
                )));
            }
        }

        Ok(Self { regions, aliases })
    }

    /// The built-in table of ten Korean provinces and special cities.
    pub fn korea() -> Self {
        Self {
            regions: KOREA_REGIONS
                .iter()
                .map(|&(name, nx, ny)| CanonicalRegion {
                    name: name.to_string(),
                    nx,
                    ny,
                })
                .collect(),
            aliases: KOREA_ALIASES
                .iter()
                .map(|&(city, region)| CityAlias {
                    city: city.to_string(),
                    region: region.to_string(),
                })
                .collect(),
        }
    }

    /// Parses a region table from TOML text:
    ///
    /// ```toml
    /// [[region]]
    /// name = "서울특별시"
    /// nx = 60
    /// ny = 127
    ///
    /// [[alias]]
    /// city = "인천"
    /// region = "경기도"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, WxError> {
        let file: RegionFile = toml::from_str(text)?;
        Self::new(file.regions, file.aliases)
    }

    pub fn regions(&self) -> &[CanonicalRegion] {
        &self.regions
    }

    pub fn aliases(&self) -> &[CityAlias] {
        &self.aliases
    }

    /// Region names in display order.
    pub fn region_names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }

    /// Looks up a region by exact name. Returns `None` if not found.
    pub fn find_region(&self, name: &str) -> Option<&CanonicalRegion> {
        self.regions.iter().find(|r| r.name == name)
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::korea()
    }
}

/// Loads and validates a region table from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RegionConfig, WxError> {
    let text = fs::read_to_string(path.as_ref()).map_err(|e| {
        WxError::Io(format!("{}: {}", path.as_ref().display(), e))
    })?;
    RegionConfig::from_toml_str(&text)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving a feature name.
///
/// `Unmatched` is an expected result for coastal or mislabeled features;
/// callers render those with a neutral fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched(&'a CanonicalRegion),
    Unmatched,
}

impl<'a> Resolution<'a> {
    pub fn region(&self) -> Option<&'a CanonicalRegion> {
        match *self {
            Resolution::Matched(region) => Some(region),
            Resolution::Unmatched => None,
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.region().map(|r| r.name.as_str())
    }
}

/// Resolves free-text feature names against a region table.
#[derive(Debug, Clone, Copy)]
pub struct RegionResolver<'a> {
    config: &'a RegionConfig,
}

impl<'a> RegionResolver<'a> {
    pub fn new(config: &'a RegionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a RegionConfig {
        self.config
    }

    /// Aliases are tried first, in table order; then canonical names in
    /// display order. The first containment hit wins, and an alias hit ends
    /// the search even if its target region is missing from the table.
    pub fn resolve(&self, feature_name: Option<&str>) -> Resolution<'a> {
        let name = match feature_name {
            Some(name) if !name.is_empty() => name,
            _ => return Resolution::Unmatched,
        };

        let config = self.config;
        if let Some(alias) = config
            .aliases
            .iter()
            .find(|alias| name.contains(alias.city.as_str()))
        {
            return config
                .find_region(&alias.region)
                .map_or(Resolution::Unmatched, Resolution::Matched);
        }

        self.config
            .regions
            .iter()
            .find(|region| name.contains(region.name.as_str()))
            .map_or(Resolution::Unmatched, Resolution::Matched)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
