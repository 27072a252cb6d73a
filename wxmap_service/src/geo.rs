/// Boundary dataset loading.
///
/// Only the free-text `properties.name` of each feature matters here;
/// geometry is passed through untouched to whatever renders the map.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::model::WxError;

/// A boundary feature as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoFeature {
    /// `properties.name`, or `None` if absent or not a string.
    pub name: Option<String>,
}

/// Extracts feature names from GeoJSON FeatureCollection text.
///
/// Fails only when the document is not JSON or has no `features` array;
/// individual features with odd properties still produce an entry.
pub fn parse_feature_collection(json: &str) -> Result<Vec<GeoFeature>, WxError> {
    let root: Value = serde_json::from_str(json)?;
    let features = root
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| WxError::ParseError("missing 'features' array".to_string()))?;

    Ok(features
        .iter()
        .map(|feature| GeoFeature {
            name: feature
                .get("properties")
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str())
                .map(String::from),
        })
        .collect())
}

/// Reads and parses a GeoJSON file from disk.
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<Vec<GeoFeature>, WxError> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| WxError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_feature_collection(&text)
}
