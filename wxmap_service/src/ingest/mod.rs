/// Weather data sources.
///
/// Submodules:
/// - `kma`   — KMA ultra-short-term forecast API client.
/// - `proxy` — parser for the dashboard's `/api/weather/all` payload.

pub mod kma;
pub mod proxy;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a value field that upstream usually sends as a string but may send
/// as a bare number. Numbers are kept as their text form so callers parse
/// both the same way; null, booleans, arrays and objects read as `None`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "lenient_text")]
        value: Option<String>,
    }

    fn read(json: &str) -> Option<String> {
        serde_json::from_str::<Field>(json).expect("lenient field never rejects").value
    }

    #[test]
    fn test_lenient_text_accepts_strings_and_numbers() {
        assert_eq!(read(r#"{"value": "3.5"}"#).as_deref(), Some("3.5"));
        assert_eq!(read(r#"{"value": 3.5}"#).as_deref(), Some("3.5"));
        assert_eq!(read(r#"{"value": -3}"#).as_deref(), Some("-3"));
    }

    #[test]
    fn test_lenient_text_treats_other_shapes_as_missing() {
        assert_eq!(read(r#"{"value": null}"#), None);
        assert_eq!(read(r#"{"value": true}"#), None);
        assert_eq!(read(r#"{"value": [1]}"#), None);
        assert_eq!(read(r#"{}"#), None);
    }
}
