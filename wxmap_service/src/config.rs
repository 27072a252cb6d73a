/// Service configuration.
///
/// Loaded from a TOML file; every section is optional and falls back to the
/// defaults below. The KMA service key is a secret and is normally supplied
/// through the environment (`WEATHER_API_SERVICE_KEY`, with `.env` support),
/// which takes precedence over any key in the file.
///
/// ```toml
/// regions_file = "regions.toml"
///
/// [kma]
/// base_url = "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtFcst"
/// timeout_secs = 10
/// max_retries = 5
///
/// [logging]
/// level = "info"
/// file = "wxmap.log"
/// timestamps = true
/// ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::ingest::kma::KMA_FORECAST_URL;
use crate::logging::LogLevel;
use crate::model::WxError;
use crate::regions::{self, RegionConfig};

/// Environment variable holding the KMA service key.
pub const SERVICE_KEY_ENV: &str = "WEATHER_API_SERVICE_KEY";

/// Environment variable overriding the forecast endpoint.
pub const BASE_URL_ENV: &str = "WEATHER_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KmaSettings {
    pub base_url: String,
    pub service_key: Option<String>,
    pub timeout_secs: u64,
    /// Base times tried per region, stepping back one hour each time.
    pub max_retries: u32,
}

impl Default for KmaSettings {
    fn default() -> Self {
        Self {
            base_url: KMA_FORECAST_URL.to_string(),
            service_key: None,
            timeout_secs: 10,
            max_retries: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingSettings {
    /// Unknown level names fall back to `Info`.
    pub fn min_level(&self) -> LogLevel {
        LogLevel::parse(&self.level).unwrap_or(LogLevel::Info)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub kma: KmaSettings,
    pub logging: LoggingSettings,
    /// Region table override; the built-in Korean table is used when unset.
    pub regions_file: Option<String>,
}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, WxError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the file if given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, WxError> {
        let mut config = match path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .map_err(|e| WxError::Io(format!("{}: {}", p.display(), e)))?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        dotenv::dotenv().ok();
        config.apply_overrides(env::var(SERVICE_KEY_ENV).ok(), env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    /// Non-empty values replace whatever the file supplied.
    pub fn apply_overrides(&mut self, service_key: Option<String>, base_url: Option<String>) {
        if let Some(key) = service_key.filter(|k| !k.trim().is_empty()) {
            self.kma.service_key = Some(key);
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.kma.base_url = url;
        }
    }

    /// The configured region table, or the built-in one.
    pub fn region_config(&self) -> Result<RegionConfig, WxError> {
        match &self.regions_file {
            Some(path) => regions::load_config(path),
            None => Ok(RegionConfig::korea()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty TOML is valid");
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.kma.base_url, KMA_FORECAST_URL);
        assert_eq!(config.kma.max_retries, 5);
        assert_eq!(config.logging.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [kma]
            timeout_secs = 30

            [logging]
            level = "debug"
            timestamps = true
            "#,
        )
        .expect("valid TOML");
        assert_eq!(config.kma.timeout_secs, 30);
        assert_eq!(config.kma.max_retries, 5);
        assert_eq!(config.logging.min_level(), LogLevel::Debug);
        assert!(config.logging.timestamps);
        assert!(config.regions_file.is_none());
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut config = ServiceConfig::from_toml_str(
            r#"
            [kma]
            service_key = "from-file"
            "#,
        )
        .unwrap();
        config.apply_overrides(Some("from-env".to_string()), None);
        assert_eq!(config.kma.service_key.as_deref(), Some("from-env"));
        assert_eq!(config.kma.base_url, KMA_FORECAST_URL);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = ServiceConfig::default();
        config.apply_overrides(Some("  ".to_string()), Some(String::new()));
        assert!(config.kma.service_key.is_none());
        assert_eq!(config.kma.base_url, KMA_FORECAST_URL);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let settings = LoggingSettings {
            level: "chatty".to_string(),
            ..LoggingSettings::default()
        };
        assert_eq!(settings.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_default_region_table_is_builtin() {
        let config = ServiceConfig::default();
        assert_eq!(config.region_config().unwrap(), RegionConfig::korea());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            ServiceConfig::from_toml_str("[kma\nbase_url = 1"),
            Err(WxError::Config(_))
        ));
    }
}
