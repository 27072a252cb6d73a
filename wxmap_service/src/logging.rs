/// Structured logging for the weather map service
///
/// Provides context-rich logging with region identifiers, timestamps, and
/// severity levels. Supports both console output and file-based logging.
/// Until `init_logger` is called every logging call is a no-op, which keeps
/// library use and unit tests quiet.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Case-insensitive level name as written in config files.
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// KMA forecast API.
    Kma,
    /// Dashboard `/api/weather/all` payloads.
    Proxy,
    /// Boundary GeoJSON.
    Geo,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Kma => write!(f, "KMA"),
            DataSource::Proxy => write!(f, "PROXY"),
            DataSource::Geo => write!(f, "GEO"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - forecast for the base time not published yet
    Expected,
    /// Unexpected failure - service degradation, bad key or API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut guard) = LOGGER.lock() {
            *guard = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, source: DataSource, region: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(level, source, region, message);
        let region_part = region.map(|r| format!(" [{}]", r)).unwrap_or_default();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{} {}", timestamp, entry),
                LogLevel::Info | LogLevel::Debug => println!("{} {}", timestamp, entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, region_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, region_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &format!("{} {}", timestamp, entry)) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// `LEVEL SOURCE [region]: message`, the timestamp-free part of a log line.
pub fn format_entry(
    level: LogLevel,
    source: DataSource,
    region: Option<&str>,
    message: &str,
) -> String {
    let region_part = region.map(|r| format!(" [{}]", r)).unwrap_or_default();
    format!("{} {}{}: {}", level, source, region_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: DataSource, region: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, source, region, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: DataSource, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, region, message);
}

/// Log a warning message
pub fn warn(source: DataSource, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, region, message);
}

/// Log an error message
pub fn error(source: DataSource, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, region, message);
}

/// Log a debug message
pub fn debug(source: DataSource, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, region, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch failure from its error message.
pub fn classify_failure(error_message: &str) -> FailureType {
    // A forecast for the newest base time appears some minutes after the
    // hour; an empty answer for it is routine and the caller steps back.
    if error_message.contains("No data") {
        FailureType::Expected
    } else if error_message.contains("HTTP error")
        || error_message.contains("Parse error")
        || error_message.contains("Configuration error")
    {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a data source failure with automatic classification
pub fn log_fetch_failure(
    source: DataSource,
    region: &str,
    operation: &str,
    err: &dyn std::error::Error,
) {
    let error_msg = err.to_string();
    let failure_type = classify_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, Some(region), &message),
        FailureType::Unexpected => error(source, Some(region), &message),
        FailureType::Unknown => warn(source, Some(region), &message),
    }
}

/// Log a summary of one fetch pass over all regions
pub fn log_fetch_summary(source: DataSource, total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Fetch complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(source, None, &message);
    } else if successful == 0 {
        error(source, None, &message);
    } else {
        warn(source, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WxError;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" warn "), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn test_failure_classification() {
        let no_data = WxError::NoDataAvailable("경기도".to_string()).to_string();
        assert_eq!(classify_failure(&no_data), FailureType::Expected);

        let http = WxError::HttpError(500).to_string();
        assert_eq!(classify_failure(&http), FailureType::Unexpected);

        let request = WxError::Request("connection reset".to_string()).to_string();
        assert_eq!(classify_failure(&request), FailureType::Unknown);
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(LogLevel::Warning, DataSource::Kma, Some("경기도"), "retrying"),
            "WARN KMA [경기도]: retrying"
        );
        assert_eq!(
            format_entry(LogLevel::Info, DataSource::System, None, "ready"),
            "INFO SYS: ready"
        );
    }
}
