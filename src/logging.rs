//! Structured logging for the agency hours service
//!
//! Provides context-rich logging with agency identifiers, timestamps, and
//! severity levels. Supports both console output and an append-only log
//! file. Calls made before `init_logger` are silently dropped.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
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

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Log Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Agency directory feed (HTTP or fixture)
    Feed,
    /// Schedule normalization and evaluation
    Schedule,
    Config,
    System,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Feed => write!(f, "FEED"),
            LogSource::Schedule => write!(f, "HOURS"),
            LogSource::Config => write!(f, "CFG"),
            LogSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the directory is down for maintenance or rate-limiting
    Expected,
    /// Unexpected failure - indicates an API change or configuration issue
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

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, source: &LogSource, record_id: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let record_part = record_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, record_part, message)
    }

    fn log(&self, level: LogLevel, source: &LogSource, record_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, record_id, message);
        let record_part = record_id.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Diagnostics go to stderr so that stdout carries only the listing
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, record_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, record_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}{}: {}", source, record_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: LogSource, record_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &source, record_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: LogSource, record_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, record_id, message);
}

/// Log a warning message
pub fn warn(source: LogSource, record_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, record_id, message);
}

/// Log an error message
pub fn error(source: LogSource, record_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, record_id, message);
}

/// Log a debug message
pub fn debug(source: LogSource, record_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, record_id, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a feed failure from its rendered error message
pub fn classify_feed_failure(error_message: &str) -> FailureType {
    if error_message.contains("HTTP error: 429") || error_message.contains("HTTP error: 503") {
        // Rate limiting and maintenance windows are routine for the directory
        FailureType::Expected
    } else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log a feed failure with automatic classification
pub fn log_feed_failure(operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_feed_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => warn(LogSource::Feed, None, &message),
        FailureType::Unexpected => error(LogSource::Feed, None, &message),
        FailureType::Unknown => warn(LogSource::Feed, None, &message),
    }
}

// ---------------------------------------------------------------------------
// Ingestion Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one ingestion pass
pub fn log_ingest_summary(total: usize, mapped: usize, skipped: usize) {
    let message = format!(
        "Ingestion complete: {}/{} agencies mapped, {} skipped",
        mapped, total, skipped
    );

    if skipped == 0 {
        info(LogSource::Feed, None, &message);
    } else if mapped == 0 {
        error(LogSource::Feed, None, &message);
    } else {
        warn(LogSource::Feed, None, &message);
    }
}
