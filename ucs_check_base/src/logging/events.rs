//! Log events emitted by the check

use super::codes::{self, Code};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Level for the `log` facade
    pub fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }

    /// Map the plugin's `-d` debug level onto a minimum log level.
    ///
    /// 1 prints errors only, 2 adds warnings, 3 adds informational and
    /// request/response messages. 0 disables logging.
    pub fn from_verbosity(verbosity: u8) -> Option<Self> {
        match verbosity {
            0 => None,
            1 => Some(LogLevel::Error),
            2 => Some(LogLevel::Warning),
            _ => Some(LogLevel::Debug),
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Context pairs in insertion order
    pub context: Vec<(String, String)>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: message.to_string(),
            context: Vec::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Create a warning event without a specific code
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create a warning event with a specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, warning_code, message)
    }

    /// Create an info event
    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    /// Get category from the code prefix
    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code.as_str())
    }

    /// Whether this error ends the check with UNKNOWN
    pub fn is_fatal(&self) -> bool {
        self.is_error() && codes::is_fatal(self.code.as_str())
    }

    /// Look up a context value
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Format for display
    pub fn format(&self) -> String {
        let mut output = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        for (key, value) in &self.context {
            output.push_str(&format!(" {}={}", key, value));
        }
        output
    }

    /// One JSON object per event, for log shippers
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let record = JsonRecord {
            ts: self
                .timestamp
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            level: self.level.as_str(),
            code: self.code.as_str(),
            category: self.category(),
            message: &self.message,
            fatal: self.is_error().then(|| self.is_fatal()),
            context: self
                .context
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        };
        serde_json::to_string(&record)
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    /// Seconds since the Unix epoch
    ts: u64,
    level: &'static str,
    code: &'static str,
    category: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fatal: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    context: BTreeMap<&'a str, &'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::session::LOGIN_REJECTED, "aaaLogin rejected");

        assert!(event.is_error());
        assert!(event.is_fatal());
        assert_eq!(event.code.as_str(), "S001");
        assert_eq!(event.category(), "Session");
    }

    #[test]
    fn test_format_keeps_context_order() {
        let event = LogEvent::success(codes::success::QUERY_COMPLETED, "query done")
            .with_context("bytes", "120")
            .with_context("class", "equipmentPsu");

        assert_eq!(
            event.format(),
            "[INFO] I011 - query done bytes=120 class=equipmentPsu"
        );
        assert_eq!(event.context_value("class"), Some("equipmentPsu"));
    }

    #[test]
    fn test_format_json() {
        let event = LogEvent::error(codes::transport::CONNECTION_CLOSED, "closed")
            .with_context("endpoint", "https://10.0.0.1/nuova");
        let json: serde_json::Value =
            serde_json::from_str(&event.format_json().unwrap()).unwrap();

        assert_eq!(json["code"], "N004");
        assert_eq!(json["category"], "Transport");
        assert_eq!(json["fatal"], true);
        assert_eq!(json["context"]["endpoint"], "https://10.0.0.1/nuova");

        let info: serde_json::Value =
            serde_json::from_str(&LogEvent::info("starting").format_json().unwrap()).unwrap();
        assert!(info.get("fatal").is_none());
        assert!(info.get("context").is_none());
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(0), None);
        assert_eq!(LogLevel::from_verbosity(1), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_verbosity(2), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_verbosity(3), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(9), Some(LogLevel::Debug));
    }
}
