//! Logging service and logger backends

use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

/// Log target used for every record handed to the `log` facade
pub const LOG_TARGET: &str = "check_cisco_ucs";

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with a minimum level
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Service writing plain or JSON lines through the `log` facade
    pub fn facade(min_level: LogLevel, structured: bool) -> Self {
        let logger: Arc<dyn Logger> = if structured {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(FacadeLogger)
        };
        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Forwards formatted events to the `log` facade
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn log(&self, event: &LogEvent) {
        log::log!(target: LOG_TARGET, event.level.to_log_level(), "{}", event.format());
    }
}

/// Forwards JSON encoded events to the `log` facade
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => log::log!(target: LOG_TARGET, event.level.to_log_level(), "{}", json),
            Err(_) => FacadeLogger.log(event),
        }
    }
}

/// Memory logger for testing
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_below_min_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_event(LogEvent::error(codes::session::LOGOUT_FAILED, "logout failed"));
        service.log_event(LogEvent::warning("warning"));
        service.log_event(LogEvent::debug("request body"));

        let events = memory.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_error());
        assert!(events[1].is_warning());
    }

    #[test]
    fn test_memory_logger_clear() {
        let memory = MemoryLogger::new();
        memory.log(&LogEvent::info("one"));
        assert_eq!(memory.events().len(), 1);
        memory.clear();
        assert!(memory.events().is_empty());
    }
}
