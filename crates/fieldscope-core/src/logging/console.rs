//! Console logger implementation

use super::traits::Logger;

/// A logger that writes to stderr
///
/// Every level goes to stderr: stdout carries the tool protocol when the
/// host runs over stdio.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "[fieldscope]".to_string(),
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn format(&self, level: &str, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level, message)
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        eprintln!("{}", self.format("DEBUG", message));
    }

    fn info(&self, message: &str) {
        eprintln!("{}", self.format("INFO", message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", self.format("WARN", message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.format("ERROR", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.prefix, "[fieldscope]");

        let custom = ConsoleLogger::with_prefix("[jira-mcp]");
        assert_eq!(custom.format("WARN", "slow"), "[jira-mcp] WARN: slow");
    }

    #[test]
    fn test_console_logger_logs() {
        let logger = ConsoleLogger::new();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
