//! Logging abstractions
//!
//! The core never prints on its own; callers inject a [`Logger`] where
//! diagnostics are wanted.

mod traits;
mod noop;
mod console;
mod file_logger;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use file_logger::{FileLogger, LogLevel, LOG_LEVEL_ENV};
