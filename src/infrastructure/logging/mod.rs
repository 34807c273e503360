//! Logging infrastructure
//!
//! Structured logging to stderr using tracing and tracing-subscriber, in
//! JSON or human-readable form.

pub mod logger;

pub use logger::{parse_log_format, parse_log_level, LogFormat, LoggerImpl};
