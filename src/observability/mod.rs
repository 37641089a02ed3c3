//! Observability
//!
//! Structured logging for build runs. Everything goes to stderr so stdout
//! stays free for command output such as graphs and JSON reports.

pub mod logging;

pub use logging::{LogFormat, init_logging};
