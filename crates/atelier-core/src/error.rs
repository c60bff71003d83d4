//! Error reporting conventions shared by every Atelier crate.
//!
//! Crates define their own `thiserror` enums; implementing [`ErrorMetadata`] lets
//! callers log an error at the right level and show a safe message to end users
//! without matching on crate-specific variants.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like bad user input
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented and logged
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "DECODE_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Message safe to show an end user
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event for `err` at the level it asks for.
pub fn log_error<E>(err: &E, operation: &str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            operation = operation,
            "Operation failed"
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            error_code = err.error_code(),
            operation = operation,
            "Operation failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            error_code = err.error_code(),
            operation = operation,
            recoverable = err.is_recoverable(),
            "Operation failed"
        ),
    }
}
