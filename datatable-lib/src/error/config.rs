//! Configuration error types

/// Errors caused by missing setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `resolve()` was called before any client was registered, or after `reset()`.
    #[error("datatable HTTP client used before one was registered")]
    NotConfigured,
}
