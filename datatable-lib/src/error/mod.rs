//! Error types

mod api;
mod config;

pub use api::*;
pub use config::*;

/// Errors returned by fetch, export and load operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No HTTP client was registered before use.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error from the bundled reqwest client or from decoding a response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Error raised by a host-provided HTTP client, passed through untouched.
    #[error(transparent)]
    Client(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an error raised by a host-provided HTTP client.
    pub fn client(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Client(err.into())
    }

    /// Returns `true` if this error means no HTTP client was registered.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::Config(ConfigError::NotConfigured))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Attempts to downcast a host client error to a concrete type.
    pub fn downcast_client<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Client(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
