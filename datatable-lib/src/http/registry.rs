//! Registration slot for the host's HTTP client

use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use log::debug;

use super::HttpClient;
use crate::error::ConfigError;

static GLOBAL: LazyLock<Arc<HttpClientRegistry>> =
    LazyLock::new(|| Arc::new(HttpClientRegistry::new()));

/// Holds the one [`HttpClient`] shared by every [`Datatable`](crate::Datatable).
///
/// The registry is a plain value: create one at application start, register
/// the client, and hand the registry to each `Datatable` by `Arc`. Hosts that
/// prefer a single process-wide slot can use [`HttpClientRegistry::global`].
///
/// Registering again replaces the previous client (last writer wins).
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use datatable_lib::http::{HttpClientRegistry, ReqwestHttpClient};
///
/// let registry = Arc::new(HttpClientRegistry::new());
/// registry.register(ReqwestHttpClient::builder().base_url("https://api.example.com/").build()?);
///
/// let users = datatable_lib::Datatable::new("users", registry.clone());
/// ```
#[derive(Default)]
pub struct HttpClientRegistry {
    slot: RwLock<Option<Arc<dyn HttpClient>>>,
}

impl HttpClientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> Arc<HttpClientRegistry> {
        GLOBAL.clone()
    }

    /// Registers a client, replacing any previous one.
    pub fn register<C: HttpClient + 'static>(&self, client: C) {
        self.register_shared(Arc::new(client));
    }

    /// Registers an already shared client, replacing any previous one.
    pub fn register_shared(&self, client: Arc<dyn HttpClient>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            debug!("Replacing registered datatable HTTP client");
        } else {
            debug!("Registered datatable HTTP client");
        }
        *slot = Some(client);
    }

    /// Returns the registered client.
    ///
    /// Fails with [`ConfigError::NotConfigured`] if nothing is registered.
    pub fn resolve(&self) -> Result<Arc<dyn HttpClient>, ConfigError> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ConfigError::NotConfigured)
    }

    /// Returns `true` if a client is registered.
    pub fn has(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clears the slot.
    pub fn reset(&self) {
        debug!("Reset datatable HTTP client registry");
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for HttpClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientRegistry")
            .field("registered", &self.has())
            .finish()
    }
}
