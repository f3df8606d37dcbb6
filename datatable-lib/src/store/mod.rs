//! Per-table state store
//!
//! A keyed registry holding the UI state of every table instance. Each key
//! evolves independently; `init` creates or replaces an entry and `patch`
//! updates fields of an existing one.

mod patch;
mod state;

pub use patch::TablePatch;
pub use state::InitialState;
pub use state::TableState;

use dashmap::DashMap;
use log::trace;

use crate::query::DEFAULT_ROWS;

/// Defaults applied by [`DatatableStore::init`].
///
/// # Example
///
/// ```
/// use datatable_lib::store::StoreConfig;
///
/// let config = StoreConfig::default().with_rows(50);
/// assert_eq!(config.default_rows, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Page size used when the initial state does not set `rows`.
    ///
    /// Default: 25
    pub default_rows: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_rows: DEFAULT_ROWS,
        }
    }
}

impl StoreConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default page size.
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.default_rows = rows;
        self
    }
}

/// Keyed table state, one entry per table instance.
///
/// `R` is the row type stored in `data`; the store never looks inside it.
/// Backed by a concurrent map, so a store can be shared through `Arc`.
///
/// # Example
///
/// ```
/// use datatable_lib::store::{DatatableStore, InitialState, TablePatch};
///
/// let store: DatatableStore = DatatableStore::new();
/// store.init("users", InitialState::new().with_sort_field("name"));
/// store.patch("users", TablePatch::new().with_total(42));
///
/// let state = store.get("users").unwrap();
/// assert_eq!(state.total, 42);
/// assert_eq!(state.rows, 25);
/// ```
#[derive(Debug)]
pub struct DatatableStore<R = serde_json::Value> {
    tables: DashMap<String, TableState<R>>,
    config: StoreConfig,
}

impl<R> Default for DatatableStore<R> {
    fn default() -> Self {
        Self::with_config(StoreConfig::default())
    }
}

impl<R> DatatableStore<R> {
    /// Creates an empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given defaults.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            tables: DashMap::new(),
            config,
        }
    }

    /// Returns the store's defaults.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates the entry for `key`, replacing any existing one.
    ///
    /// Defaults are applied first, then `initial`. Rows, total, loading and
    /// selected columns always start empty.
    pub fn init(&self, key: impl Into<String>, initial: InitialState) {
        let key = key.into();
        trace!("Init table state {:?}", key);
        let state = TableState::from_initial(initial, &self.config);
        self.tables.insert(key, state);
    }

    /// Applies `delta` to the entry for `key`.
    ///
    /// Does nothing if `key` was never initialized. Returns whether an entry
    /// was updated.
    pub fn patch(&self, key: &str, delta: TablePatch<R>) -> bool {
        if !self.tables.contains_key(key) {
            trace!("Ignoring patch for unknown table {:?}", key);
            return false;
        }
        self.tables.alter(key, |_, state| state.patched(delta));
        true
    }

    /// Returns `true` if `key` has been initialized.
    pub fn contains(&self, key: &str) -> bool {
        self.tables.contains_key(key)
    }

    /// Returns the number of tables in the store.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no table has been initialized.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl<R: Clone> DatatableStore<R> {
    /// Returns a snapshot of the state for `key`.
    pub fn get(&self, key: &str) -> Option<TableState<R>> {
        self.tables.get(key).map(|entry| entry.value().clone())
    }
}
