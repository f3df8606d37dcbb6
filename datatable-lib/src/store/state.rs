//! Table state snapshots and the initial-state overlay.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::StoreConfig;
use super::TablePatch;
use crate::query::Filter;
use crate::query::RequestParams;
use crate::query::SortOrder;

/// UI state for one table.
///
/// The query half (`first` through `global_filter`) is what gets sent to the
/// server. The rest (`data`, `total`, `loading`, `selected_columns`) is what
/// came back and what the grid shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState<R> {
    pub first: u64,
    pub rows: u64,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub filters: BTreeMap<String, Filter>,
    pub global_filter: Option<String>,
    pub data: Vec<R>,
    pub total: u64,
    pub loading: bool,
    pub selected_columns: Vec<String>,
}

impl<R> TableState<R> {
    /// Builds a fresh state: defaults, then `initial` on top, with
    /// `data`/`total`/`loading`/`selected_columns` always empty.
    pub fn from_initial(initial: InitialState, config: &StoreConfig) -> Self {
        Self {
            first: initial.first.unwrap_or(0),
            rows: initial.rows.unwrap_or(config.default_rows),
            sort_field: initial.sort_field,
            sort_order: initial.sort_order,
            filters: initial.filters.unwrap_or_default(),
            global_filter: initial.global_filter,
            data: Vec::new(),
            total: 0,
            loading: false,
            selected_columns: Vec::new(),
        }
    }

    /// Returns a new state with every field set in `patch` replaced.
    ///
    /// Fields the patch leaves unset keep their current value.
    pub fn patched(self, patch: TablePatch<R>) -> Self {
        let TablePatch {
            first,
            rows,
            sort_field,
            sort_order,
            filters,
            global_filter,
            data,
            total,
            loading,
            selected_columns,
        } = patch;

        Self {
            first: first.unwrap_or(self.first),
            rows: rows.unwrap_or(self.rows),
            sort_field: sort_field.unwrap_or(self.sort_field),
            sort_order: sort_order.unwrap_or(self.sort_order),
            filters: filters.unwrap_or(self.filters),
            global_filter: global_filter.unwrap_or(self.global_filter),
            data: data.unwrap_or(self.data),
            total: total.unwrap_or(self.total),
            loading: loading.unwrap_or(self.loading),
            selected_columns: selected_columns.unwrap_or(self.selected_columns),
        }
    }

    /// Returns the request parameters for the current query state.
    pub fn request_params(&self) -> RequestParams {
        RequestParams {
            first: self.first,
            rows: self.rows,
            sort_field: self.sort_field.clone(),
            sort_order: self.sort_order,
            filters: self.filters.clone(),
            global_filter: self.global_filter.clone(),
            ..RequestParams::default()
        }
    }

    /// Returns the zero-based page index implied by `first` and `rows`.
    pub fn page_index(&self) -> u64 {
        if self.rows == 0 { 0 } else { self.first / self.rows }
    }
}

/// Caller-supplied starting state for [`DatatableStore::init`](super::DatatableStore::init).
///
/// Every field is optional; unset fields fall back to the defaults
/// (`first = 0`, `rows = 25`, no sort, no filters). Deserializes from the
/// same camelCase names the server uses, so it can be loaded from saved
/// settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitialState {
    pub first: Option<u64>,
    pub rows: Option<u64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub filters: Option<BTreeMap<String, Filter>>,
    pub global_filter: Option<String>,
}

impl InitialState {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting row offset.
    pub fn with_first(mut self, first: u64) -> Self {
        self.first = Some(first);
        self
    }

    /// Sets the page size.
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Sets the sort field without a direction.
    pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    /// Sets the sort field and direction.
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Sets all filters.
    pub fn with_filters(mut self, filters: BTreeMap<String, Filter>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the filter for one field.
    pub fn with_filter(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.filters
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), filter);
        self
    }

    /// Sets the global filter.
    pub fn with_global_filter(mut self, text: impl Into<String>) -> Self {
        self.global_filter = Some(text.into());
        self
    }
}
