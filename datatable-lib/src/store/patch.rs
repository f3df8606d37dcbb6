//! Field-by-field table updates.

use std::collections::BTreeMap;

use crate::query::Filter;
use crate::query::SortOrder;

/// A set of field updates for one table.
///
/// `None` means "leave as is". Optional state fields (`sort_field`,
/// `sort_order`, `global_filter`) take `Some(None)` to clear them.
///
/// The named constructors mirror grid events:
///
/// ```
/// use datatable_lib::query::SortOrder;
/// use datatable_lib::store::TablePatch;
///
/// let next_page: TablePatch<()> = TablePatch::page(25, 25);
/// let sorted: TablePatch<()> = TablePatch::sort("name", SortOrder::Descending);
/// assert_eq!(next_page.first, Some(25));
/// assert_eq!(sorted.sort_order, Some(Some(SortOrder::Descending)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TablePatch<R> {
    pub first: Option<u64>,
    pub rows: Option<u64>,
    pub sort_field: Option<Option<String>>,
    pub sort_order: Option<Option<SortOrder>>,
    pub filters: Option<BTreeMap<String, Filter>>,
    pub global_filter: Option<Option<String>>,
    pub data: Option<Vec<R>>,
    pub total: Option<u64>,
    pub loading: Option<bool>,
    pub selected_columns: Option<Vec<String>>,
}

impl<R> Default for TablePatch<R> {
    fn default() -> Self {
        Self {
            first: None,
            rows: None,
            sort_field: None,
            sort_order: None,
            filters: None,
            global_filter: None,
            data: None,
            total: None,
            loading: None,
            selected_columns: None,
        }
    }
}

impl<R> TablePatch<R> {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page change: new offset and page size.
    pub fn page(first: u64, rows: u64) -> Self {
        Self::new().with_first(first).with_rows(rows)
    }

    /// Sort change.
    pub fn sort(field: impl Into<String>, order: SortOrder) -> Self {
        Self::new()
            .with_sort_field(Some(field.into()))
            .with_sort_order(Some(order))
    }

    /// Removes sorting.
    pub fn clear_sort() -> Self {
        Self::new().with_sort_field(None).with_sort_order(None)
    }

    /// Filter change. Jumps back to the first page.
    pub fn filter(filters: BTreeMap<String, Filter>) -> Self {
        Self::new().with_filters(filters).with_first(0)
    }

    /// Global filter change. Jumps back to the first page.
    pub fn global_filter(text: Option<String>) -> Self {
        Self::new().with_global_filter(text).with_first(0)
    }

    /// Fetch result: rows, total and `loading = false`.
    pub fn loaded(data: Vec<R>, total: u64) -> Self {
        Self::new().with_data(data).with_total(total).with_loading(false)
    }

    /// Sets the row offset.
    pub fn with_first(mut self, first: u64) -> Self {
        self.first = Some(first);
        self
    }

    /// Sets the page size.
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Sets or clears (`None`) the sort field.
    pub fn with_sort_field(mut self, field: Option<String>) -> Self {
        self.sort_field = Some(field);
        self
    }

    /// Sets or clears (`None`) the sort direction.
    pub fn with_sort_order(mut self, order: Option<SortOrder>) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Replaces the per-column filters.
    pub fn with_filters(mut self, filters: BTreeMap<String, Filter>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets or clears (`None`) the global filter.
    pub fn with_global_filter(mut self, text: Option<String>) -> Self {
        self.global_filter = Some(text);
        self
    }

    /// Replaces the loaded rows.
    pub fn with_data(mut self, data: Vec<R>) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the server-side row count.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Sets the loading flag.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    /// Replaces the visible column list.
    pub fn with_selected_columns(mut self, columns: Vec<String>) -> Self {
        self.selected_columns = Some(columns);
        self
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
            && self.rows.is_none()
            && self.sort_field.is_none()
            && self.sort_order.is_none()
            && self.filters.is_none()
            && self.global_filter.is_none()
            && self.data.is_none()
            && self.total.is_none()
            && self.loading.is_none()
            && self.selected_columns.is_none()
    }
}
