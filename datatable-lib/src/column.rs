//! Column definitions
//!
//! Static per-column configuration authored by the host application. The
//! library itself only reads it to seed table state (visible columns and
//! default filters); rendering is left to the UI layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::query::Filter;
use crate::query::FilterConstraint;
use crate::query::Operator;

/// How a column's values should be treated by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    Text,
    Numeric,
    Date,
    Boolean,
    MultiSelect,
}

/// Kind of filter input shown for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    Select,
    MultiSelect,
}

/// One choice in a select filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilterOption {
    pub label: String,
    pub value: Value,
}

/// Detailed filter settings for a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnFilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<FilterType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_options: Vec<ColumnFilterOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_match_modes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_operator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selected_labels: Option<u32>,
}

/// `filter: true | false | {...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnFilter {
    Enabled(bool),
    Config(ColumnFilterConfig),
}

impl ColumnFilter {
    /// Returns `true` unless this is `false`.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ColumnFilter::Enabled(false))
    }

    /// Returns the detailed config, if any.
    pub fn config(&self) -> Option<&ColumnFilterConfig> {
        match self {
            ColumnFilter::Config(config) => Some(config),
            ColumnFilter::Enabled(_) => None,
        }
    }
}

/// Filter a column starts with when the table is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefaultFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub constraints: Vec<FilterConstraint>,
}

impl ColumnDefaultFilter {
    /// Converts to a [`Filter`], defaulting the operator to `and`.
    pub fn to_filter(&self) -> Filter {
        Filter {
            operator: self.operator.unwrap_or_default(),
            constraints: self.constraints.clone(),
        }
    }
}

/// Cell render hook: row value in, display value out.
#[derive(Clone)]
pub struct Render(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Render {
    /// Wraps a render closure.
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the hook to a cell value.
    pub fn call(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl std::fmt::Debug for Render {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Render(..)")
    }
}

impl PartialEq for Render {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Configuration for one grid column.
///
/// Deserializes from the camelCase column schema. `render` is code, so it is
/// never serialized and must be attached with [`ColumnDef::with_render`].
///
/// # Example
///
/// ```
/// use datatable_lib::column::{ColumnDef, DataType};
///
/// let column: ColumnDef = serde_json::from_str(
///     r#"{"field": "createdAt", "header": "Created", "sortable": true, "dataType": "date"}"#,
/// ).unwrap();
/// assert!(column.is_sortable());
/// assert_eq!(column.data_type, Some(DataType::Date));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ColumnFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip)]
    pub render: Option<Render>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_filter: Option<ColumnDefaultFilter>,
}

impl ColumnDef {
    /// Creates a column with just a field and header.
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            sortable: None,
            filter: None,
            visible: None,
            data_type: None,
            render: None,
            default_filter: None,
        }
    }

    /// Marks the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = Some(true);
        self
    }

    /// Hides the column (`visible: false`).
    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    /// Sets the column filter.
    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the data type.
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets the render hook.
    pub fn with_render(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.render = Some(Render::new(f));
        self
    }

    /// Sets the filter applied before any user input.
    pub fn with_default_filter(mut self, filter: ColumnDefaultFilter) -> Self {
        self.default_filter = Some(filter);
        self
    }

    /// Returns `true` if the column is marked sortable.
    pub fn is_sortable(&self) -> bool {
        self.sortable.unwrap_or(false)
    }

    /// Returns `true` if the column has an enabled filter.
    pub fn is_filterable(&self) -> bool {
        self.filter.as_ref().is_some_and(ColumnFilter::is_enabled)
    }

    /// Columns are visible unless `visible` is explicitly `false`.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Runs the render hook, or returns the value unchanged without one.
    pub fn render_value(&self, value: &Value) -> Value {
        match &self.render {
            Some(render) => render.call(value),
            None => value.clone(),
        }
    }
}

/// Fields of the visible columns, in column order.
pub fn visible_fields(columns: &[ColumnDef]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.field.clone())
        .collect()
}

/// Default filters keyed by field, for columns that declare one.
pub fn default_filters(columns: &[ColumnDef]) -> BTreeMap<String, Filter> {
    columns
        .iter()
        .filter_map(|c| {
            c.default_filter
                .as_ref()
                .map(|f| (c.field.clone(), f.to_filter()))
        })
        .collect()
}
