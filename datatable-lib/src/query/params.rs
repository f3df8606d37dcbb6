//! Request parameters and their query-string form.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Filter;
use super::SortOrder;

/// Default page size.
pub const DEFAULT_ROWS: u64 = 25;

/// Parameters for one fetch or export request.
///
/// The known fields map one-to-one onto the server contract (`first`, `rows`,
/// `sortField`, `sortOrder`, `filters`, `globalFilter`). Anything else the
/// endpoint understands goes in `extra`.
///
/// # Example
///
/// ```
/// use datatable_lib::query::{Filter, MatchMode, RequestParams, SortOrder};
///
/// let params = RequestParams::new(0, 10)
///     .with_sort("name", SortOrder::Ascending)
///     .with_filter("city", Filter::single(MatchMode::Equals, "Oslo"))
///     .with_extra("tenant", 7);
///
/// let pairs = params.to_query_pairs();
/// assert_eq!(pairs[0], ("first".to_string(), "0".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestParams {
    /// Zero-based row offset.
    pub first: u64,
    /// Page size.
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Column filters keyed by field name.
    pub filters: BTreeMap<String, Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_filter: Option<String>,
    /// Caller-defined parameters, emitted after the known fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self::new(0, DEFAULT_ROWS)
    }
}

impl RequestParams {
    /// Creates parameters for the window `[first, first + rows)`.
    pub fn new(first: u64, rows: u64) -> Self {
        Self {
            first,
            rows,
            sort_field: None,
            sort_order: None,
            filters: BTreeMap::new(),
            global_filter: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the sort field and direction.
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Sets the filter for one field, replacing any previous filter on it.
    pub fn with_filter(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.filters.insert(field.into(), filter);
        self
    }

    /// Sets the free-text global filter.
    pub fn with_global_filter(mut self, text: impl Into<String>) -> Self {
        self.global_filter = Some(text.into());
        self
    }

    /// Adds a caller-defined parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Serializes the parameters into query-string pairs.
    ///
    /// Scalars are emitted as-is. Filters and nested extras use bracket
    /// notation, one pair per leaf:
    ///
    /// ```text
    /// filters[name][operator]=and
    /// filters[name][constraints][0][value]=Jo
    /// filters[name][constraints][0][matchMode]=startsWith
    /// ```
    ///
    /// Array leaves are indexed (`[value][0]`), `null` becomes an empty
    /// string, and empty arrays or objects emit nothing. Filters are ordered
    /// by field name.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("first".to_string(), self.first.to_string()),
            ("rows".to_string(), self.rows.to_string()),
        ];

        if let Some(field) = &self.sort_field {
            pairs.push(("sortField".to_string(), field.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), order.as_i8().to_string()));
        }

        for (field, filter) in &self.filters {
            let prefix = format!("filters[{}]", field);
            pairs.push((
                format!("{}[operator]", prefix),
                filter.operator.as_str().to_string(),
            ));
            for (i, constraint) in filter.constraints.iter().enumerate() {
                let base = format!("{}[constraints][{}]", prefix, i);
                flatten_value(&format!("{}[value]", base), &constraint.value, &mut pairs);
                pairs.push((
                    format!("{}[matchMode]", base),
                    constraint.match_mode.as_str().to_string(),
                ));
            }
        }

        if let Some(text) = &self.global_filter {
            pairs.push(("globalFilter".to_string(), text.clone()));
        }

        for (key, value) in &self.extra {
            flatten_value(key, value, &mut pairs);
        }

        pairs
    }
}

fn flatten_value(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => out.push((key.to_string(), String::new())),
        Value::Bool(b) => out.push((key.to_string(), b.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_value(&format!("{}[{}]", key, i), item, out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                flatten_value(&format!("{}[{}]", key, k), v, out);
            }
        }
    }
}
