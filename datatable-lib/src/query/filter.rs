//! Column filter types.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Comparison applied by the server to a constraint value.
///
/// The wire names (`startsWith`, `dateIsNot`, ...) are part of the server
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    Contains,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
    NotContains,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Expects a two-element array value. Not checked.
    Between,
    /// Expects an array value. Not checked.
    In,
    DateIs,
    DateIsNot,
    DateBefore,
    DateAfter,
}

impl MatchMode {
    /// Every match mode, in declaration order.
    pub const ALL: [MatchMode; 16] = [
        MatchMode::Contains,
        MatchMode::StartsWith,
        MatchMode::EndsWith,
        MatchMode::Equals,
        MatchMode::NotEquals,
        MatchMode::NotContains,
        MatchMode::Lt,
        MatchMode::Lte,
        MatchMode::Gt,
        MatchMode::Gte,
        MatchMode::Between,
        MatchMode::In,
        MatchMode::DateIs,
        MatchMode::DateIsNot,
        MatchMode::DateBefore,
        MatchMode::DateAfter,
    ];

    /// Returns the wire name of this match mode.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::StartsWith => "startsWith",
            MatchMode::EndsWith => "endsWith",
            MatchMode::Equals => "equals",
            MatchMode::NotEquals => "notEquals",
            MatchMode::NotContains => "notContains",
            MatchMode::Lt => "lt",
            MatchMode::Lte => "lte",
            MatchMode::Gt => "gt",
            MatchMode::Gte => "gte",
            MatchMode::Between => "between",
            MatchMode::In => "in",
            MatchMode::DateIs => "dateIs",
            MatchMode::DateIsNot => "dateIsNot",
            MatchMode::DateBefore => "dateBefore",
            MatchMode::DateAfter => "dateAfter",
        }
    }

    /// Looks up a match mode by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the constraints of one filter are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    /// Returns the wire name: `and` or `or`.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

/// A single `{value, matchMode}` pair.
///
/// `value` is passed to the server as-is. Its shape is never checked
/// against `match_mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConstraint {
    pub value: Value,
    pub match_mode: MatchMode,
}

impl FilterConstraint {
    /// Creates a constraint with any match mode.
    pub fn new(match_mode: MatchMode, value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            match_mode,
        }
    }

    /// `contains` constraint.
    pub fn contains(value: impl Into<Value>) -> Self {
        Self::new(MatchMode::Contains, value)
    }

    /// `equals` constraint.
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::new(MatchMode::Equals, value)
    }

    /// `between` constraint with a `[low, high]` value.
    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(MatchMode::Between, Value::Array(vec![low.into(), high.into()]))
    }

    /// `in` constraint with an array value.
    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(
            MatchMode::In,
            Value::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Returns `true` if the value is `null`, an empty string or an empty array.
    ///
    /// Blank constraints are still sent to the server.
    pub fn is_blank(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// A filter on one column: constraints joined by an operator.
///
/// # Example
///
/// ```
/// use datatable_lib::query::{Filter, FilterConstraint, Operator};
///
/// let filter = Filter::or([
///     FilterConstraint::contains("acme"),
///     FilterConstraint::contains("contoso"),
/// ]);
/// assert_eq!(filter.operator, Operator::Or);
/// assert_eq!(filter.constraints.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub operator: Operator,
    pub constraints: Vec<FilterConstraint>,
}

impl Filter {
    /// Creates an empty filter with the given operator.
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            constraints: Vec::new(),
        }
    }

    /// Creates a filter whose constraints must all match.
    pub fn and(constraints: impl IntoIterator<Item = FilterConstraint>) -> Self {
        Self {
            operator: Operator::And,
            constraints: constraints.into_iter().collect(),
        }
    }

    /// Creates a filter where any constraint may match.
    pub fn or(constraints: impl IntoIterator<Item = FilterConstraint>) -> Self {
        Self {
            operator: Operator::Or,
            constraints: constraints.into_iter().collect(),
        }
    }

    /// Creates an `and` filter with a single constraint.
    pub fn single(match_mode: MatchMode, value: impl Into<Value>) -> Self {
        Self::and([FilterConstraint::new(match_mode, value)])
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: FilterConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns `true` if every constraint is blank (or there are none).
    pub fn is_blank(&self) -> bool {
        self.constraints.iter().all(FilterConstraint::is_blank)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_match_mode_wire_names_agree_with_serde() {
        for mode in MatchMode::ALL {
            let encoded = serde_json::to_value(mode).unwrap();
            assert_eq!(encoded, Value::String(mode.as_str().to_string()));
            assert_eq!(MatchMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(MatchMode::from_name("like"), None);
    }

    #[test]
    fn test_filter_json_shape() {
        let filter = Filter::single(MatchMode::StartsWith, "Jo");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "operator": "and",
                "constraints": [{"value": "Jo", "matchMode": "startsWith"}]
            })
        );
    }

    #[test]
    fn test_decodes_filter_from_grid_payload() {
        let filter: Filter = serde_json::from_value(json!({
            "operator": "or",
            "constraints": [
                {"value": null, "matchMode": "dateBefore"},
                {"value": [1, 5], "matchMode": "between"}
            ]
        }))
        .unwrap();
        assert_eq!(filter.operator, Operator::Or);
        assert_eq!(filter.constraints[1], FilterConstraint::between(1, 5));
        assert!(!filter.is_blank());
    }

    #[test]
    fn test_value_shape_is_not_validated() {
        // `between` with a scalar is accepted and left for the server to reject.
        let constraint = FilterConstraint::new(MatchMode::Between, "oops");
        assert_eq!(constraint.value, json!("oops"));
    }

    #[test]
    fn test_blank_constraints() {
        assert!(FilterConstraint::contains(Value::Null).is_blank());
        assert!(FilterConstraint::contains("").is_blank());
        assert!(!FilterConstraint::equals(0).is_blank());
        assert!(Filter::new(Operator::And).is_blank());
    }
}
