//! Filter types for dynamic query building.

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Case-insensitive pattern match.
    ILike,
}

impl FilterOp {
    /// Operator keyword as used by query gateways.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::ILike => "ilike",
        }
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: String,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for a case-insensitive substring match.
    ///
    /// The needle is wrapped in `*` wildcards, the gateway's spelling of `%`.
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Self::new(field, FilterOp::ILike, format!("*{needle}*"))
    }
}

/// A filter clause. Top-level clauses are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// A single condition.
    Field(FilterField),
    /// Matches when any of the conditions match.
    AnyOf(Vec<FilterField>),
}
