//! Translation of generic query types into REST gateway (PostgREST) syntax.

use joeview_core::types::{Filter, FilterField, SortField};

/// A read against one table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    /// Table or view name.
    pub relation: String,
    /// Selected columns.
    pub columns: Vec<String>,
    /// Filter clauses, combined with AND.
    pub filters: Vec<Filter>,
    /// Ordering, if any.
    pub order: Option<SortField>,
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
    /// Whether to ask for an exact count of all matching rows.
    pub count_exact: bool,
}

impl SelectQuery {
    /// Start a query selecting the given columns from a relation.
    pub fn new(relation: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            relation: relation.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            filters: Vec::new(),
            order: None,
            offset: None,
            limit: None,
            count_exact: false,
        }
    }

    /// Add a filter clause.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add several filter clauses.
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Order the result.
    pub fn order(mut self, order: SortField) -> Self {
        self.order = Some(order);
        self
    }

    /// Skip the first `offset` rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Request an exact total count alongside the rows.
    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Query string parameters for this read.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.join(","))];

        for filter in &self.filters {
            params.push(render_filter(filter));
        }
        if let Some(order) = &self.order {
            params.push((
                "order".to_string(),
                format!("{}.{}", order.field, order.direction.as_str()),
            ));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Render one clause as a `(key, value)` query parameter.
fn render_filter(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Field(field) => (
            field.field.clone(),
            format!("{}.{}", field.op.as_str(), field.value),
        ),
        Filter::AnyOf(fields) => {
            let parts: Vec<String> = fields.iter().map(render_tree_condition).collect();
            ("or".to_string(), format!("({})", parts.join(",")))
        }
    }
}

/// A condition inside a logic tree, with its value quoted.
///
/// Commas, dots, colons and parentheses are part of the tree grammar, so
/// the value is always double-quoted with `\` and `"` escaped.
fn render_tree_condition(field: &FilterField) -> String {
    format!(
        "{}.{}.{}",
        field.field,
        field.op.as_str(),
        quote_value(&field.value)
    )
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Total row count from a `Content-Range` header (`0-19/45`, `*/0`).
///
/// Returns `None` when the gateway did not compute a count (`0-19/*`).
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}
