//! Filter compiler.
//!
//! Renders a [`Filter`] tree into the boolean query language shared by both
//! API versions. Logic nodes render as `(op<children>)`, conditions as
//! ` field:value`, sequences as their members back to back. Empty conditions
//! are pruned, and a logic node whose children all pruned away disappears
//! from its parent.

use chrono::{DateTime, Utc};

use crate::config::ApiVersion;
use crate::dialect::QueryDialect;

use super::filter::{Filter, FilterValue};

/// Timestamp format used for date ranges and document fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Formats a timestamp the way the service expects (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Wraps a literal in single quotes, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Compiles a filter for the given API version.
pub fn compile(filter: &Filter, api_version: ApiVersion) -> String {
    compile_with(filter, api_version.dialect())
}

/// Compiles a filter with an explicit dialect.
pub fn compile_with(filter: &Filter, dialect: &dyn QueryDialect) -> String {
    match filter {
        Filter::Logic { op, children } => {
            let fragment = render_children(children, dialect);
            if fragment.is_empty() {
                String::new()
            } else {
                format!("({}{})", op, fragment)
            }
        }
        Filter::Condition { field, value } => {
            dialect.render_condition(field, value).unwrap_or_default()
        }
        Filter::Sequence(members) => render_children(members, dialect).trim_start().to_string(),
    }
}

/// Concatenates children in order: conditions with a leading space, nested
/// nodes as-is. Pruned children contribute nothing.
fn render_children(children: &[Filter], dialect: &dyn QueryDialect) -> String {
    let mut fragment = String::new();
    for child in children {
        match child {
            Filter::Condition { field, value } => {
                if let Some(condition) = dialect.render_condition(field, value) {
                    fragment.push(' ');
                    fragment.push_str(&condition);
                }
            }
            Filter::Logic { .. } => fragment.push_str(&compile_with(child, dialect)),
            Filter::Sequence(members) => fragment.push_str(&render_children(members, dialect)),
        }
    }
    fragment
}

/// Renders a single condition, or `None` when the value is empty.
pub fn render_condition(field: &str, value: &FilterValue) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let rendered = match value {
        FilterValue::Integer(n) => format!("{}:{}", field, n),
        FilterValue::RangeLiteral(range) => format!("{}:{}", field, range),
        FilterValue::DateRange { start, end } => format!(
            "{}:[{},{}]",
            field,
            quote(&format_timestamp(start)),
            quote(&format_timestamp(end))
        ),
        FilterValue::NumericRange { start, end } => format!("{}:[{},{}]", field, start, end),
        FilterValue::Scalar(s) => format!("{}:{}", field, quote(s)),
        FilterValue::Empty => return None,
    };

    Some(rendered)
}
