//! Boolean filter trees.
//!
//! A [`Filter`] is either a logic node (`and`, `or`, `not`) over ordered
//! children, or a single field condition. Children render in insertion order.
//!
//! ```
//! use cloudsearch_client::search::{Filter, FilterValue};
//!
//! let filter = Filter::or([
//!     Filter::condition("is_donut", true),
//!     Filter::and([
//!         Filter::condition("round", ""),
//!         Filter::condition("frosting", FilterValue::Empty),
//!     ]),
//! ]);
//! assert_eq!(filter.children().len(), 2);
//! ```

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::error::ConfigError;

static RANGE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d*\.\.\d*$").expect("range literal pattern is valid"));

/// Returns `true` if `s` is a bare numeric range such as `10..20`, `..20` or `10..`.
pub fn is_range_literal(s: &str) -> bool {
    RANGE_LITERAL.is_match(s)
}

/// A boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    /// All children must match.
    And,
    /// Any child may match.
    Or,
    /// Negation.
    Not,
}

impl LogicOp {
    /// Returns the query-language keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
            LogicOp::Not => "not",
        }
    }

    /// Parses an operator keyword. Matching is case-sensitive.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "and" => Some(LogicOp::And),
            "or" => Some(LogicOp::Or),
            "not" => Some(LogicOp::Not),
            _ => None,
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value side of a field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Rendered unquoted: `field:42`.
    Integer(i64),
    /// A preformatted numeric range rendered verbatim: `field:10..20`.
    RangeLiteral(String),
    /// Rendered as quoted UTC timestamps: `field:['2024-01-01T00:00:00Z','2024-02-01T00:00:00Z']`.
    DateRange {
        /// Inclusive lower bound.
        start: DateTime<Utc>,
        /// Inclusive upper bound.
        end: DateTime<Utc>,
    },
    /// Rendered as `field:[start,end]`.
    NumericRange {
        /// Inclusive lower bound.
        start: f64,
        /// Inclusive upper bound.
        end: f64,
    },
    /// Rendered single-quoted: `field:'value'`.
    Scalar(String),
    /// Pruned before rendering.
    Empty,
}

impl FilterValue {
    /// Creates a date range.
    pub fn date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        FilterValue::DateRange { start, end }
    }

    /// Creates a numeric range.
    pub fn numeric_range(start: f64, end: f64) -> Self {
        FilterValue::NumericRange { start, end }
    }

    /// Returns `true` if this value contributes nothing when rendered: empty
    /// strings, and numeric ranges with a NaN or infinite bound.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Empty => true,
            FilterValue::Scalar(s) | FilterValue::RangeLiteral(s) => s.is_empty(),
            FilterValue::NumericRange { start, end } => !start.is_finite() || !end.is_finite(),
            _ => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            FilterValue::Empty
        } else if is_range_literal(s) {
            FilterValue::RangeLiteral(s.to_string())
        } else {
            FilterValue::Scalar(s.to_string())
        }
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::from(s.as_str())
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        FilterValue::from(s.as_str())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Scalar(b.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Integer(n.into())
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Integer(n.into())
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Scalar(n.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Empty, Into::into)
    }
}

impl From<RangeInclusive<i64>> for FilterValue {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (start, end) = range.into_inner();
        FilterValue::NumericRange {
            start: start as f64,
            end: end as f64,
        }
    }
}

impl From<RangeInclusive<f64>> for FilterValue {
    fn from(range: RangeInclusive<f64>) -> Self {
        let (start, end) = range.into_inner();
        FilterValue::NumericRange { start, end }
    }
}

/// Converted to the closed range `start..=end - 1`; an empty range is [`FilterValue::Empty`].
impl From<Range<i64>> for FilterValue {
    fn from(range: Range<i64>) -> Self {
        if range.is_empty() {
            return FilterValue::Empty;
        }
        FilterValue::from(range.start..=range.end - 1)
    }
}

impl From<RangeInclusive<DateTime<Utc>>> for FilterValue {
    fn from(range: RangeInclusive<DateTime<Utc>>) -> Self {
        let (start, end) = range.into_inner();
        FilterValue::DateRange { start, end }
    }
}

impl From<RangeInclusive<NaiveDate>> for FilterValue {
    fn from(range: RangeInclusive<NaiveDate>) -> Self {
        let (start, end) = range.into_inner();
        FilterValue::DateRange {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end: end.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

/// Converted to the closed range ending on the day before `end`; an empty
/// range is [`FilterValue::Empty`].
impl From<Range<NaiveDate>> for FilterValue {
    fn from(range: Range<NaiveDate>) -> Self {
        match range.end.pred_opt() {
            Some(last) if range.start < range.end => FilterValue::from(range.start..=last),
            _ => FilterValue::Empty,
        }
    }
}

/// A node in a boolean filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// An operator applied to ordered children.
    Logic {
        /// The operator.
        op: LogicOp,
        /// Children in insertion order.
        children: Vec<Filter>,
    },
    /// A single `field:value` condition.
    Condition {
        /// Field name.
        field: String,
        /// Field value.
        value: FilterValue,
    },
    /// Sibling filters rendered one after another without a wrapping operator.
    Sequence(Vec<Filter>),
}

impl Filter {
    /// Creates a logic node.
    pub fn logic(op: LogicOp, children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Logic {
            op,
            children: children.into_iter().collect(),
        }
    }

    /// Creates an `and` node.
    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::logic(LogicOp::And, children)
    }

    /// Creates an `or` node.
    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::logic(LogicOp::Or, children)
    }

    /// Creates a `not` node.
    pub fn not(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::logic(LogicOp::Not, children)
    }

    /// Creates a field condition.
    pub fn condition(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Condition {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a sequence of sibling filters.
    pub fn sequence(members: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Sequence(members.into_iter().collect())
    }

    /// Appends a child to a logic node or sequence. Conditions are left unchanged.
    pub fn push(&mut self, child: Filter) {
        match self {
            Filter::Logic { children, .. } | Filter::Sequence(children) => children.push(child),
            Filter::Condition { .. } => {}
        }
    }

    /// Builder form of [`push`](Self::push) for a condition.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.push(Filter::condition(field, value));
        self
    }

    /// Returns the children of a logic node or sequence, or an empty slice for a condition.
    pub fn children(&self) -> &[Filter] {
        match self {
            Filter::Logic { children, .. } | Filter::Sequence(children) => children,
            Filter::Condition { .. } => &[],
        }
    }

    /// Builds a filter from a JSON object.
    ///
    /// Keys `and`, `or` and `not` whose values are objects become logic
    /// nodes; every other key is a field name. An object with one key yields
    /// that filter; an object with several keys yields a
    /// [`Filter::Sequence`] of its members in order.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let mut filters = Self::list_from_json(value)?;
        if filters.len() == 1 {
            Ok(filters.remove(0))
        } else {
            Ok(Filter::Sequence(filters))
        }
    }

    /// Builds the sibling filters described by the members of a JSON object.
    pub fn list_from_json(value: &Value) -> Result<Vec<Self>, ConfigError> {
        let object = value.as_object().ok_or_else(|| ConfigError::InvalidFilter {
            message: format!("expected an object, found {}", json_kind(value)),
        })?;

        object
            .iter()
            .map(|(key, child)| match (LogicOp::from_keyword(key), child) {
                (Some(op), Value::Object(_)) => {
                    Ok(Filter::logic(op, Self::list_from_json(child)?))
                }
                _ => Ok(Filter::condition(key.clone(), value_from_json(key, child)?)),
            })
            .collect()
    }
}

fn value_from_json(field: &str, value: &Value) -> Result<FilterValue, ConfigError> {
    match value {
        Value::Null => Ok(FilterValue::Empty),
        Value::Bool(b) => Ok((*b).into()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(FilterValue::Integer(i)),
            None => Ok(FilterValue::Scalar(n.to_string())),
        },
        Value::String(s) => Ok(s.as_str().into()),
        Value::Array(items) if items.len() == 2 => range_from_json(field, &items[0], &items[1]),
        other => Err(ConfigError::InvalidFilter {
            message: format!("unsupported {} value for field '{}'", json_kind(other), field),
        }),
    }
}

fn range_from_json(field: &str, start: &Value, end: &Value) -> Result<FilterValue, ConfigError> {
    if let (Some(start), Some(end)) = (start.as_f64(), end.as_f64()) {
        return Ok(FilterValue::NumericRange { start, end });
    }

    let parse = |v: &Value| {
        v.as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    };

    match (parse(start), parse(end)) {
        (Some(start), Some(end)) => Ok(FilterValue::DateRange { start, end }),
        _ => Err(ConfigError::InvalidFilter {
            message: format!(
                "range for field '{}' must be two numbers or two RFC 3339 timestamps",
                field
            ),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
