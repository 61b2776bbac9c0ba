//! Per-version query dialects.
//!
//! The two supported API versions share the boolean filter grammar but
//! differ in parameter names, rank syntax, how a free-text term and a filter
//! are combined, and a few document-envelope details. Each version is a
//! [`QueryDialect`]; the query builder, result parser and document builder
//! only ever talk to the trait.

mod legacy;
mod structured;

use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::config::ApiVersion;
use crate::search::compiler;
use crate::search::{FilterValue, Rank};

pub use legacy::LegacyDialect;
pub use structured::StructuredDialect;

/// Version-specific query and document syntax.
pub trait QueryDialect: Debug + Send + Sync {
    /// The API version this dialect speaks.
    fn api_version(&self) -> ApiVersion;

    /// Page size used when the caller does not give one.
    fn default_page_size(&self) -> u32;

    /// Renders one filter condition. Both versions share the leaf grammar.
    fn render_condition(&self, field: &str, value: &FilterValue) -> Option<String> {
        compiler::render_condition(field, value)
    }

    /// Renders a rank as the value of the rank parameter.
    fn rank_fragment(&self, rank: &Rank) -> String;

    /// Name of the rank/sort query parameter.
    fn rank_param(&self) -> &'static str;

    /// Name of the return-fields query parameter.
    fn return_fields_param(&self) -> &'static str;

    /// Query parameters carrying the term and the compiled filter.
    ///
    /// Values are unescaped; `filter` is `None` when there is no filter or it
    /// compiled to an empty fragment.
    fn query_params(&self, term: &str, filter: Option<&str>) -> Vec<(&'static str, String)>;

    /// Whether the `cursor` parameter is understood.
    fn supports_cursor(&self) -> bool;

    /// Key of the per-hit field map in search responses.
    fn hit_fields_key(&self) -> &'static str;

    /// Document version stamped on batch operations, if the version requires one.
    fn document_version(&self, now: DateTime<Utc>) -> Option<i64>;

    /// Language tag stamped on add operations, if the version requires one.
    fn document_lang(&self) -> Option<&'static str>;
}
