//! The `2013-01-01` dialect.

use chrono::{DateTime, Utc};

use crate::config::ApiVersion;
use crate::search::Rank;
use crate::search::compiler::quote;

use super::QueryDialect;

/// Structured-parser queries, `sort=field dir`, `return`, cursors.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDialect;

impl QueryDialect for StructuredDialect {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::Structured
    }

    fn default_page_size(&self) -> u32 {
        100
    }

    fn rank_fragment(&self, rank: &Rank) -> String {
        format!("{} {}", rank.field, rank.direction)
    }

    fn rank_param(&self) -> &'static str {
        "sort"
    }

    fn return_fields_param(&self) -> &'static str {
        "return"
    }

    fn query_params(&self, term: &str, filter: Option<&str>) -> Vec<(&'static str, String)> {
        match filter {
            Some(filter) if !term.is_empty() => vec![
                ("q", format!("(and {} {})", quote(term), filter)),
                ("q.parser", "structured".to_string()),
            ],
            Some(filter) => vec![
                ("q", filter.to_string()),
                ("q.parser", "structured".to_string()),
            ],
            None => vec![("q", term.to_string())],
        }
    }

    fn supports_cursor(&self) -> bool {
        true
    }

    fn hit_fields_key(&self) -> &'static str {
        "fields"
    }

    fn document_version(&self, _now: DateTime<Utc>) -> Option<i64> {
        None
    }

    fn document_lang(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_and_filter_are_combined() {
        let params = StructuredDialect.query_params("donuts", Some("(or a:'b')"));
        assert_eq!(params[0], ("q", "(and 'donuts' (or a:'b'))".to_string()));
        assert_eq!(params[1], ("q.parser", "structured".to_string()));
    }

    #[test]
    fn test_filter_without_term() {
        let params = StructuredDialect.query_params("", Some("(or a:'b')"));
        assert_eq!(params[0], ("q", "(or a:'b')".to_string()));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_term_without_filter() {
        assert_eq!(
            StructuredDialect.query_params("donuts", None),
            vec![("q", "donuts".to_string())]
        );
    }

    #[test]
    fn test_term_is_quoted_safely() {
        let params = StructuredDialect.query_params("bob's", Some("x:1"));
        assert_eq!(params[0].1, r"(and 'bob\'s' x:1)");
    }
}
