//! The `2011-02-01` dialect.

use chrono::{DateTime, Utc};

use crate::config::ApiVersion;
use crate::search::{Rank, SortDirection};

use super::QueryDialect;

/// Flat `q` + `bq` queries, `rank=-field`, `return-fields`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDialect;

impl QueryDialect for LegacyDialect {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::Legacy
    }

    fn default_page_size(&self) -> u32 {
        10
    }

    fn rank_fragment(&self, rank: &Rank) -> String {
        match rank.direction {
            SortDirection::Asc => rank.field.clone(),
            SortDirection::Desc => format!("-{}", rank.field),
        }
    }

    fn rank_param(&self) -> &'static str {
        "rank"
    }

    fn return_fields_param(&self) -> &'static str {
        "return-fields"
    }

    fn query_params(&self, term: &str, filter: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", term.to_string())];
        if let Some(filter) = filter {
            params.push(("bq", filter.to_string()));
        }
        params
    }

    fn supports_cursor(&self) -> bool {
        false
    }

    fn hit_fields_key(&self) -> &'static str {
        "data"
    }

    fn document_version(&self, now: DateTime<Utc>) -> Option<i64> {
        Some(now.timestamp())
    }

    fn document_lang(&self) -> Option<&'static str> {
        Some("en")
    }
}
