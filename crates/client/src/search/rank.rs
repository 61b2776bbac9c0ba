//! Rank and sort order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ApiVersion;

/// Sort direction of a [`Rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the keyword used by the structured dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field and direction controlling result order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    /// The field to rank by.
    pub field: String,
    /// The direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl Rank {
    /// Ascending rank on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending rank on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parses `field` (ascending) or `-field` (descending).
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(input),
        }
    }
}

/// Renders the rank fragment for the given API version, without the parameter name.
pub fn normalize(rank: &Rank, api_version: ApiVersion) -> String {
    api_version.dialect().rank_fragment(rank)
}
