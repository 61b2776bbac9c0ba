//! Search query translation.
//!
//! Translates a free-text term plus [`SearchOptions`] into a CloudSearch
//! search URL: boolean filters are compiled by [`compiler`], rank
//! expressions by [`rank`], and the final URL is assembled by
//! [`query_builder`].

pub mod compiler;
pub mod filter;
pub mod query_builder;
pub mod rank;

pub use compiler::compile;
pub use filter::{Filter, FilterValue, LogicOp};
pub use query_builder::{SearchUrlBuilder, build_search_url, build_search_url_with_endpoint};
pub use rank::{Rank, SortDirection, normalize};

/// Options for a search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Boolean filter.
    pub filter: Option<Filter>,
    /// Results per page; the dialect default applies when `None` or zero.
    pub page_size: Option<u32>,
    /// 1-based page number. When set, a `start` offset is always sent.
    pub page: Option<u32>,
    /// Fields to return with each hit. When empty only ids are returned.
    pub return_fields: Vec<String>,
    /// Result ordering.
    pub rank: Option<Rank>,
    /// Deep-paging cursor (`2013-01-01` only).
    pub cursor: Option<String>,
}

impl SearchOptions {
    /// Sets the filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the fields returned with each hit.
    pub fn with_return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sets the cursor.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Returns `true` if hits should carry field maps.
    pub fn wants_fields(&self) -> bool {
        !self.return_fields.is_empty()
    }
}
