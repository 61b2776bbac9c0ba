//! CloudSearch client
//!
//! This crate translates structured search requests into CloudSearch query
//! URLs and submits document batches to a CloudSearch domain. It speaks two
//! API versions and can run in a sandbox mode that never touches the network.
//!
//! # Features
//!
//! - **Boolean filters**: nested `and`/`or`/`not` trees compiled to the
//!   service's prefix query syntax, with range, date and numeric leaves
//! - **Two API versions**: `2011-02-01` (`bq`, `rank`) and `2013-01-01`
//!   (structured parser, `sort`, cursors), selected per client
//! - **Pagination**: page/size to `start` offsets and page metadata on results
//! - **Documents**: add, update and delete batches with value normalization
//! - **Sandbox mode**: searches return an empty page, document calls do nothing
//!
//! # Architecture
//!
//! - [`search`] - Filter trees, filter compiler, rank normalizer, URL builder
//! - [`dialect`] - Per-version syntax behind the [`QueryDialect`](dialect::QueryDialect) trait
//! - [`results`] - Paginated search results
//! - [`documents`] - Document batch envelopes
//! - [`transport`] - The [`HttpTransport`](transport::HttpTransport) seam and its `reqwest` implementation
//! - [`client`] - The [`CloudSearchClient`] facade
//! - [`config`] - Configuration and environment variables
//! - [`error`] - Error types for all operations
//!
//! # Compiling Filters
//!
//! ```
//! use cloudsearch_client::ApiVersion;
//! use cloudsearch_client::search::{Filter, FilterValue, compile};
//!
//! let filter = Filter::and([
//!     Filter::condition("genre", "fantasy"),
//!     Filter::condition("year", "2000..2010"),
//!     Filter::condition("subtitle", FilterValue::Empty),
//! ]);
//! assert_eq!(
//!     compile(&filter, ApiVersion::Legacy),
//!     "(and genre:'fantasy' year:2000..2010)"
//! );
//! ```
//!
//! # Building Search URLs
//!
//! ```
//! use cloudsearch_client::ApiVersion;
//! use cloudsearch_client::search::{Filter, Rank, SearchOptions, build_search_url};
//!
//! let options = SearchOptions::default()
//!     .with_filter(Filter::and([Filter::condition("genre", "fantasy")]))
//!     .with_rank(Rank::desc("year"))
//!     .with_page_size(20)
//!     .with_page(3);
//!
//! let url = build_search_url("books", "us-east-1", ApiVersion::Legacy, "dragon", &options);
//! assert_eq!(
//!     url,
//!     "http://search-books.us-east-1.cloudsearch.amazonaws.com/2011-02-01/search?\
//!      q=dragon&bq=%28and+genre%3A%27fantasy%27%29&size=20&start=40&rank=-year"
//! );
//! ```
//!
//! # Searching
//!
//! ```no_run
//! use cloudsearch_client::{CloudSearchClient, CloudSearchConfig};
//! use cloudsearch_client::search::SearchOptions;
//!
//! # async fn run() -> cloudsearch_client::Result<()> {
//! let client = CloudSearchClient::new(CloudSearchConfig::new("books-abc123"))?;
//! let results = client
//!     .search("dragon", &SearchOptions::default().with_return_fields(["title"]))
//!     .await?;
//!
//! for id in &results {
//!     println!("{id}: {:?}", results.document(id));
//! }
//! println!("page {} of {}", results.current_page(), results.total_pages());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod dialect;
pub mod documents;
pub mod error;
pub mod indexable;
pub mod results;
pub mod search;
pub mod transport;

// Re-export commonly used types at crate root
pub use client::CloudSearchClient;
pub use config::{ApiVersion, CloudSearchConfig, Mode};
pub use documents::{BatchResponse, DocumentBatch, DocumentOperation, FieldValue, Fields};
pub use error::{
    CloudSearchError, ConfigError, DocumentError, Result, SearchError, TransportError,
    TransportErrorKind,
};
pub use indexable::Indexable;
pub use results::{Hits, SearchResults};
pub use search::{Filter, FilterValue, Rank, SearchOptions, SortDirection};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
