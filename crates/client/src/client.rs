//! The CloudSearch client facade.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{ApiVersion, CloudSearchConfig, Mode};
use crate::dialect::QueryDialect;
use crate::documents::{BatchResponse, DocumentBatch, Fields};
use crate::error::{ConfigError, DocumentError, Result, SearchError};
use crate::indexable::Indexable;
use crate::results::SearchResults;
use crate::search::{SearchOptions, SearchUrlBuilder};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Client for one CloudSearch domain.
///
/// Searches go to the domain's search service, document batches to its
/// document service. In [`Mode::Sandbox`] no request is ever sent: searches
/// return an empty first page and document operations return `None`.
pub struct CloudSearchClient {
    config: CloudSearchConfig,
    transport: Arc<dyn HttpTransport>,
}

impl Debug for CloudSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSearchClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CloudSearchClient {
    /// Creates a client backed by [`ReqwestTransport`].
    pub fn new(config: CloudSearchConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.request_timeout_ms))
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client with configuration read from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(CloudSearchConfig::from_env())
    }

    /// Creates a client using the given transport.
    pub fn with_transport(config: CloudSearchConfig, transport: Arc<dyn HttpTransport>) -> Self {
        debug!(
            api_version = %config.api_version,
            mode = %config.mode,
            "CloudSearch client configured"
        );
        Self { config, transport }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &CloudSearchConfig {
        &self.config
    }

    /// Returns the query dialect of the configured API version.
    pub fn dialect(&self) -> &'static dyn QueryDialect {
        self.config.api_version.dialect()
    }

    /// Sets the search domain.
    pub fn set_search_domain(&mut self, domain: impl Into<String>) {
        self.config.search_domain = Some(domain.into());
    }

    /// Sets the AWS region.
    pub fn set_aws_region(&mut self, region: impl Into<String>) {
        self.config.aws_region = region.into();
    }

    /// Sets the API version.
    pub fn set_api_version(&mut self, api_version: ApiVersion) {
        self.config.api_version = api_version;
    }

    /// Switches between live and sandbox mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    /// Returns the URL [`search`](Self::search) would request.
    ///
    /// The URL is built in sandbox mode too, so the domain must be set.
    pub fn search_url(&self, term: &str, options: &SearchOptions) -> Result<String> {
        let domain = self.config.require_search_domain()?;
        Ok(SearchUrlBuilder::new(self.config.search_host(domain), self.dialect()).build(term, options))
    }

    /// Runs a search and returns one page of results.
    pub async fn search(&self, term: &str, options: &SearchOptions) -> Result<SearchResults> {
        if self.config.mode.is_sandbox() {
            debug!(term, "Sandbox mode, skipping search request");
            return Ok(SearchResults::sandbox());
        }

        let domain = self.config.require_search_domain()?;
        let dialect = self.dialect();
        let builder = SearchUrlBuilder::new(self.config.search_host(domain), dialect);
        let url = builder.build(term, options);
        let page_size = builder.page_size(options);

        debug!(url = %url, "Sending search request");

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| SearchError::transport(&url, e))?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Search request failed");
            return Err(SearchError::Status {
                url,
                status: response.status,
                status_message: response.status_message(),
            }
            .into());
        }

        let fields_key = options.wants_fields().then(|| dialect.hit_fields_key());
        let results = SearchResults::from_response(&response.body, page_size, fields_key)
            .ok_or_else(|| SearchError::MalformedResponse {
                url: url.clone(),
                message: "response has no hits object".to_string(),
            })?;

        debug!(
            url = %url,
            found = results.total_entries(),
            returned = results.len(),
            "Search completed"
        );
        Ok(results)
    }

    /// Builds the batch that [`add_item`](Self::add_item) would submit.
    ///
    /// Returns `None` in sandbox mode.
    pub fn build_add_batch(&self, id: &str, fields: Fields) -> Option<DocumentBatch> {
        if self.config.mode.is_sandbox() {
            debug!(id, "Sandbox mode, skipping add batch");
            return None;
        }
        Some(DocumentBatch::add(id, fields, self.dialect()))
    }

    /// Builds the batch that [`remove_item`](Self::remove_item) would submit.
    ///
    /// Returns `None` in sandbox mode.
    pub fn build_delete_batch(&self, id: &str) -> Option<DocumentBatch> {
        if self.config.mode.is_sandbox() {
            debug!(id, "Sandbox mode, skipping delete batch");
            return None;
        }
        Some(DocumentBatch::delete(id, self.dialect()))
    }

    /// Adds (or replaces) a document.
    ///
    /// Returns `Ok(None)` in sandbox mode.
    pub async fn add_item(&self, id: &str, fields: Fields) -> Result<Option<BatchResponse>> {
        match self.build_add_batch(id, fields) {
            Some(batch) => self.submit(batch).await.map(Some),
            None => Ok(None),
        }
    }

    /// Same as [`add_item`](Self::add_item); adds replace existing documents.
    pub async fn update_item(&self, id: &str, fields: Fields) -> Result<Option<BatchResponse>> {
        self.add_item(id, fields).await
    }

    /// Deletes a document.
    ///
    /// Returns `Ok(None)` in sandbox mode.
    pub async fn remove_item(&self, id: &str) -> Result<Option<BatchResponse>> {
        match self.build_delete_batch(id) {
            Some(batch) => self.submit(batch).await.map(Some),
            None => Ok(None),
        }
    }

    /// Adds `model`, or deletes it when [`Indexable::should_index`] is `false`.
    pub async fn index<T: Indexable + ?Sized>(&self, model: &T) -> Result<Option<BatchResponse>> {
        let id = model.document_id();
        if model.should_index() {
            self.add_item(&id, model.document_fields()).await
        } else {
            self.remove_item(&id).await
        }
    }

    /// Deletes `model` from the index.
    pub async fn unindex<T: Indexable + ?Sized>(&self, model: &T) -> Result<Option<BatchResponse>> {
        self.remove_item(&model.document_id()).await
    }

    async fn submit(&self, batch: DocumentBatch) -> Result<BatchResponse> {
        let url = self.config.document_batch_url()?;
        let body = batch.to_json()?;

        info!(
            url = %url,
            operations = batch.operations().len(),
            "Submitting document batch"
        );

        let response = self
            .transport
            .post(&url, body, &[("Content-Type", batch.content_type())])
            .await
            .map_err(|e| DocumentError::transport(&url, e))?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Document batch failed");
            return Err(DocumentError::Status {
                url,
                status: response.status,
                status_message: response.status_message(),
            }
            .into());
        }

        let parsed: BatchResponse =
            serde_json::from_value(response.body).map_err(|e| DocumentError::MalformedResponse {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !parsed.is_success() {
            warn!(
                url = %url,
                status = %parsed.status,
                errors = parsed.errors.len(),
                "Document service reported batch errors"
            );
        }

        Ok(parsed)
    }
}
