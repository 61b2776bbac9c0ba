//! Error types for the CloudSearch client.
//!
//! Errors are grouped by the phase that produced them: configuration problems
//! detected before any request is built, failures while searching, and
//! failures while submitting document batches. Transport-level failures are
//! wrapped into the search or document error of the operation that issued
//! them, keeping the original [`TransportError`] as the error source.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CloudSearchError>;

/// The primary error type for all client operations.
#[derive(Error, Debug)]
pub enum CloudSearchError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Search request errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Document batch errors
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors related to client configuration and request input.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting was not provided before use.
    #[error("missing configuration: {setting} must be set before use")]
    MissingConfiguration { setting: String },

    /// The API version string is not one of the supported versions.
    #[error("unsupported API version: {version}")]
    UnsupportedApiVersion { version: String },

    /// The mode string is neither `live` nor `sandbox`.
    #[error("invalid mode: {mode} (expected 'live' or 'sandbox')")]
    InvalidMode { mode: String },

    /// A JSON filter document could not be turned into a filter tree.
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// The HTTP transport could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

/// Errors raised while executing a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The transport failed before a response was received.
    #[error("search request to {url} failed: {kind}: {message}")]
    Transport {
        url: String,
        kind: TransportErrorKind,
        message: String,
        #[source]
        source: TransportError,
    },

    /// The service answered with a non-success status code.
    #[error("search request to {url} returned {status} {status_message}")]
    Status {
        url: String,
        status: u16,
        status_message: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed search response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

/// Errors raised while submitting a document batch.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The transport failed before a response was received.
    #[error("document batch to {url} failed: {kind}: {message}")]
    Transport {
        url: String,
        kind: TransportErrorKind,
        message: String,
        #[source]
        source: TransportError,
    },

    /// The service answered with a non-success status code.
    #[error("document batch to {url} returned {status} {status_message}")]
    Status {
        url: String,
        status: u16,
        status_message: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed document response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// The batch could not be serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// A failure reported by an [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates a transport error without an underlying cause.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// The class of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The request timed out.
    Timeout,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Decode,
    /// Anything else.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Request => write!(f, "request"),
            TransportErrorKind::Decode => write!(f, "decode"),
            TransportErrorKind::Other => write!(f, "other"),
        }
    }
}

impl SearchError {
    /// Wraps a transport failure for the given URL.
    pub fn transport(url: impl Into<String>, source: TransportError) -> Self {
        SearchError::Transport {
            url: url.into(),
            kind: source.kind,
            message: source.message.clone(),
            source,
        }
    }
}

impl DocumentError {
    /// Wraps a transport failure for the given URL.
    pub fn transport(url: impl Into<String>, source: TransportError) -> Self {
        DocumentError::Transport {
            url: url.into(),
            kind: source.kind,
            message: source.message.clone(),
            source,
        }
    }
}

impl CloudSearchError {
    /// Returns `true` if this is a missing-configuration error.
    pub fn is_missing_configuration(&self) -> bool {
        matches!(
            self,
            CloudSearchError::Config(ConfigError::MissingConfiguration { .. })
        )
    }

    /// Returns the HTTP status carried by a search or document failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudSearchError::Search(SearchError::Status { status, .. })
            | CloudSearchError::Document(DocumentError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
