//! Client configuration.
//!
//! Configuration can be built programmatically, deserialized with serde, or
//! read from the environment with [`CloudSearchConfig::from_env`].
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CLOUDSEARCH_DOMAIN` | (unset) | Search domain name |
//! | `CLOUDSEARCH_REGION` | us-east-1 | AWS region |
//! | `CLOUDSEARCH_API_VERSION` | 2011-02-01 | API version |
//! | `CLOUDSEARCH_MODE` | live | `live` or `sandbox` |
//! | `CLOUDSEARCH_ENDPOINT` | (unset) | Service host override |
//!
//! # Example
//!
//! ```
//! use cloudsearch_client::{ApiVersion, CloudSearchConfig, Mode};
//!
//! let config = CloudSearchConfig {
//!     search_domain: Some("books-abc123".to_string()),
//!     api_version: ApiVersion::Structured,
//!     mode: Mode::Sandbox,
//!     ..Default::default()
//! };
//! assert_eq!(config.aws_region, "us-east-1");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::{LegacyDialect, QueryDialect, StructuredDialect};
use crate::error::ConfigError;

/// Environment variable holding the search domain.
pub const ENV_DOMAIN: &str = "CLOUDSEARCH_DOMAIN";
/// Environment variable holding the AWS region.
pub const ENV_REGION: &str = "CLOUDSEARCH_REGION";
/// Environment variable overriding the API version.
pub const ENV_API_VERSION: &str = "CLOUDSEARCH_API_VERSION";
/// Environment variable selecting live or sandbox mode.
pub const ENV_MODE: &str = "CLOUDSEARCH_MODE";
/// Environment variable overriding the service host.
pub const ENV_ENDPOINT: &str = "CLOUDSEARCH_ENDPOINT";

/// The supported CloudSearch API versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiVersion {
    /// `2011-02-01`: flat `bq` boolean queries, `rank`, `return-fields`.
    #[default]
    #[serde(rename = "2011-02-01")]
    Legacy,
    /// `2013-01-01`: structured query parser, `sort`, `return`, cursors.
    #[serde(rename = "2013-01-01")]
    Structured,
}

impl ApiVersion {
    /// Returns the literal version string used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::Legacy => "2011-02-01",
            ApiVersion::Structured => "2013-01-01",
        }
    }

    /// Returns the query dialect for this version.
    pub fn dialect(&self) -> &'static dyn QueryDialect {
        match self {
            ApiVersion::Legacy => &LegacyDialect,
            ApiVersion::Structured => &StructuredDialect,
        }
    }

    /// Resolves the API version: explicit value, then the environment, then the default.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let env_value = std::env::var(ENV_API_VERSION).ok();
        Self::resolve_with(explicit, env_value.as_deref())
    }

    /// Resolution with the environment value passed in.
    ///
    /// An explicit value must be valid. An unparseable environment value is
    /// logged and ignored.
    pub fn resolve_with(explicit: Option<&str>, env_value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(explicit) = explicit {
            return explicit.parse();
        }

        match env_value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => match raw.parse() {
                Ok(version) => Ok(version),
                Err(_) => {
                    tracing::warn!(
                        value = raw,
                        "Ignoring unsupported {}; using default {}",
                        ENV_API_VERSION,
                        ApiVersion::default()
                    );
                    Ok(ApiVersion::default())
                }
            },
            None => Ok(ApiVersion::default()),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2011-02-01" => Ok(ApiVersion::Legacy),
            "2013-01-01" => Ok(ApiVersion::Structured),
            other => Err(ConfigError::UnsupportedApiVersion {
                version: other.to_string(),
            }),
        }
    }
}

/// Whether the client talks to the service or short-circuits every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Requests go to the service.
    #[default]
    Live,
    /// No network I/O; searches return empty results and document
    /// operations do nothing.
    Sandbox,
}

impl Mode {
    /// Returns `true` in sandbox mode.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Mode::Sandbox)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Live => write!(f, "live"),
            Mode::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "sandbox" => Ok(Mode::Sandbox),
            _ => Err(ConfigError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Configuration for a [`CloudSearchClient`](crate::CloudSearchClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSearchConfig {
    /// Search domain name (e.g. `"books-abc123"`). Required for live requests.
    #[serde(default)]
    pub search_domain: Option<String>,

    /// AWS region (default: `"us-east-1"`).
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// API version (default: `2011-02-01`).
    #[serde(default)]
    pub api_version: ApiVersion,

    /// Live or sandbox mode (default: live).
    #[serde(default)]
    pub mode: Mode,

    /// Base URL replacing the `search-`/`doc-` service hosts,
    /// e.g. `"http://localhost:9200"`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for CloudSearchConfig {
    fn default() -> Self {
        Self {
            search_domain: None,
            aws_region: default_aws_region(),
            api_version: ApiVersion::default(),
            mode: Mode::default(),
            endpoint: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl CloudSearchConfig {
    /// Creates a live configuration for the given domain with defaults elsewhere.
    pub fn new(search_domain: impl Into<String>) -> Self {
        Self {
            search_domain: Some(search_domain.into()),
            ..Default::default()
        }
    }

    /// Reads configuration from `CLOUDSEARCH_*` environment variables.
    ///
    /// Unset variables keep their defaults. An invalid mode falls back to live.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let api_version = ApiVersion::resolve_with(None, var(ENV_API_VERSION).as_deref())
            .unwrap_or_default();

        let mode = match var(ENV_MODE) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using live mode", e);
                Mode::Live
            }),
            None => Mode::Live,
        };

        Self {
            search_domain: var(ENV_DOMAIN),
            aws_region: var(ENV_REGION).unwrap_or_else(default_aws_region),
            api_version,
            mode,
            endpoint: var(ENV_ENDPOINT),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the endpoint override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Returns the search domain or a missing-configuration error.
    pub fn require_search_domain(&self) -> Result<&str, ConfigError> {
        self.search_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ConfigError::MissingConfiguration {
                setting: "search_domain".to_string(),
            })
    }

    /// Base URL of the search service, without a trailing slash.
    pub fn search_host(&self, domain: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "http://search-{}.{}.cloudsearch.amazonaws.com",
                domain, self.aws_region
            ),
        }
    }

    /// Base URL of the document service, without a trailing slash.
    pub fn document_host(&self, domain: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "http://doc-{}.{}.cloudsearch.amazonaws.com",
                domain, self.aws_region
            ),
        }
    }

    /// Full URL of the document batch endpoint.
    pub fn document_batch_url(&self) -> Result<String, ConfigError> {
        let domain = self.require_search_domain()?;
        Ok(format!(
            "{}/{}/documents/batch",
            self.document_host(domain),
            self.api_version
        ))
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.mode.is_sandbox() && self.require_search_domain().is_err() {
            errors.push("Search domain must be set in live mode".to_string());
        }

        if self.aws_region.trim().is_empty() {
            errors.push("AWS region cannot be empty".to_string());
        }

        if self.request_timeout_ms == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if url::Url::parse(endpoint).is_err() {
                errors.push(format!("Endpoint is not a valid URL: {}", endpoint));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
