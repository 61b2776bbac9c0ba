//! Command-line configuration.
//!
//! Global flags map onto [`CloudSearchConfig`] fields and read the same
//! `CLOUDSEARCH_*` environment variables as [`CloudSearchConfig::from_env`].
//! The API version is resolved through [`ApiVersion::resolve`], so an
//! unsupported `CLOUDSEARCH_API_VERSION` is ignored with a warning while an
//! unsupported `--api-version` is an error.

use clap::{Parser, Subcommand};

use cloudsearch_client::config::{ENV_DOMAIN, ENV_ENDPOINT, ENV_MODE, ENV_REGION};
use cloudsearch_client::search::{Filter, Rank, SearchOptions};
use cloudsearch_client::{ApiVersion, CloudSearchConfig, Mode};

/// Command-line configuration for the `cloudsearch` tool.
#[derive(Debug, Clone, Parser)]
#[command(name = "cloudsearch")]
#[command(about = "Search and index documents in a CloudSearch domain")]
pub struct CliConfig {
    /// Search domain name.
    #[arg(long, global = true, env = ENV_DOMAIN)]
    pub domain: Option<String>,

    /// AWS region.
    #[arg(long, global = true, env = ENV_REGION, default_value = "us-east-1")]
    pub region: String,

    /// API version (2011-02-01 or 2013-01-01). Falls back to CLOUDSEARCH_API_VERSION.
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Live or sandbox mode.
    #[arg(long, global = true, env = ENV_MODE, default_value = "live")]
    pub mode: Mode,

    /// Shorthand for `--mode sandbox`.
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Service host override (e.g. a local emulator).
    #[arg(long, global = true, env = ENV_ENDPOINT)]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, env = "CLOUDSEARCH_TIMEOUT_MS", default_value = "30000")]
    pub timeout_ms: u64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "CLOUDSEARCH_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a search and print the results as JSON.
    Search(SearchArgs),

    /// Add a document.
    Add {
        /// Document id.
        id: String,
        /// Document fields as a JSON object.
        fields: String,
    },

    /// Replace a document (same as add).
    Update {
        /// Document id.
        id: String,
        /// Document fields as a JSON object.
        fields: String,
    },

    /// Delete a document.
    Remove {
        /// Document id.
        id: String,
    },
}

/// Arguments of the `search` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Free-text search term.
    #[arg(default_value = "")]
    pub term: String,

    /// Boolean filter as JSON, e.g. `{"and": {"genre": "fantasy"}}`.
    #[arg(long)]
    pub filter: Option<String>,

    /// 1-based page number.
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Comma-separated fields to return with each hit.
    #[arg(long, value_delimiter = ',')]
    pub return_fields: Vec<String>,

    /// Rank field; prefix with `-` for descending.
    #[arg(long, allow_hyphen_values = true)]
    pub rank: Option<String>,

    /// Deep-paging cursor (2013-01-01 only).
    #[arg(long)]
    pub cursor: Option<String>,

    /// Print the request URL instead of sending it.
    #[arg(long)]
    pub url_only: bool,
}

impl CliConfig {
    /// Builds the client configuration.
    pub fn client_config(&self) -> anyhow::Result<CloudSearchConfig> {
        let api_version = ApiVersion::resolve(self.api_version.as_deref())?;
        let mode = if self.sandbox { Mode::Sandbox } else { self.mode };

        Ok(CloudSearchConfig {
            search_domain: self.domain.clone(),
            aws_region: self.region.clone(),
            api_version,
            mode,
            endpoint: self.endpoint.clone(),
            request_timeout_ms: self.timeout_ms,
        })
    }
}

impl SearchArgs {
    /// Builds search options, parsing the JSON filter if one was given.
    pub fn options(&self) -> anyhow::Result<SearchOptions> {
        let filter = match &self.filter {
            Some(raw) => {
                let value: serde_json::Value = serde_json::from_str(raw)
                    .map_err(|e| anyhow::anyhow!("--filter is not valid JSON: {}", e))?;
                Some(Filter::from_json(&value)?)
            }
            None => None,
        };

        Ok(SearchOptions {
            filter,
            page_size: self.page_size,
            page: self.page,
            return_fields: self
                .return_fields
                .iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            rank: self.rank.as_deref().map(Rank::parse),
            cursor: self.cursor.clone(),
        })
    }
}
