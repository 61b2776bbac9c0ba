//! Search URL builder.
//!
//! Combines the free-text term, compiled filter, pagination, return fields,
//! rank and cursor into a complete request URL for the active dialect.

use crate::config::ApiVersion;
use crate::dialect::QueryDialect;

use super::SearchOptions;
use super::compiler::compile_with;

/// Escapes a dynamic query-string segment (`application/x-www-form-urlencoded`).
pub fn escape(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Builds search URLs against a single search host.
#[derive(Debug, Clone)]
pub struct SearchUrlBuilder<'a> {
    host: String,
    dialect: &'a dyn QueryDialect,
}

impl<'a> SearchUrlBuilder<'a> {
    /// Creates a builder for `host` (scheme and authority, no trailing slash).
    pub fn new(host: impl Into<String>, dialect: &'a dyn QueryDialect) -> Self {
        Self {
            host: host.into(),
            dialect,
        }
    }

    /// The page size that will be requested for `options`.
    pub fn page_size(&self, options: &SearchOptions) -> u32 {
        effective_page_size(options, self.dialect)
    }

    /// Builds the full request URL.
    pub fn build(&self, term: &str, options: &SearchOptions) -> String {
        let mut url = format!(
            "{}/{}/search?",
            self.host,
            self.dialect.api_version().as_str()
        );

        let filter = options
            .filter
            .as_ref()
            .map(|f| compile_with(f, self.dialect))
            .filter(|compiled| !compiled.is_empty());

        let params = self.dialect.query_params(term, filter.as_deref());
        for (i, (name, value)) in params.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str(name);
            url.push('=');
            url.push_str(&escape(value));
        }

        let page_size = self.page_size(options);
        url.push_str(&format!("&size={}", page_size));

        if !options.return_fields.is_empty() {
            url.push_str(&format!(
                "&{}={}",
                self.dialect.return_fields_param(),
                options.return_fields.join(",")
            ));
        }

        let cursor = options
            .cursor
            .as_deref()
            .filter(|_| self.dialect.supports_cursor());

        if let (Some(page), None) = (options.page, cursor) {
            let start = u64::from(page.max(1) - 1) * u64::from(page_size);
            url.push_str(&format!("&start={}", start));
        }

        if let Some(rank) = &options.rank {
            url.push_str(&format!(
                "&{}={}",
                self.dialect.rank_param(),
                escape(&self.dialect.rank_fragment(rank))
            ));
        }

        if let Some(cursor) = cursor {
            url.push_str(&format!("&cursor={}", escape(cursor)));
        }

        url
    }
}

/// Page size from the options, or the dialect default when absent or zero.
pub fn effective_page_size(options: &SearchOptions, dialect: &dyn QueryDialect) -> u32 {
    options
        .page_size
        .filter(|size| *size > 0)
        .unwrap_or_else(|| dialect.default_page_size())
}

/// Builds a search URL against the public CloudSearch host for `domain` in `region`.
pub fn build_search_url(
    domain: &str,
    region: &str,
    api_version: ApiVersion,
    term: &str,
    options: &SearchOptions,
) -> String {
    let host = format!("http://search-{}.{}.cloudsearch.amazonaws.com", domain, region);
    SearchUrlBuilder::new(host, api_version.dialect()).build(term, options)
}

/// Builds a search URL against an explicit service host (e.g. a local emulator).
pub fn build_search_url_with_endpoint(
    endpoint: &str,
    api_version: ApiVersion,
    term: &str,
    options: &SearchOptions,
) -> String {
    SearchUrlBuilder::new(endpoint.trim_end_matches('/'), api_version.dialect())
        .build(term, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Filter, Rank};

    const LEGACY_BASE: &str =
        "http://search-testdomain.us-east-1.cloudsearch.amazonaws.com/2011-02-01/search?";
    const STRUCTURED_BASE: &str =
        "http://search-testdomain.us-east-1.cloudsearch.amazonaws.com/2013-01-01/search?";

    fn legacy(term: &str, options: &SearchOptions) -> String {
        build_search_url("testdomain", "us-east-1", ApiVersion::Legacy, term, options)
    }

    fn structured(term: &str, options: &SearchOptions) -> String {
        build_search_url("testdomain", "us-east-1", ApiVersion::Structured, term, options)
    }

    #[test]
    fn test_basic_term() {
        assert_eq!(
            legacy("testsearch", &SearchOptions::default()),
            format!("{}q=testsearch&size=10", LEGACY_BASE)
        );
        assert_eq!(
            structured("testsearch", &SearchOptions::default()),
            format!("{}q=testsearch&size=100", STRUCTURED_BASE)
        );
    }

    #[test]
    fn test_term_is_escaped() {
        assert_eq!(
            legacy("testsearch!", &SearchOptions::default()),
            format!("{}q=testsearch%21&size=10", LEGACY_BASE)
        );
        assert_eq!(
            legacy("two words", &SearchOptions::default()),
            format!("{}q=two+words&size=10", LEGACY_BASE)
        );
    }

    #[test]
    fn test_legacy_filter_uses_bq() {
        let options = SearchOptions::default().with_filter(Filter::and([
            Filter::condition("foo", "bar"),
            Filter::condition("baz", "bug"),
        ]));
        assert_eq!(
            legacy("", &options),
            format!(
                "{}q=&bq=%28and+foo%3A%27bar%27+baz%3A%27bug%27%29&size=10",
                LEGACY_BASE
            )
        );
    }

    #[test]
    fn test_structured_filter_with_term() {
        let options =
            SearchOptions::default().with_filter(Filter::and([Filter::condition("foo", "bar")]));
        assert_eq!(
            structured("donut", &options),
            format!(
                "{}q=%28and+%27donut%27+%28and+foo%3A%27bar%27%29%29&q.parser=structured&size=100",
                STRUCTURED_BASE
            )
        );
    }

    #[test]
    fn test_structured_filter_without_term() {
        let options =
            SearchOptions::default().with_filter(Filter::and([Filter::condition("foo", "bar")]));
        assert_eq!(
            structured("", &options),
            format!(
                "{}q=%28and+foo%3A%27bar%27%29&q.parser=structured&size=100",
                STRUCTURED_BASE
            )
        );
    }

    #[test]
    fn test_empty_filter_is_treated_as_absent() {
        let options =
            SearchOptions::default().with_filter(Filter::and([Filter::condition("foo", "")]));
        assert_eq!(
            legacy("x", &options),
            format!("{}q=x&size=10", LEGACY_BASE)
        );
        assert_eq!(
            structured("x", &options),
            format!("{}q=x&size=100", STRUCTURED_BASE)
        );
    }

    #[test]
    fn test_pagination() {
        let options = SearchOptions::default().with_page_size(20).with_page(3);
        assert_eq!(
            legacy("x", &options),
            format!("{}q=x&size=20&start=40", LEGACY_BASE)
        );
    }

    #[test]
    fn test_first_page_still_emits_start() {
        let options = SearchOptions::default().with_page(1);
        assert!(legacy("x", &options).ends_with("&size=10&start=0"));
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        let options = SearchOptions::default().with_page_size(0);
        assert!(legacy("x", &options).ends_with("&size=10"));
    }

    #[test]
    fn test_return_fields() {
        let options = SearchOptions::default().with_return_fields(["name", "price"]);
        assert_eq!(
            legacy("x", &options),
            format!("{}q=x&size=10&return-fields=name,price", LEGACY_BASE)
        );
        assert_eq!(
            structured("x", &options),
            format!("{}q=x&size=100&return=name,price", STRUCTURED_BASE)
        );
    }

    #[test]
    fn test_rank() {
        let options = SearchOptions::default().with_rank(Rank::desc("some_field"));
        assert_eq!(
            legacy("x", &options),
            format!("{}q=x&size=10&rank=-some_field", LEGACY_BASE)
        );
        assert_eq!(
            structured("x", &options),
            format!("{}q=x&size=100&sort=some_field+desc", STRUCTURED_BASE)
        );
    }

    #[test]
    fn test_cursor_replaces_start_for_structured() {
        let options = SearchOptions::default().with_page(2).with_cursor("initial");
        assert_eq!(
            structured("x", &options),
            format!("{}q=x&size=100&cursor=initial", STRUCTURED_BASE)
        );
        assert_eq!(
            legacy("x", &options),
            format!("{}q=x&size=10&start=10", LEGACY_BASE)
        );
    }

    #[test]
    fn test_custom_host() {
        let builder = SearchUrlBuilder::new("http://localhost:9000", ApiVersion::Legacy.dialect());
        assert_eq!(
            builder.build("x", &SearchOptions::default()),
            "http://localhost:9000/2011-02-01/search?q=x&size=10"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let options = SearchOptions::default().with_page(2);
        assert_eq!(
            build_search_url_with_endpoint(
                "http://localhost:9000/",
                ApiVersion::Structured,
                "x",
                &options
            ),
            "http://localhost:9000/2013-01-01/search?q=x&size=100&start=100"
        );
    }
}
