//! Search integration tests against a recording transport.

mod common;

use serde_json::json;

use cloudsearch_client::search::{Filter, Rank, SearchOptions};
use cloudsearch_client::{ApiVersion, CloudSearchConfig, Hits};

use common::*;

const LEGACY_BASE: &str =
    "http://search-testdomain.us-east-1.cloudsearch.amazonaws.com/2011-02-01/search?";
const STRUCTURED_BASE: &str =
    "http://search-testdomain.us-east-1.cloudsearch.amazonaws.com/2013-01-01/search?";

fn legacy_config() -> CloudSearchConfig {
    CloudSearchConfig::new(DOMAIN)
}

fn structured_config() -> CloudSearchConfig {
    CloudSearchConfig::new(DOMAIN).with_api_version(ApiVersion::Structured)
}

#[tokio::test]
async fn test_search_issues_get_and_parses_ids() {
    let (client, transport) = mock_client(legacy_config());
    transport.respond(200, legacy_ids_response(2, 0, &["123", "456"]));

    let results = client
        .search("donut", &SearchOptions::default())
        .await
        .unwrap();

    let request = transport.only_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, format!("{}q=donut&size=10", LEGACY_BASE));

    assert_eq!(results.ids().collect::<Vec<_>>(), vec!["123", "456"]);
    assert_eq!(results.total_entries(), 2);
    assert_eq!(results.total_pages(), 1);
    assert_eq!(results.current_page(), 1);
}

#[tokio::test]
async fn test_search_with_filter_rank_and_page() {
    let (client, transport) = mock_client(legacy_config());
    transport.respond(200, legacy_ids_response(95, 40, &["1"]));

    let options = SearchOptions::default()
        .with_filter(Filter::and([
            Filter::condition("foo", "bar"),
            Filter::condition("baz", "bug"),
        ]))
        .with_rank(Rank::desc("created_at"))
        .with_page_size(20)
        .with_page(3);

    let results = client.search("", &options).await.unwrap();

    assert_eq!(
        transport.only_request().url,
        format!(
            "{}q=&bq=%28and+foo%3A%27bar%27+baz%3A%27bug%27%29&size=20&start=40&rank=-created_at",
            LEGACY_BASE
        )
    );
    assert_eq!(results.current_page(), 3);
    assert_eq!(results.total_pages(), 5);
    assert_eq!(results.next_page(), Some(4));
}

#[tokio::test]
async fn test_search_url_matches_requested_url() {
    let (client, transport) = mock_client(structured_config());
    transport.respond(200, structured_fields_response());

    let options = SearchOptions::default()
        .with_filter(Filter::or([Filter::condition("is_donut", true)]))
        .with_return_fields(["name"]);
    let expected = client.search_url("glazed", &options).unwrap();

    client.search("glazed", &options).await.unwrap();
    assert_eq!(transport.only_request().url, expected);
    assert_eq!(
        expected,
        format!(
            "{}q=%28and+%27glazed%27+%28or+is_donut%3A%27true%27%29%29&q.parser=structured&size=100&return=name",
            STRUCTURED_BASE
        )
    );
}

#[tokio::test]
async fn test_return_fields_yield_documents() {
    let (client, transport) = mock_client(legacy_config());
    transport.respond(200, legacy_data_response());

    let options = SearchOptions::default().with_return_fields(["name", "address"]);
    let results = client.search("", &options).await.unwrap();

    assert!(matches!(results.hits(), Hits::Documents(_)));
    assert_eq!(results.len(), 2);
    assert_eq!(&results[1], "456");
    assert_eq!(results.document("123").unwrap()["name"], json!(["Beavis"]));
    assert!(
        transport
            .only_request()
            .url
            .ends_with("&return-fields=name,address")
    );
}

#[tokio::test]
async fn test_structured_cursor_round_trip() {
    let (client, transport) = mock_client(structured_config());
    transport.respond(200, structured_fields_response());
    transport.respond(200, structured_fields_response());

    let first = client
        .search("x", &SearchOptions::default().with_cursor("initial"))
        .await
        .unwrap();
    let cursor = first.cursor().unwrap().to_string();

    client
        .search("x", &SearchOptions::default().with_cursor(cursor))
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.ends_with("&cursor=initial"));
    assert!(requests[1].url.ends_with("&cursor=Pl-next-page"));
    assert!(!requests[1].url.contains("start="));
}

#[tokio::test]
async fn test_no_matches_has_one_page() {
    let (client, transport) = mock_client(legacy_config());
    transport.respond(200, legacy_ids_response(0, 0, &[]));

    let results = client
        .search("nothing", &SearchOptions::default())
        .await
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_pages(), 1);
    assert_eq!(results.current_page(), 1);
    assert_eq!(results.previous_page(), None);
}

#[tokio::test]
async fn test_endpoint_override_is_used() {
    let (client, transport) = mock_client(
        legacy_config().with_endpoint("http://localhost:9000"),
    );
    transport.respond(200, legacy_ids_response(0, 0, &[]));

    client.search("x", &SearchOptions::default()).await.unwrap();
    assert_eq!(
        transport.only_request().url,
        "http://localhost:9000/2011-02-01/search?q=x&size=10"
    );
}
