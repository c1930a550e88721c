//! Degradation-tier tests for [`FeedsClient`] against a wiremock upstream.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripintel_feeds::{DataSource, FeedsClient};

fn client_for(server: &MockServer, ttl: Duration) -> FeedsClient {
    FeedsClient::new(5, "tripintel-test/0.1", ttl)
        .unwrap()
        .with_base_urls(&server.uri(), &server.uri())
}

fn quote_body(symbol: &str, price: f64) -> String {
    format!(
        r#"{{"quoteResponse": {{"result": [{{
            "symbol": "{symbol}", "regularMarketPrice": {price},
            "regularMarketChange": 1.5, "regularMarketChangePercent": 0.04,
            "currency": "USD"
        }}], "error": null}}}}"#
    )
}

const NEWS_BODY: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Booking platforms beat expectations</title>
    <link>https://news.example.com/booking</link>
    <description>Strong quarter for travel marketplaces.</description>
  </item>
</channel></rss>"#;

const CHART_BODY: &str = r#"{"chart": {"result": [{
    "timestamp": [1700000000, 1700086400],
    "indicators": {"quote": [{"close": [100.0, 101.0]}]}
}], "error": null}}"#;

#[tokio::test]
async fn quotes_serve_live_data_and_then_fresh_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v7/finance/quote"))
        .and(query_param("symbols", "BKNG"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quote_body("BKNG", 3500.0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));

    let first = client.quotes(&["bkng".to_string()]).await;
    assert_eq!(first.source, DataSource::Live);
    assert_eq!(first.data[0].symbol, "BKNG");

    // Second call must hit the cache; the mock's expect(1) enforces it.
    let second = client.quotes(&["BKNG".to_string()]).await;
    assert_eq!(second.source, DataSource::Cache);
    assert!((second.data[0].price - 3500.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn quotes_serve_stale_cache_when_upstream_dies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v7/finance/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quote_body("ABNB", 120.0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v7/finance/quote"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // TTL zero: the cached entry is stale immediately.
    let client = client_for(&server, Duration::ZERO);

    let first = client.quotes(&["ABNB".to_string()]).await;
    assert_eq!(first.source, DataSource::Live);

    let second = client.quotes(&["ABNB".to_string()]).await;
    assert_eq!(second.source, DataSource::Cache, "stale cache beats fallback");
    assert!((second.data[0].price - 120.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn quotes_fall_back_to_seed_data_with_nothing_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v7/finance/quote"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    let feed = client.quotes(&["BKNG".to_string(), "XYZQ".to_string()]).await;

    assert_eq!(feed.source, DataSource::Fallback);
    assert_eq!(feed.data.len(), 2, "fallback covers every requested symbol");
    assert!(feed.data.iter().all(|q| q.price > 0.0));
}

#[tokio::test]
async fn news_parses_live_rss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/2.0/headline"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_BODY))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    let feed = client.news("travel stocks").await;

    assert_eq!(feed.source, DataSource::Live);
    assert_eq!(feed.data.len(), 1);
    assert_eq!(feed.data[0].title, "Booking platforms beat expectations");
}

#[tokio::test]
async fn news_falls_back_on_unparseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/2.0/headline"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    let feed = client.news("travel").await;

    // An HTML body parses to zero items, which counts as an upstream miss.
    assert_eq!(feed.source, DataSource::Fallback);
    assert!(!feed.data.is_empty(), "fallback payload is never empty");
}

#[tokio::test]
async fn chart_serves_live_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BKNG"))
        .and(query_param("range", "1mo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    let feed = client.chart("bkng", "1mo").await;

    assert_eq!(feed.source, DataSource::Live);
    assert_eq!(feed.data.symbol, "BKNG");
    assert_eq!(feed.data.points.len(), 2);
}

#[tokio::test]
async fn chart_simulates_series_when_upstream_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    let feed = client.chart("MAR", "1y").await;

    assert_eq!(feed.source, DataSource::Fallback);
    assert_eq!(feed.data.range, "1y");
    assert!(!feed.data.points.is_empty());
}
