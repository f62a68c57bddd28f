//! Facet partitioner and pager behavior over a mock upstream
//!
//! Mock routing keys off substrings of the target URL embedded in the
//! extraction request body: `_rb` matches the area seed page, `_p/` matches
//! paged queries, and `%22price%22` (the percent-encoded price filter)
//! matches facet sub-queries. Mount order matters: wiremock answers with the
//! first matching mock.

use crate::common::{client, extraction_response, mock_page, results_page, seed_page};
use std::collections::HashSet;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zipharvest::config::{BedBand, CrawlConfig, PriceBand};
use zipharvest::discover::{AreaDiscovery, ListingScope};

fn discovery(server: &MockServer, crawl: CrawlConfig) -> AreaDiscovery {
    AreaDiscovery::new(Arc::new(client(server)), crawl)
}

/// Mounts a guard that fails the test if any matching request arrives
async fn forbid(server: &MockServer, fragment: &str) {
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains(fragment))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_small_area_pages_directly() {
    let server = MockServer::start().await;

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    mock_page(&server, "2_p", &results_page(&["https://l2", "https://l3"], 3)).await;
    mock_page(&server, "3_p", &results_page(&["https://l4"], 3)).await;
    forbid(&server, "%22price%22").await;
    // Fallback: the unfiltered base query, page 1
    mock_page(&server, "searchQueryState", &results_page(&["https://l1", "https://l2"], 3)).await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;

    let expected: HashSet<String> = ["https://l1", "https://l2", "https://l3", "https://l4"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(links, expected);
}

#[tokio::test]
async fn test_nineteen_pages_stays_direct() {
    let server = MockServer::start().await;

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    forbid(&server, "%22price%22").await;
    // Pages 2 through 19: 18 paged fetches, no facet split
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains("_p/"))
        .respond_with(extraction_response(&results_page(&["https://deep"], 19)))
        .expect(18)
        .mount(&server)
        .await;
    mock_page(&server, "searchQueryState", &results_page(&["https://first"], 19)).await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;

    assert_eq!(links.len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_oversized_area_splits_into_42_facets() {
    let server = MockServer::start().await;

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    // Every facet sub-query: page 1 of 1, overlapping links across facets
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains("%22price%22"))
        .respond_with(extraction_response(&results_page(
            &["https://f1", "https://f2"],
            1,
        )))
        .expect(42)
        .mount(&server)
        .await;
    forbid(&server, "_p/").await;
    // Base query reports 45 pages, beyond the cap
    mock_page(&server, "searchQueryState", &results_page(&["https://l1", "https://f1"], 45)).await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;

    // Union of base page and all facets, double-counting collapsed
    let expected: HashSet<String> = ["https://l1", "https://f1", "https://f2"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(links, expected);
    server.verify().await;
}

#[tokio::test]
async fn test_overflowing_facet_accepted_without_resplit() {
    let server = MockServer::start().await;

    // Single 1x1 facet grid so the walk stays small
    let crawl = CrawlConfig {
        price_bands: vec![PriceBand { min: 0, max: None }],
        bed_bands: vec![BedBand { min: 0, max: None }],
        ..CrawlConfig::default()
    };

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    // The lone facet itself reports 25 pages, past the cap of 20: it must be
    // paged as-is (24 paged fetches), not re-partitioned
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains("_p/"))
        .respond_with(extraction_response(&results_page(&["https://deep"], 25)))
        .expect(24)
        .mount(&server)
        .await;
    mock_page(&server, "%22price%22", &results_page(&["https://facet1"], 25)).await;
    mock_page(&server, "searchQueryState", &results_page(&["https://base"], 45)).await;

    let links = discovery(&server, crawl)
        .discover_area("02118", ListingScope::ForSale)
        .await;

    assert!(links.contains("https://facet1"));
    assert!(links.contains("https://deep"));
    server.verify().await;
}

#[tokio::test]
async fn test_rerunning_discovery_is_idempotent() {
    let server = MockServer::start().await;

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    mock_page(&server, "2_p", &results_page(&["https://l2"], 2)).await;
    mock_page(&server, "searchQueryState", &results_page(&["https://l1", "https://l2"], 2)).await;

    let discovery = discovery(&server, CrawlConfig::default());
    let first = discovery.discover_area("02118", ListingScope::ForSale).await;
    let second = discovery.discover_area("02118", ListingScope::ForSale).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_unfetchable_area_yields_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_area_without_state_block_is_skipped() {
    let server = MockServer::start().await;
    mock_page(&server, "_rb", "<html><body>maintenance page</body></html>").await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_failed_page_is_skipped_without_aborting_the_walk() {
    let server = MockServer::start().await;

    mock_page(&server, "_rb", &seed_page("/boston-ma-02118/")).await;
    // Page 2 always fails; page 3 succeeds
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains("2_p"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_page(&server, "3_p", &results_page(&["https://l3"], 3)).await;
    mock_page(&server, "searchQueryState", &results_page(&["https://l1"], 3)).await;

    let links = discovery(&server, CrawlConfig::default())
        .discover_area("02118", ListingScope::ForSale)
        .await;

    assert!(links.contains("https://l1"));
    assert!(links.contains("https://l3"));
    assert_eq!(links.len(), 2);
}
