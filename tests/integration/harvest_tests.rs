//! Harvest pool, sinks, and retry-ledger convergence

use crate::common::{client, detail_page, mock_page};
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zipharvest::harvest::HarvestPool;
use zipharvest::ledger::RetryLedger;
use zipharvest::listing::HtmlFieldExtractor;
use zipharvest::sink::{CsvErrorSink, CsvRecordSink};

fn pool(server: &MockServer, workers: usize) -> HarvestPool {
    HarvestPool::new(
        Arc::new(client(server)),
        Arc::new(HtmlFieldExtractor),
        workers,
    )
}

#[tokio::test]
async fn test_harvest_pass_writes_records_and_errors() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let records_path = dir.path().join("records.csv");
    let errors_path = dir.path().join("errors.csv");

    mock_page(
        &server,
        "/good-1/",
        &detail_page("1 Main St, Boston, MA", "73000001", "500,000"),
    )
    .await;
    mock_page(
        &server,
        "/good-2/",
        &detail_page("2 Oak Ave, Boston, MA", "73000002", "750,000"),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_string_contains("/broken/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let links = vec![
        "https://site/homedetails/good-1/".to_string(),
        "https://site/homedetails/broken/".to_string(),
        "https://site/homedetails/good-2/".to_string(),
    ];

    let records = Arc::new(CsvRecordSink::open(&records_path).unwrap());
    let errors = Arc::new(CsvErrorSink::open(&errors_path).unwrap());
    let report = pool(&server, 4).run(links, records, errors).await;

    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let records_csv = std::fs::read_to_string(&records_path).unwrap();
    assert_eq!(records_csv.lines().count(), 3); // header + 2 rows
    assert!(records_csv.contains("1 Main St"));
    assert!(records_csv.contains("73000002"));

    let errors_csv = std::fs::read_to_string(&errors_path).unwrap();
    assert_eq!(errors_csv.lines().count(), 2); // header + 1 row
    assert!(errors_csv.contains("https://site/homedetails/broken/"));
    assert!(errors_csv.contains("HTTP 503"));
}

#[tokio::test]
async fn test_records_are_stamped_with_harvest_time() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let records_path = dir.path().join("records.csv");

    mock_page(&server, "/good/", &detail_page("9 Elm St", "73000009", "425,000")).await;

    let records = Arc::new(CsvRecordSink::open(&records_path).unwrap());
    let errors = Arc::new(CsvErrorSink::open(&dir.path().join("errors.csv")).unwrap());
    pool(&server, 1)
        .run(vec!["https://site/homedetails/good/".to_string()], records, errors)
        .await;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let records_csv = std::fs::read_to_string(&records_path).unwrap();
    assert!(records_csv.contains(&today));
}

#[tokio::test]
async fn test_retry_pass_converges() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let records_path = dir.path().join("records.csv");
    let errors_path = dir.path().join("errors.csv");

    // First pass: the URL fails outright
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    {
        let records = Arc::new(CsvRecordSink::open(&records_path).unwrap());
        let errors = Arc::new(CsvErrorSink::open(&errors_path).unwrap());
        let report = pool(&server, 2)
            .run(
                vec!["https://site/homedetails/flaky/".to_string()],
                records,
                errors,
            )
            .await;
        assert_eq!(report.failed, 1);
    }

    let ledger = RetryLedger::new(&errors_path);
    let failed = ledger.load().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].url, "https://site/homedetails/flaky/");

    // The upstream recovers before the retry pass
    server.reset().await;
    mock_page(
        &server,
        "/flaky/",
        &detail_page("5 River Rd", "73000005", "610,000"),
    )
    .await;

    ledger.rotate().unwrap();
    {
        let records = Arc::new(CsvRecordSink::open(&records_path).unwrap());
        let errors = Arc::new(CsvErrorSink::open(ledger.path()).unwrap());
        let urls: Vec<String> = failed.into_iter().map(|r| r.url).collect();
        let report = pool(&server, 2).run(urls, records, errors).await;
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
    }

    // The success merged into the same record sink and left the ledger
    let records_csv = std::fs::read_to_string(&records_path).unwrap();
    assert!(records_csv.contains("5 River Rd"));
    assert!(ledger.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_still_failing_urls_land_in_fresh_ledger() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let errors_path = dir.path().join("errors.csv");

    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ledger = RetryLedger::new(&errors_path);
    {
        let records = Arc::new(CsvRecordSink::open(&dir.path().join("records.csv")).unwrap());
        let errors = Arc::new(CsvErrorSink::open(&errors_path).unwrap());
        pool(&server, 1)
            .run(vec!["https://site/homedetails/dead/".to_string()], records, errors)
            .await;
    }
    assert_eq!(ledger.load().unwrap().len(), 1);

    // Retry pass against a rotated ledger: the URL fails again
    let failed = ledger.load().unwrap();
    ledger.rotate().unwrap();
    {
        let records = Arc::new(CsvRecordSink::open(&dir.path().join("records.csv")).unwrap());
        let errors = Arc::new(CsvErrorSink::open(ledger.path()).unwrap());
        let urls: Vec<String> = failed.into_iter().map(|r| r.url).collect();
        let report = pool(&server, 1).run(urls, records, errors).await;
        assert_eq!(report.failed, 1);
    }

    let rows = ledger.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, "https://site/homedetails/dead/");
}

#[tokio::test]
async fn test_concurrent_pass_counts_are_consistent() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mock_page(&server, "homedetails", &detail_page("1 Any St", "73000010", "300,000")).await;

    let links: Vec<String> = (0..40)
        .map(|i| format!("https://site/homedetails/listing-{}/", i))
        .collect();

    let records = Arc::new(CsvRecordSink::open(&dir.path().join("records.csv")).unwrap());
    let errors = Arc::new(CsvErrorSink::open(&dir.path().join("errors.csv")).unwrap());
    let report = pool(&server, 14).run(links, records, errors).await;

    assert_eq!(report.processed, 40);
    assert_eq!(report.succeeded + report.failed, 40);
    assert_eq!(report.succeeded, 40);

    let records_csv = std::fs::read_to_string(dir.path().join("records.csv")).unwrap();
    assert_eq!(records_csv.lines().count(), 41);
}
