use serde::Deserialize;

/// Main configuration structure for zipharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Upstream extraction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Extraction service endpoint (POST target)
    pub endpoint: String,

    /// API key used as the basic-auth username
    #[serde(rename = "api-key")]
    pub api_key: String,
}

/// Retry/backoff policy for the fetch client
///
/// The defaults reproduce the documented behavior: five attempts with a
/// doubling backoff of 1, 2, 4, 8, 16 seconds on rate-limit responses, and a
/// 30 second per-request timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of fetch attempts per URL
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds, doubled after each rate-limited attempt
    #[serde(rename = "initial-backoff-ms", default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Crawl orchestration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Total-page threshold at which an area is split into facets.
    /// The upstream search index exposes at most this many pages per query.
    #[serde(rename = "page-cap", default = "default_page_cap")]
    pub page_cap: u32,

    /// Concurrent areas during the discovery phase
    #[serde(rename = "discovery-workers", default = "default_discovery_workers")]
    pub discovery_workers: usize,

    /// Concurrent detail-page fetches during the harvest phase
    #[serde(rename = "harvest-workers", default = "default_harvest_workers")]
    pub harvest_workers: usize,

    /// Origin of the listing site, prepended to decoded base paths
    #[serde(rename = "search-host", default = "default_search_host")]
    pub search_host: String,

    /// Disjoint price bands used when an area exceeds the page cap
    #[serde(rename = "price-bands", default = "default_price_bands")]
    pub price_bands: Vec<PriceBand>,

    /// Disjoint bedroom-count bands crossed with the price bands
    #[serde(rename = "bed-bands", default = "default_bed_bands")]
    pub bed_bands: Vec<BedBand>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_cap: default_page_cap(),
            discovery_workers: default_discovery_workers(),
            harvest_workers: default_harvest_workers(),
            search_host: default_search_host(),
            price_bands: default_price_bands(),
            bed_bands: default_bed_bands(),
        }
    }
}

/// A half-open price range; `max: None` means unbounded above
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceBand {
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
}

/// A bedroom-count range; `max: None` means unbounded above
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BedBand {
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV of (zip code, region) rows seeding the crawl
    #[serde(rename = "areas-path")]
    pub areas_path: String,
}

/// Output sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for per-region listing-link CSVs
    #[serde(rename = "links-dir")]
    pub links_dir: String,

    /// Directory for per-region listing-record CSVs
    #[serde(rename = "records-dir")]
    pub records_dir: String,

    /// Directory for per-region error-ledger CSVs
    #[serde(rename = "errors-dir")]
    pub errors_dir: String,
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_cap() -> u32 {
    20
}

fn default_discovery_workers() -> usize {
    10
}

fn default_harvest_workers() -> usize {
    14
}

fn default_search_host() -> String {
    "https://www.zillow.com".to_string()
}

/// Seven disjoint bands spanning $0 to unbounded
fn default_price_bands() -> Vec<PriceBand> {
    vec![
        PriceBand { min: 0, max: Some(300_000) },
        PriceBand { min: 300_001, max: Some(400_000) },
        PriceBand { min: 400_001, max: Some(450_000) },
        PriceBand { min: 450_001, max: Some(500_000) },
        PriceBand { min: 500_001, max: Some(600_000) },
        PriceBand { min: 600_001, max: Some(800_000) },
        PriceBand { min: 800_001, max: None },
    ]
}

/// Six disjoint bands from studio to 5+
fn default_bed_bands() -> Vec<BedBand> {
    vec![
        BedBand { min: 0, max: Some(0) },
        BedBand { min: 1, max: Some(1) },
        BedBand { min: 2, max: Some(2) },
        BedBand { min: 3, max: Some(3) },
        BedBand { min: 4, max: Some(4) },
        BedBand { min: 5, max: None },
    ]
}
