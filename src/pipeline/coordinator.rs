//! Run orchestration
//!
//! Drives the full crawl for every region in the area list: a bounded-
//! concurrency discovery phase over the region's zip codes producing one
//! deduplicated link file, then one harvest pass over those links, then
//! exactly one retry pass replaying the error ledger into the same record
//! sink. The discovery phase fully completes before harvesting begins.

use crate::areas::{load_areas, Area};
use crate::config::Config;
use crate::discover::{AreaDiscovery, ListingScope};
use crate::fetch::ExtractionClient;
use crate::harvest::{HarvestPool, PassReport};
use crate::ledger::RetryLedger;
use crate::listing::HtmlFieldExtractor;
use crate::sink::{CsvErrorSink, CsvLinkSink, CsvRecordSink, LinkSink};
use crate::Result;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    client: Arc<ExtractionClient>,
    run_date: String,
}

impl Coordinator {
    /// Builds the coordinator and its single shared fetch client
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(ExtractionClient::new(&config.upstream, &config.fetch)?);
        let run_date = chrono::Local::now().format("%Y-%m-%d").to_string();
        Ok(Self {
            config,
            client,
            run_date,
        })
    }

    /// Runs discovery, harvest, and the retry pass for every region
    pub async fn run(&self) -> Result<()> {
        let regions = self.load_regions()?;

        for (region, zips) in regions {
            tracing::info!("Starting scraping for {} ({} areas)", region, zips.len());
            let start = Instant::now();

            let links = self.discover_region(&region, &zips).await?;
            self.harvest_region(&region, links).await?;
            self.retry_region(&region).await?;

            tracing::info!("Time taken for {}: {:.1?}", region, start.elapsed());
        }

        Ok(())
    }

    /// Replays the error ledger for every region without a new discovery pass
    pub async fn retry_only(&self) -> Result<()> {
        for (region, _) in self.load_regions()? {
            self.retry_region(&region).await?;
        }
        Ok(())
    }

    fn load_regions(&self) -> Result<BTreeMap<String, Vec<Area>>> {
        let areas = load_areas(Path::new(&self.config.input.areas_path))?;
        let mut regions: BTreeMap<String, Vec<Area>> = BTreeMap::new();
        for area in areas {
            regions.entry(area.region.clone()).or_default().push(area);
        }
        Ok(regions)
    }

    /// Discovery phase: bounded-parallel area crawls unioned into one
    /// deduplicated link set, written to the region's link file
    async fn discover_region(&self, region: &str, zips: &[Area]) -> Result<Vec<String>> {
        let discovery = Arc::new(AreaDiscovery::new(
            Arc::clone(&self.client),
            self.config.crawl.clone(),
        ));
        let semaphore = Arc::new(Semaphore::new(self.config.crawl.discovery_workers));
        let mut workers = JoinSet::new();

        for area in zips {
            let discovery = Arc::clone(&discovery);
            let semaphore = Arc::clone(&semaphore);
            let zip = area.zip.clone();

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("discovery semaphore closed");
                let links = discovery.discover_area(&zip, ListingScope::ForSale).await;
                (zip, links)
            });
        }

        let mut union: HashSet<String> = HashSet::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((zip, links)) => {
                    if links.is_empty() {
                        tracing::warn!("No links found for zip code: {}", zip);
                    } else {
                        tracing::info!("Found {} links for zip code: {}", links.len(), zip);
                    }
                    union.extend(links);
                }
                Err(e) => tracing::error!("Discovery worker panicked: {}", e),
            }
        }

        let mut links: Vec<String> = union.into_iter().collect();
        links.sort();

        let sink = CsvLinkSink::create(&self.links_path(region))?;
        sink.write_links(&links)?;
        tracing::info!(
            "Removed duplicates. Total unique links saved for {}: {}",
            region,
            links.len()
        );

        Ok(links)
    }

    /// Harvest phase: one bounded-parallel pass over the region's links
    async fn harvest_region(&self, region: &str, links: Vec<String>) -> Result<PassReport> {
        let records = Arc::new(CsvRecordSink::open(&self.records_path(region))?);
        let errors = Arc::new(CsvErrorSink::open(&self.errors_path(region))?);

        let pool = self.pool(self.config.crawl.harvest_workers);
        let report = pool.run(links, records, errors).await;

        tracing::info!(
            "Harvest pass for {}: {} succeeded, {} failed",
            region,
            report.succeeded,
            report.failed
        );
        Ok(report)
    }

    /// Retry pass: replay the ledger into the same record sink, exactly once
    async fn retry_region(&self, region: &str) -> Result<()> {
        let ledger = RetryLedger::new(self.errors_path(region));
        let failed = ledger.load()?;
        if failed.is_empty() {
            tracing::info!("No URLs to retry for {}", region);
            return Ok(());
        }

        tracing::info!("Retrying {} failed URLs for {}", failed.len(), region);
        ledger.rotate()?;

        let records = Arc::new(CsvRecordSink::open(&self.records_path(region))?);
        let errors = Arc::new(CsvErrorSink::open(ledger.path())?);
        let urls: Vec<String> = failed.into_iter().map(|record| record.url).collect();

        let pool = self.pool(self.config.crawl.harvest_workers);
        let report = pool.run(urls, records, errors).await;

        tracing::info!(
            "Retry process completed for {}: {} URLs retried successfully, {} failed again",
            region,
            report.succeeded,
            report.failed
        );
        Ok(())
    }

    fn pool(&self, workers: usize) -> HarvestPool {
        HarvestPool::new(
            Arc::clone(&self.client),
            Arc::new(HtmlFieldExtractor),
            workers,
        )
    }

    fn links_path(&self, region: &str) -> PathBuf {
        PathBuf::from(&self.config.output.links_dir)
            .join(&self.run_date)
            .join(format!("{}_properties.csv", region))
    }

    fn records_path(&self, region: &str) -> PathBuf {
        PathBuf::from(&self.config.output.records_dir)
            .join(region)
            .join(&self.run_date)
            .join(format!("{}_property_details.csv", region))
    }

    fn errors_path(&self, region: &str) -> PathBuf {
        PathBuf::from(&self.config.output.errors_dir)
            .join(region)
            .join(&self.run_date)
            .join("error_property_urls.csv")
    }
}
