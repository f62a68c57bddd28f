//! Bounded-concurrency harvest pool
//!
//! Converts a set of listing links into records or error rows. Each URL is
//! processed independently: fetch the detail page through the resilient
//! client, extract its fields, stamp the harvest time, and write to the
//! record sink; fetch failures land in the error sink (the retry ledger).
//! Workers share nothing but the semaphore budget, the two sinks, and a pair
//! of atomic counters.

use crate::fetch::ExtractionClient;
use crate::listing::FieldExtractor;
use crate::sink::{ErrorSink, RecordSink};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one harvest pass, read after all workers complete
#[derive(Debug, Clone)]
pub struct PassReport {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

/// A bounded-parallel pool of detail-page harvest workers
pub struct HarvestPool {
    client: Arc<ExtractionClient>,
    extractor: Arc<dyn FieldExtractor>,
    workers: usize,
}

impl HarvestPool {
    pub fn new(
        client: Arc<ExtractionClient>,
        extractor: Arc<dyn FieldExtractor>,
        workers: usize,
    ) -> Self {
        Self {
            client,
            extractor,
            workers: workers.max(1),
        }
    }

    /// Processes every URL, bounded by the worker budget.
    ///
    /// No ordering is guaranteed across workers; sink row order is arrival
    /// order. A failing URL never blocks or aborts its siblings.
    pub async fn run(
        &self,
        links: Vec<String>,
        records: Arc<dyn RecordSink>,
        errors: Arc<dyn ErrorSink>,
    ) -> PassReport {
        let start = Instant::now();
        let total = links.len() as u64;
        tracing::info!("Total URLs to process: {}", total);

        let succeeded = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut workers = JoinSet::new();

        for url in links {
            let client = Arc::clone(&self.client);
            let extractor = Arc::clone(&self.extractor);
            let records = Arc::clone(&records);
            let errors = Arc::clone(&errors);
            let succeeded = Arc::clone(&succeeded);
            let failed = Arc::clone(&failed);
            let semaphore = Arc::clone(&semaphore);

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("harvest semaphore closed");

                match client.fetch(&url).await {
                    Ok(html) => {
                        let mut record = extractor.extract(&html, &url);
                        record.timestamp =
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                        match records.write_record(&record) {
                            Ok(()) => {
                                succeeded.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(e) => {
                                tracing::error!("Failed to write record for {}: {}", url, e);
                                failed.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    Err(reason) => {
                        tracing::error!("Failed to process URL: {}. Error: {}", url, reason);
                        if let Err(e) = errors.write_error(&url, &reason.to_string()) {
                            tracing::error!("Failed to record error for {}: {}", url, e);
                        }
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Harvest worker panicked: {}", e);
            }
        }

        let report = PassReport {
            processed: total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Processed {} URLs: {} succeeded, {} failed in {:.1?}",
            report.processed,
            report.succeeded,
            report.failed,
            report.elapsed
        );
        report
    }
}
