//! Area discovery: facet partitioner and pager
//!
//! Drives the search side of the crawl for one area at a time. Guarantees
//! (best-effort, bounded by the upstream's own cap) that all listings for an
//! area are discovered even though the search index exposes only a limited
//! number of pages per query: small result sets are paged directly, large
//! ones are split into disjoint price×bedroom facets that are each paged
//! independently. Failures never escape an area; it yields whatever links it
//! accumulated.

mod pager;
mod partitioner;

pub use partitioner::facet_states;

use crate::config::CrawlConfig;
use crate::fetch::ExtractionClient;
use crate::search::{
    area_seed_url, decode_query_state, for_sale_root, parse_listing_links, parse_total_pages,
    search_url, sold_root, SearchState,
};
use pager::walk_pages;
use std::collections::HashSet;
use std::sync::Arc;

/// Which listing population an area crawl targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Active for-sale listings (the primary flow)
    ForSale,
    /// Listings sold within the last 24 months
    RecentlySold,
}

/// Discovers the deduplicated set of listing links for one area
pub struct AreaDiscovery {
    client: Arc<ExtractionClient>,
    crawl: CrawlConfig,
}

impl AreaDiscovery {
    pub fn new(client: Arc<ExtractionClient>, crawl: CrawlConfig) -> Self {
        Self { client, crawl }
    }

    /// Crawls one area and returns every listing link found, deduplicated by
    /// exact URL equality.
    ///
    /// Never fails: every fetch or parse problem inside the walk is logged
    /// and skipped, and the area yields what it accumulated so far.
    pub async fn discover_area(&self, zip: &str, scope: ListingScope) -> HashSet<String> {
        let mut links = HashSet::new();

        let Some((root, state)) = self.seed_area(zip, scope).await else {
            return links;
        };

        let base_url = match search_url(&root, &state) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to build base URL for {}: {}", zip, e);
                return links;
            }
        };

        let html = match self.client.fetch(base_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to fetch HTML for {}: {}", zip, e);
                return links;
            }
        };

        if let Some(first_page) = parse_listing_links(&html) {
            tracing::info!("Added {} links from base URL for {}", first_page.len(), zip);
            links.extend(first_page);
        }

        let Some(total_pages) = parse_total_pages(&html) else {
            tracing::warn!("No page count reported for {}; keeping first page only", zip);
            return links;
        };
        tracing::info!("{} has {} total pages", zip, total_pages);

        if total_pages >= self.crawl.page_cap {
            self.walk_facets(zip, &root, &state, &mut links).await;
        } else {
            walk_pages(&self.client, &root, &state, total_pages, &mut links).await;
        }

        tracing::info!("Total unique links scraped for {}: {}", zip, links.len());
        links
    }

    /// Fetches the area's seed page and decodes its search state.
    ///
    /// Returns `None` when the seed cannot be fetched or the embedded state
    /// block is missing; the area is skipped.
    async fn seed_area(&self, zip: &str, scope: ListingScope) -> Option<(String, SearchState)> {
        let seed = area_seed_url(&self.crawl.search_host, zip);
        let html = match self.client.fetch(&seed).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("No HTML content fetched for zipcode {}: {}", zip, e);
                return None;
            }
        };

        let Some((base_path, raw)) = decode_query_state(&html) else {
            tracing::warn!("Parsing failed for HTML content of zipcode {}", zip);
            return None;
        };

        let (root, state) = match scope {
            ListingScope::ForSale => (
                for_sale_root(&self.crawl.search_host, &base_path),
                SearchState::for_sale(raw),
            ),
            ListingScope::RecentlySold => (
                sold_root(&self.crawl.search_host, &base_path),
                SearchState::recently_sold(raw),
            ),
        };

        match state {
            Some(state) => Some((root, state)),
            None => {
                tracing::warn!("Query state for zipcode {} is not an object", zip);
                None
            }
        }
    }

    /// Splits the area into price×bedroom sub-queries and pages each one.
    ///
    /// A facet that itself reports at least the page cap is accepted as-is
    /// with a warning; re-partitioning under extreme facet density is
    /// undocumented upstream behavior.
    async fn walk_facets(
        &self,
        zip: &str,
        root: &str,
        base: &SearchState,
        links: &mut HashSet<String>,
    ) {
        let facets = facet_states(base, &self.crawl.price_bands, &self.crawl.bed_bands);
        tracing::info!(
            "{} exceeds the {} page cap; splitting into {} facets",
            zip,
            self.crawl.page_cap,
            facets.len()
        );

        for facet in &facets {
            let url = match search_url(root, facet) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Could not build facet URL for {}: {}", zip, e);
                    continue;
                }
            };

            let html = match self.client.fetch(url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!("Failed to fetch facet page for {}: {}", zip, e);
                    continue;
                }
            };

            if let Some(facet_links) = parse_listing_links(&html) {
                tracing::info!(
                    "Added {} links from facet price={:?} beds={:?}",
                    facet_links.len(),
                    facet.price(),
                    facet.beds()
                );
                links.extend(facet_links);
            }

            let facet_pages = parse_total_pages(&html).unwrap_or(0);
            if facet_pages >= self.crawl.page_cap {
                tracing::warn!(
                    "Facet price={:?} beds={:?} of {} still reports {} pages; accepting partial results",
                    facet.price(),
                    facet.beds(),
                    zip,
                    facet_pages
                );
            }
            walk_pages(&self.client, root, facet, facet_pages, links).await;
        }
    }
}
