//! Direct page walking for a single search query
//!
//! Pages 2 through the reported total are fetched in order (page 1 is always
//! captured by the caller before deciding how to walk). A failed page is
//! logged and skipped; it never aborts the remaining pages.

use crate::fetch::ExtractionClient;
use crate::search::{paged_url, parse_listing_links, SearchState};
use std::collections::HashSet;

/// Walks pages 2..=total_pages of a query, accumulating trimmed links
pub(crate) async fn walk_pages(
    client: &ExtractionClient,
    root: &str,
    state: &SearchState,
    total_pages: u32,
    links: &mut HashSet<String>,
) {
    for page in 2..=total_pages {
        let url = match paged_url(root, state, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not build URL for page {} of {}: {}", page, root, e);
                continue;
            }
        };

        let html = match client.fetch(url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to fetch HTML for page {} of {}: {}", page, root, e);
                continue;
            }
        };

        match parse_listing_links(&html) {
            Some(page_links) => {
                let added = page_links.len();
                links.extend(page_links);
                tracing::info!("Added {} links from page {} of {}", added, page, root);
            }
            None => {
                tracing::warn!("No results block on page {} of {}", page, root);
            }
        }
    }
}
