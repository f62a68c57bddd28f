//! Parsing of search-results pages
//!
//! Pulls the listing detail URLs and the reported total-page count out of the
//! same `__NEXT_DATA__` block the codec decodes. Both return `None` when the
//! block or the expected path inside it is missing.

use crate::search::codec::next_data;
use serde_json::Value;

/// Extracts the listing detail URLs from a results page, whitespace-trimmed
pub fn parse_listing_links(html: &str) -> Option<Vec<String>> {
    let data = next_data(html)?;
    let results = search_page_state(&data)?
        .get("cat1")?
        .get("searchResults")?
        .get("listResults")?
        .as_array()?;

    Some(
        results
            .iter()
            .filter_map(|entry| entry.get("detailUrl")?.as_str())
            .map(|url| url.trim().to_string())
            .collect(),
    )
}

/// Extracts the total number of result pages the upstream reports
pub fn parse_total_pages(html: &str) -> Option<u32> {
    let data = next_data(html)?;
    search_page_state(&data)?
        .get("cat1")?
        .get("searchList")?
        .get("totalPages")?
        .as_u64()
        .map(|pages| pages as u32)
}

fn search_page_state(data: &Value) -> Option<&Value> {
    data.get("props")?.get("pageProps")?.get("searchPageState")
}
