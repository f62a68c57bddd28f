//! Encoding and decoding of search states embedded in upstream pages
//!
//! Search pages embed their full state as JSON in a `__NEXT_DATA__` script
//! block. Decoding locates that block; an absent block is an explicit `None`
//! ("area not parseable, skip"), never an error. Encoding reconstructs a URL
//! the upstream accepts, with the state JSON percent-encoded in the query.

use crate::search::state::SearchState;
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

/// Extracts the embedded structured-data block from a fetched page
pub(crate) fn next_data(html: &str) -> Option<Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__").ok()?;
    let script = document.select(&selector).next()?;
    let text: String = script.text().collect();
    serde_json::from_str(&text).ok()
}

/// Decodes the base search path and raw query state from a rendered page.
///
/// Returns `None` when the structured-data block is missing; callers must
/// treat this as "area not parseable" and skip it.
pub fn decode_query_state(html: &str) -> Option<(String, Value)> {
    let data = next_data(html)?;
    let page_state = data.get("props")?.get("pageProps")?.get("searchPageState")?;
    let base_path = page_state
        .get("searchPageSeoObject")?
        .get("baseUrl")?
        .as_str()?
        .to_string();
    let query = page_state.get("queryState")?.clone();
    Some((base_path, query))
}

/// The seed URL for an area, before any state is known
pub fn area_seed_url(host: &str, zip: &str) -> String {
    format!("{}/homes/{}_rb/", host.trim_end_matches('/'), zip)
}

/// The search root for the "for sale" flow
pub fn for_sale_root(host: &str, base_path: &str) -> String {
    format!("{}/homes{}", host.trim_end_matches('/'), base_path)
}

/// The search root for the "recently sold" flow
pub fn sold_root(host: &str, base_path: &str) -> String {
    format!("{}{}sold/", host.trim_end_matches('/'), base_path)
}

/// Encodes a state into a search URL under the given root
pub fn search_url(root: &str, state: &SearchState) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(root)?;
    url.query_pairs_mut()
        .clear()
        .append_pair("searchQueryState", &state.to_json());
    Ok(url)
}

/// Encodes a state into the URL of a specific results page.
///
/// The upstream expects the page number both as a path segment (`/{n}_p/`)
/// and as the pagination cursor inside the state.
pub fn paged_url(root: &str, state: &SearchState, page: u32) -> Result<Url, url::ParseError> {
    let mut paged = state.clone();
    paged.set_page(page);
    let base = format!("{}/{}_p/", root.trim_end_matches('/'), page);
    search_url(&base, &paged)
}

/// Parses a state back out of an encoded search URL.
///
/// Inverse of [`search_url`] with respect to every field the crawler mutates.
pub fn state_from_url(url: &Url) -> Option<SearchState> {
    let (_, json) = url
        .query_pairs()
        .find(|(key, _)| key == "searchQueryState")?;
    let value: Value = serde_json::from_str(&json).ok()?;
    SearchState::from_value(value)
}
