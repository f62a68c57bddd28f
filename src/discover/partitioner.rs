//! Facet partitioning for areas that exceed the pagination cap
//!
//! The upstream search index exposes only a bounded number of pages per
//! query, so an oversized result set is split into disjoint price bands
//! crossed with disjoint bedroom bands. Each sub-query is narrow enough to
//! (usually) fall under the cap and is paged independently; double-counting
//! across facets is expected and collapsed by the caller's dedup set.

use crate::config::{BedBand, PriceBand};
use crate::search::SearchState;

/// Builds one mutated state per price×bedroom facet, in band order.
///
/// With the default seven price bands and six bed bands this yields 42
/// disjoint sub-queries covering the whole result set.
pub fn facet_states(
    base: &SearchState,
    price_bands: &[PriceBand],
    bed_bands: &[BedBand],
) -> Vec<SearchState> {
    let mut states = Vec::with_capacity(price_bands.len() * bed_bands.len());
    for price in price_bands {
        let mut priced = base.clone();
        priced.set_price(price.min, price.max);
        for beds in bed_bands {
            let mut faceted = priced.clone();
            faceted.set_beds(beds.min, beds.max);
            states.push(faceted);
        }
    }
    states
}
