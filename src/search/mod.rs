//! Search-state codec and results parsing
//!
//! This module is pure (no I/O): it decodes the filter+pagination state the
//! upstream embeds in its search pages, mutates it per facet/page, and
//! re-encodes it into URLs the fetch client can drive.

mod codec;
mod results;
mod state;

pub use codec::{
    area_seed_url, decode_query_state, for_sale_root, paged_url, search_url, sold_root,
    state_from_url,
};
pub use results::{parse_listing_links, parse_total_pages};
pub use state::SearchState;
