//! Listing records and detail-page field extraction

mod fields;
mod record;

pub use fields::HtmlFieldExtractor;
pub use record::{FieldExtractor, ListingRecord, UNAVAILABLE};
