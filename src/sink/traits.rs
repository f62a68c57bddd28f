//! Sink trait seams
//!
//! The harvest pool and the discovery phase write through these traits so
//! tests can substitute in-memory sinks. All implementations must be safe to
//! call from concurrent workers.

use crate::listing::ListingRecord;
use crate::Result;

/// Append-only sink for discovered listing links
pub trait LinkSink: Send + Sync {
    fn write_links(&self, links: &[String]) -> Result<()>;
}

/// Append-only sink for harvested listing records
pub trait RecordSink: Send + Sync {
    fn write_record(&self, record: &ListingRecord) -> Result<()>;
}

/// Append-only sink for (url, message) failure pairs
pub trait ErrorSink: Send + Sync {
    fn write_error(&self, url: &str, message: &str) -> Result<()>;
}
