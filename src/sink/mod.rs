//! Output sinks
//!
//! Three append-only structured sinks: discovered listing links (one column),
//! harvested listing records (fixed 8-column schema), and error records
//! (url, message). Row order is worker arrival order; callers must not depend
//! on it.

mod csv_sinks;
mod traits;

pub use csv_sinks::{
    read_links, CsvErrorSink, CsvLinkSink, CsvRecordSink, ERROR_HEADERS, LINK_HEADER,
    RECORD_HEADERS,
};
pub use traits::{ErrorSink, LinkSink, RecordSink};
