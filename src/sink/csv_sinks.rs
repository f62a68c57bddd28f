//! CSV sink implementations
//!
//! One CSV file per sink, append-mode, header written only when the file is
//! empty so interrupted runs can keep appending. Writes are serialized
//! through a mutex and flushed immediately; the error sink doubles as the
//! durable retry ledger.

use crate::listing::ListingRecord;
use crate::sink::traits::{ErrorSink, LinkSink, RecordSink};
use crate::{HarvestError, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

/// Column headers of the record CSV, in write order
pub const RECORD_HEADERS: [&str; 8] = [
    "address",
    "listed_price",
    "MLS #",
    "days_on_zillow",
    "views",
    "saves",
    "url",
    "timestamp",
];

/// Column headers of the error CSV
pub const ERROR_HEADERS: [&str; 2] = ["Error URL", "Error Message"];

/// Header of the link CSV
pub const LINK_HEADER: &str = "Property Link";

fn append_writer(path: &Path, headers: &[&str]) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(headers)?;
        writer.flush()?;
    }
    Ok(writer)
}

/// CSV sink for discovered listing links, one column
pub struct CsvLinkSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvLinkSink {
    /// Creates (truncating) the per-region link file and writes its header
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([LINK_HEADER])?;
        writer.flush()?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl LinkSink for CsvLinkSink {
    fn write_links(&self, links: &[String]) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        for link in links {
            writer.write_record([link.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// CSV sink for harvested listing records, fixed 8-column schema
pub struct CsvRecordSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvRecordSink {
    /// Opens the record file in append mode, writing the header if empty
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: Mutex::new(append_writer(path, &RECORD_HEADERS)?),
        })
    }
}

impl RecordSink for CsvRecordSink {
    fn write_record(&self, record: &ListingRecord) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.write_record([
            record.address.as_str(),
            record.listed_price.as_str(),
            record.mls_id.as_str(),
            record.days_on_market.as_str(),
            record.views.as_str(),
            record.saves.as_str(),
            record.url.as_str(),
            record.timestamp.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

/// CSV sink for (url, message) failure pairs; this file is the retry ledger
pub struct CsvErrorSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvErrorSink {
    /// Opens the error file in append mode, writing the header if empty
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: Mutex::new(append_writer(path, &ERROR_HEADERS)?),
        })
    }
}

impl ErrorSink for CsvErrorSink {
    fn write_error(&self, url: &str, message: &str) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.write_record([url, message])?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads a one-column link CSV back, skipping the header
pub fn read_links(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let mut links = Vec::new();
    for row in reader.records() {
        let row = row?;
        match row.get(0) {
            Some(link) if !link.trim().is_empty() => links.push(link.trim().to_string()),
            _ => {
                return Err(HarvestError::Sink(format!(
                    "malformed link row in {}",
                    path.display()
                )))
            }
        }
    }
    Ok(links)
}
