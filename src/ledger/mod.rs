//! Retry ledger
//!
//! The error sink's CSV file doubles as a durable ledger of failed URLs.
//! After a harvest pass, the ledger is loaded, rotated away, and every URL is
//! resubmitted through the same pool into the same record sink; URLs that
//! fail again land in the freshly initialized ledger. One retry pass per run,
//! no retry-of-retries.

use crate::Result;
use std::path::{Path, PathBuf};

/// A (url, message) pair recorded on harvest failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub url: String,
    pub message: String,
}

/// Durable record of failed URLs, backed by the error sink's CSV file
pub struct RetryLedger {
    path: PathBuf,
}

impl RetryLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every recorded failure; an absent ledger file means no failures
    pub fn load(&self) -> Result<Vec<ErrorRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let Some(url) = row.get(0) else { continue };
            if url.trim().is_empty() {
                continue;
            }
            records.push(ErrorRecord {
                url: url.trim().to_string(),
                message: row.get(1).unwrap_or("").to_string(),
            });
        }
        Ok(records)
    }

    /// Removes the ledger file so the retry pass starts against a fresh one
    pub fn rotate(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
