//! Zipharvest: a zip-code-driven real-estate listing harvester
//!
//! This crate discovers listing detail URLs for a set of geographic areas on a
//! search-and-listing site, working around the upstream pagination cap by
//! splitting oversized result sets into disjoint price×bedroom facets, then
//! harvests each detail page into structured records through an unreliable
//! upstream extraction service with retry/backoff, bounded concurrency, and a
//! durable retry ledger for failures.

pub mod areas;
pub mod config;
pub mod discover;
pub mod fetch;
pub mod harvest;
pub mod ledger;
pub mod listing;
pub mod pipeline;
pub mod search;
pub mod sink;

use thiserror::Error;

/// Main error type for zipharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink error: {0}")]
    Sink(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for zipharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fetch::{ExtractionClient, FetchError};
pub use listing::{FieldExtractor, ListingRecord};
pub use search::SearchState;
