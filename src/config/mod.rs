//! Configuration module for zipharvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every retry/backoff/facet constant is policy, exposed here with the
//! documented defaults (5 retries, 1 s base delay, page cap 20, seven price
//! bands, six bed bands).
//!
//! # Example
//!
//! ```no_run
//! use zipharvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Facet split at {} pages", config.crawl.page_cap);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BedBand, Config, CrawlConfig, FetchConfig, InputConfig, OutputConfig, PriceBand,
    UpstreamConfig,
};

// Re-export parser functions
pub use parser::load_config;
