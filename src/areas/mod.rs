//! Area list input
//!
//! A CSV of (zip, region) rows seeds the crawl: one region groups many zip
//! codes, and each zip code seeds one area crawl. Zip codes are zero-padded
//! to five digits since spreadsheet tooling routinely strips leading zeros.

use crate::Result;
use serde::Deserialize;
use std::path::Path;

/// One geographic search unit with its parent-region label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Area {
    pub zip: String,
    pub region: String,
}

/// Loads the area list, zero-padding zip codes to five digits
pub fn load_areas(path: &Path) -> Result<Vec<Area>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut areas = Vec::new();
    for row in reader.deserialize() {
        let mut area: Area = row?;
        area.zip = format!("{:0>5}", area.zip);
        areas.push(area);
    }
    Ok(areas)
}
