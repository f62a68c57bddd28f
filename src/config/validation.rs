use crate::config::types::{BedBand, Config, CrawlConfig, FetchConfig, PriceBand, UpstreamConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_upstream_config(&config.upstream)?;
    validate_fetch_config(&config.fetch)?;
    validate_crawl_config(&config.crawl)?;
    validate_paths(config)?;
    Ok(())
}

/// Validates the extraction service configuration
fn validate_upstream_config(config: &UpstreamConfig) -> Result<(), ConfigError> {
    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::Validation(format!("Invalid upstream endpoint: {}", e)))?;

    if config.api_key.is_empty() {
        return Err(ConfigError::Validation(
            "upstream api-key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry/backoff policy
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawl orchestration parameters
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.page_cap < 2 {
        return Err(ConfigError::Validation(format!(
            "page_cap must be >= 2, got {}",
            config.page_cap
        )));
    }

    if config.discovery_workers < 1 || config.discovery_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "discovery_workers must be between 1 and 100, got {}",
            config.discovery_workers
        )));
    }

    if config.harvest_workers < 1 || config.harvest_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "harvest_workers must be between 1 and 100, got {}",
            config.harvest_workers
        )));
    }

    Url::parse(&config.search_host)
        .map_err(|e| ConfigError::Validation(format!("Invalid search-host: {}", e)))?;

    validate_price_bands(&config.price_bands)?;
    validate_bed_bands(&config.bed_bands)?;

    Ok(())
}

/// Price bands must be non-empty, ordered, and disjoint, with only the last
/// band unbounded above
fn validate_price_bands(bands: &[PriceBand]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::Validation(
            "price-bands cannot be empty".to_string(),
        ));
    }

    for (i, band) in bands.iter().enumerate() {
        match band.max {
            Some(max) if max < band.min => {
                return Err(ConfigError::Validation(format!(
                    "price band {}-{} has max below min",
                    band.min, max
                )));
            }
            None if i != bands.len() - 1 => {
                return Err(ConfigError::Validation(
                    "only the last price band may be unbounded".to_string(),
                ));
            }
            _ => {}
        }

        if i > 0 {
            let prev_max = bands[i - 1].max.unwrap_or(u64::MAX);
            if band.min <= prev_max {
                return Err(ConfigError::Validation(format!(
                    "price bands overlap at {}",
                    band.min
                )));
            }
        }
    }

    Ok(())
}

/// Bed bands must be non-empty, ordered, and disjoint
fn validate_bed_bands(bands: &[BedBand]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::Validation(
            "bed-bands cannot be empty".to_string(),
        ));
    }

    for (i, band) in bands.iter().enumerate() {
        if let Some(max) = band.max {
            if max < band.min {
                return Err(ConfigError::Validation(format!(
                    "bed band {}-{} has max below min",
                    band.min, max
                )));
            }
        } else if i != bands.len() - 1 {
            return Err(ConfigError::Validation(
                "only the last bed band may be unbounded".to_string(),
            ));
        }

        if i > 0 {
            let prev_max = bands[i - 1].max.unwrap_or(u32::MAX);
            if band.min <= prev_max {
                return Err(ConfigError::Validation(format!(
                    "bed bands overlap at {}",
                    band.min
                )));
            }
        }
    }

    Ok(())
}

/// Validates input/output paths are non-empty
fn validate_paths(config: &Config) -> Result<(), ConfigError> {
    for (name, value) in [
        ("areas-path", &config.input.areas_path),
        ("links-dir", &config.output.links_dir),
        ("records-dir", &config.output.records_dir),
        ("errors-dir", &config.output.errors_dir),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}
