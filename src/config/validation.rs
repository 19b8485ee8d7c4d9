use crate::config::types::{ApiConfig, Config, PollingConfig, ViewConfig};
use crate::ConfigError;
use url::Url;

/// Shortest poll interval accepted (milliseconds)
const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Longest poll interval accepted (milliseconds)
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Largest page size accepted
const MAX_PAGE_SIZE: usize = 500;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_polling_config(&config.polling)?;
    validate_view_config(&config.view)?;
    Ok(())
}

/// Validates API connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot carry a query or fragment",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates poll intervals
fn validate_polling_config(config: &PollingConfig) -> Result<(), ConfigError> {
    validate_interval("list-interval-ms", config.list_interval_ms)?;
    validate_interval("detail-interval-ms", config.detail_interval_ms)?;
    Ok(())
}

fn validate_interval(name: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, value
        )));
    }
    Ok(())
}

/// Validates list presentation settings
fn validate_view_config(config: &ViewConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }
    Ok(())
}
