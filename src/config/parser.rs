use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::io::ErrorKind;
use std::path::Path;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "crawl-deck.toml";

/// Parses and validates configuration from TOML text
///
/// Every key is optional, so an empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawl_deck::config::load_config;
///
/// let config = load_config(Path::new("deck.toml")).unwrap();
/// println!("Page size: {}", config.view.page_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Loads `path` when it exists and falls back to defaults when it does not
///
/// Only a missing file is tolerated. Unreadable or invalid files are still
/// reported, so a typo in an existing config never goes unnoticed.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(&content)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}
