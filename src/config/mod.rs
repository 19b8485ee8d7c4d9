//! Configuration module for Crawl-Deck
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional, so an empty file (or no file at all) yields a config
//! pointing at a local backend.
//!
//! # Example
//!
//! ```no_run
//! use crawl_deck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("deck.toml")).unwrap();
//! println!("Talking to {}", config.api.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, PollingConfig, ViewConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config, DEFAULT_CONFIG_FILE};
pub use validation::validate;
