//! Configuration module for bookscout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings have built-in defaults matching the well-known catalog origin,
//! so a config file is optional.
//!
//! # Example
//!
//! ```no_run
//! use bookscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scraping from: {}", config.scraper.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, JobsConfig, OutputConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
