//! Configuration management for bucketprune
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use bucketprune::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Protected buckets: {:?}", config.retention.protected);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `BUCKETPRUNE__<section>__<key>`, e.g. `BUCKETPRUNE__LOGGING__FILTER=debug`.
//!
//! # Configuration File
//!
//! Without `--config`, the file is read from `BUCKETPRUNE_CONFIG` or
//! `config/bucketprune.toml` when present.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{Config, LoggingConfig, RetentionConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly given file is missing or malformed
    /// - Validation fails (invalid bucket names, protected bucket marked time_filtered)
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path, true)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
