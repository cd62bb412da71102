use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "BUCKETPRUNE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/bucketprune.toml";
const ENV_PREFIX: &str = "BUCKETPRUNE";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (explicit path, `BUCKETPRUNE_CONFIG`, or the default path if present)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
///
/// An explicitly given file must exist; the fallback paths are optional.
pub fn load(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    match explicit {
        Some(path) => load_from_sources(path, true),
        None => {
            let config_path = env::var(CONFIG_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
            load_from_sources(config_path, false)
        }
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf, required: bool) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Start with defaults (handled by struct Default implementations)
    if required || config_path.exists() {
        tracing::debug!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(required));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // BUCKETPRUNE__LOGGING__FILTER -> logging.filter
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BucketPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path, false).unwrap();
        assert_eq!(config.retention.protected.len(), 3);
        assert!(config.retention.policies.is_empty());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        assert!(load_from_sources(config_path, true).is_err());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[retention.policies]
payments-log = "time_filtered"
invoices = "bucket_only"

[logging]
filter = "info"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path, true).unwrap();
        assert_eq!(config.logging.filter, "info");
        assert_eq!(
            config.retention.policies.get("payments-log"),
            Some(&BucketPolicy::TimeFiltered)
        );
        assert_eq!(
            config.retention.policies.get("invoices"),
            Some(&BucketPolicy::BucketOnly)
        );
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(
            &config_path,
            r#"
[retention.policies]
payments-log = "sometimes"
            "#,
        )
        .unwrap();

        assert!(load_from_sources(config_path, true).is_err());
    }
}
