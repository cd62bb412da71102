use crate::ledger::{BucketPolicy, RetentionPolicy, DEFAULT_PROTECTED_BUCKETS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retention configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Extra or overriding bucket policies, merged over the built-in table
    #[serde(default)]
    pub policies: BTreeMap<String, BucketPolicy>,
    /// Buckets that are never pruned unless forced
    #[serde(default = "default_protected")]
    pub protected: Vec<String>,
}

impl RetentionConfig {
    /// Built-in policy table with configured overrides applied
    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy::builtin().with_overrides(&self.policies)
    }

    pub fn is_protected(&self, bucket: &str) -> bool {
        self.protected.iter().any(|name| name == bucket)
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            policies: BTreeMap::new(),
            protected: default_protected(),
        }
    }
}

fn default_protected() -> Vec<String> {
    DEFAULT_PROTECTED_BUCKETS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::policy::{CIRCUIT_FWD_LOG, CLOSED_CHAN_BUCKET};

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.logging.filter, "warn");
        assert!(config.retention.policies.is_empty());
        assert!(config.retention.is_protected("open-chan-bucket"));
        assert!(config.retention.is_protected("revocation-log"));
        assert!(config.retention.is_protected("fwd-packages"));
        assert!(!config.retention.is_protected(CIRCUIT_FWD_LOG));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let config: Config = toml::from_str(
            r#"
[retention]
protected = ["wallet"]

[retention.policies]
payments-log = "time_filtered"
closed-chan-bucket = "unsupported"

[logging]
filter = "bucketprune=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.retention.protected, vec!["wallet"]);
        assert!(!config.retention.is_protected("open-chan-bucket"));
        assert_eq!(config.logging.filter, "bucketprune=debug");

        let policy = config.retention.policy();
        assert_eq!(policy.lookup("payments-log"), BucketPolicy::TimeFiltered);
        assert_eq!(policy.lookup(CLOSED_CHAN_BUCKET), BucketPolicy::Unsupported);
        assert_eq!(policy.lookup(CIRCUIT_FWD_LOG), BucketPolicy::TimeFiltered);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.retention.protected.len(), 3);
        assert_eq!(config.logging.filter, "warn");
    }
}
