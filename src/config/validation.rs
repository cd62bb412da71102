use super::models::Config;
use crate::ledger::BucketPolicy;
use crate::ledger::partitions::is_valid_bucket_name;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid bucket name '{name}' in {field}")]
    InvalidBucketName { field: String, name: String },

    #[error("Bucket '{bucket}' is protected but configured as time_filtered")]
    ProtectedTimeFiltered { bucket: String },

    #[error("Logging filter must not be empty")]
    EmptyLogFilter,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_policies(config)?;
    validate_protected(config)?;
    validate_logging(config)?;
    Ok(())
}

/// Every configured policy must name a bucket the store can hold
fn validate_policies(config: &Config) -> Result<(), ValidationError> {
    for name in config.retention.policies.keys() {
        if !is_valid_bucket_name(name) {
            return Err(ValidationError::InvalidBucketName {
                field: "retention.policies".to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

/// Protected buckets must be valid names and never opted into filtered pruning
fn validate_protected(config: &Config) -> Result<(), ValidationError> {
    for name in &config.retention.protected {
        if !is_valid_bucket_name(name) {
            return Err(ValidationError::InvalidBucketName {
                field: "retention.protected".to_string(),
                name: name.clone(),
            });
        }

        if config.retention.policies.get(name) == Some(&BucketPolicy::TimeFiltered) {
            return Err(ValidationError::ProtectedTimeFiltered {
                bucket: name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    if config.logging.filter.trim().is_empty() {
        return Err(ValidationError::EmptyLogFilter);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_policy_bucket_name() {
        let mut config = Config::default();
        config
            .retention
            .policies
            .insert("bad name".to_string(), BucketPolicy::BucketOnly);

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidBucketName { field, name })
                if field == "retention.policies" && name == "bad name"
        ));
    }

    #[test]
    fn test_invalid_protected_bucket_name() {
        let mut config = Config::default();
        config.retention.protected.push(String::new());

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidBucketName { field, .. }) if field == "retention.protected"
        ));
    }

    #[test]
    fn test_protected_bucket_cannot_be_time_filtered() {
        let mut config = Config::default();
        config
            .retention
            .policies
            .insert("revocation-log".to_string(), BucketPolicy::TimeFiltered);

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::ProtectedTimeFiltered { bucket }) if bucket == "revocation-log"
        ));
    }

    #[test]
    fn test_protected_bucket_may_be_bucket_only() {
        let mut config = Config::default();
        config
            .retention
            .policies
            .insert("revocation-log".to_string(), BucketPolicy::BucketOnly);

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_log_filter() {
        let mut config = Config::default();
        config.logging.filter = "  ".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::EmptyLogFilter)
        ));
    }
}
