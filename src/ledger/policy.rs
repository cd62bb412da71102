//! Retention policy: which deletion strategy each bucket allows
//!
//! The table is the single source of truth for age-based cleanup. A bucket
//! only gets a timestamp-filtered delete when its keys are known to be 8-byte
//! nanosecond timestamps; everything else can only be cleared as a whole.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Forwarding history, keyed by event timestamp
pub const CIRCUIT_FWD_LOG: &str = "circuit-fwd-log";
/// Summaries of closed channels
pub const CLOSED_CHAN_BUCKET: &str = "closed-chan-bucket";
/// Full state of historical channels
pub const HISTORICAL_CHAN_BUCKET: &str = "historical-chan-bucket";

/// Buckets that must never be cleared without an explicit override
pub const DEFAULT_PROTECTED_BUCKETS: &[&str] =
    &["open-chan-bucket", "revocation-log", "fwd-packages"];

const BUILTIN_POLICIES: &[(&str, BucketPolicy)] = &[
    (CIRCUIT_FWD_LOG, BucketPolicy::TimeFiltered),
    (CLOSED_CHAN_BUCKET, BucketPolicy::BucketOnly),
    (HISTORICAL_CHAN_BUCKET, BucketPolicy::BucketOnly),
];

/// Deletion strategy a bucket supports when an age filter is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketPolicy {
    /// Keys are 8-byte big-endian timestamps; old entries can be removed individually
    TimeFiltered,
    /// Keys carry no trusted timestamp; only a full clear is possible
    BucketOnly,
    /// Bucket is not recognized for filtered cleanup
    Unsupported,
}

/// Static mapping from bucket name to [`BucketPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    buckets: BTreeMap<String, BucketPolicy>,
}

impl RetentionPolicy {
    /// Policy table with no known buckets; every lookup is `Unsupported`
    pub fn empty() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Built-in table for the channel database buckets
    pub fn builtin() -> Self {
        let buckets = BUILTIN_POLICIES
            .iter()
            .map(|(name, policy)| (name.to_string(), *policy))
            .collect();
        Self { buckets }
    }

    /// Add or replace entries, e.g. from configuration
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a BucketPolicy)>,
    {
        for (name, policy) in overrides {
            self.buckets.insert(name.clone(), *policy);
        }
        self
    }

    /// Look up the strategy for a bucket
    pub fn lookup(&self, bucket: &str) -> BucketPolicy {
        self.buckets
            .get(bucket)
            .copied()
            .unwrap_or(BucketPolicy::Unsupported)
    }

    /// Iterate all explicitly configured buckets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, BucketPolicy)> {
        self.buckets.iter().map(|(name, policy)| (name.as_str(), *policy))
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}
