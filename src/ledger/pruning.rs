/// Pruning engine: applies the retention policy to buckets inside one transaction
use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use super::error::Result;
use super::partitions::decode_timestamp_key;
use super::policy::{BucketPolicy, RetentionPolicy};
use super::transaction::BucketTransaction;
use crate::humanize::RetentionAge;

/// Boundary instant of a filtered prune, fixed for the whole run
///
/// Entries whose timestamp is strictly before the cutoff are expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff {
    nanos: i64,
}

impl Cutoff {
    pub fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Cutoff `age` before the current wall-clock time
    pub fn older_than(age: RetentionAge) -> Self {
        Self::older_than_at(OffsetDateTime::now_utc(), age)
    }

    /// Cutoff `age` before `now`, saturating at the earliest representable instant
    pub fn older_than_at(now: OffsetDateTime, age: RetentionAge) -> Self {
        let nanos = now.unix_timestamp_nanos() - age.as_nanos();
        Self {
            nanos: i64::try_from(nanos).unwrap_or(i64::MIN),
        }
    }

    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }

    pub fn is_expired(&self, timestamp_nanos: i64) -> bool {
        timestamp_nanos < self.nanos
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.nanos))
            .ok()
            .and_then(|at| at.format(&Rfc3339).ok());
        match formatted {
            Some(at) => f.write_str(&at),
            None => write!(f, "{}ns", self.nanos),
        }
    }
}

/// Strategy that was actually applied to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applied {
    /// Bucket did not exist; nothing to do
    NoOp,
    /// Bucket removed with all of its entries
    FullDelete,
    /// Entries older than the cutoff removed
    TimeFiltered,
    /// Filtered cleanup refused for this bucket; nothing deleted
    Unsupported,
}

/// Per-bucket result of a prune run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub bucket: String,
    pub applied: Applied,
    /// Entries removed; only set for time-filtered deletes
    pub deleted: Option<usize>,
    pub message: String,
}

impl OutcomeRecord {
    fn missing(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            applied: Applied::NoOp,
            deleted: None,
            message: "does not exist".to_string(),
        }
    }

    fn cleared(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            applied: Applied::FullDelete,
            deleted: None,
            message: "deleted entire bucket".to_string(),
        }
    }

    fn filtered(bucket: &str, deleted: usize) -> Self {
        Self {
            bucket: bucket.to_string(),
            applied: Applied::TimeFiltered,
            deleted: Some(deleted),
            message: format!("deleted {} entries older than cutoff", deleted),
        }
    }

    fn refused(bucket: &str, policy: BucketPolicy) -> Self {
        let message = match policy {
            BucketPolicy::BucketOnly => {
                "time-based cleanup not supported; use full clear instead"
            }
            _ => "bucket not recognized for time-based cleanup",
        };
        Self {
            bucket: bucket.to_string(),
            applied: Applied::Unsupported,
            deleted: None,
            message: message.to_string(),
        }
    }
}

/// Retention engine bound to a policy table
#[derive(Debug, Clone, Default)]
pub struct Pruner {
    policy: RetentionPolicy,
}

impl Pruner {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Prune each named bucket in order, returning one outcome per name
    ///
    /// Without a cutoff every existing bucket is deleted outright. With a
    /// cutoff only time-filtered buckets are touched; the rest are refused.
    /// Nothing is committed here: the caller owns the transaction.
    pub fn prune<T, S>(
        &self,
        tx: &mut T,
        buckets: &[S],
        cutoff: Option<Cutoff>,
    ) -> Result<Vec<OutcomeRecord>>
    where
        T: BucketTransaction,
        S: AsRef<str>,
    {
        buckets
            .iter()
            .map(|name| self.prune_bucket(tx, name.as_ref(), cutoff))
            .collect()
    }

    fn prune_bucket<T: BucketTransaction>(
        &self,
        tx: &mut T,
        name: &str,
        cutoff: Option<Cutoff>,
    ) -> Result<OutcomeRecord> {
        let Some(bucket) = tx.bucket(name)? else {
            info!(bucket = name, "Bucket does not exist, skipping");
            return Ok(OutcomeRecord::missing(name));
        };

        let Some(cutoff) = cutoff else {
            tx.delete_bucket(bucket)?;
            info!(bucket = name, "Deleted entire bucket");
            return Ok(OutcomeRecord::cleared(name));
        };

        match self.policy.lookup(name) {
            BucketPolicy::TimeFiltered => {
                let deleted = delete_older_than(tx, &bucket, cutoff)?;
                info!(bucket = name, deleted, %cutoff, "Deleted expired entries");
                Ok(OutcomeRecord::filtered(name, deleted))
            }
            policy => {
                info!(bucket = name, ?policy, "Time-based cleanup refused");
                Ok(OutcomeRecord::refused(name, policy))
            }
        }
    }
}

/// Remove every timestamp-keyed entry older than `cutoff` from a bucket
///
/// Runs in two passes: the scan only collects candidate keys, removals happen
/// after the iterator is finished. Keys that are not 8 bytes long are left
/// alone. Returns the number of removed entries.
pub fn delete_older_than<T: BucketTransaction>(
    tx: &mut T,
    bucket: &T::Bucket,
    cutoff: Cutoff,
) -> Result<usize> {
    let mut expired: Vec<Vec<u8>> = Vec::new();
    let mut scanned = 0usize;
    let mut skipped = 0usize;

    tx.scan_keys(bucket, |key| {
        scanned += 1;
        match decode_timestamp_key(key) {
            Some(timestamp) if cutoff.is_expired(timestamp) => expired.push(key.to_vec()),
            Some(_) => {}
            None => skipped += 1,
        }
    })?;
    debug!(scanned, skipped, expired = expired.len(), "Scan complete");

    for key in &expired {
        tx.remove(bucket, key)?;
    }

    Ok(expired.len())
}
