use super::error::Result;

/// Write access to a store's buckets within a single transaction
///
/// The retention engine only talks to the store through this trait. All
/// changes made through it become visible together when the owner commits.
pub trait BucketTransaction {
    /// Handle to an existing bucket
    type Bucket;

    /// Look up a bucket by name; `None` when it does not exist
    fn bucket(&mut self, name: &str) -> Result<Option<Self::Bucket>>;

    /// Visit every key of the bucket in ascending key order
    fn scan_keys<F>(&mut self, bucket: &Self::Bucket, visit: F) -> Result<()>
    where
        F: FnMut(&[u8]);

    /// Remove a single key from the bucket
    fn remove(&mut self, bucket: &Self::Bucket, key: &[u8]) -> Result<()>;

    /// Delete the bucket together with all of its entries
    fn delete_bucket(&mut self, bucket: Self::Bucket) -> Result<()>;
}
