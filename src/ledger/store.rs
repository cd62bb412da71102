use std::path::Path;

use fjall::{
    Config, PartitionCreateOptions, PersistMode, TxKeyspace, TxPartitionHandle, WriteTransaction,
};
use tracing::{debug, info, warn};

use super::error::{LedgerError, Result};
use super::partitions::is_valid_bucket_name;
use super::pruning::{Cutoff, OutcomeRecord, Pruner};
use super::transaction::BucketTransaction;

/// Fjall-backed bucket store; every partition is one bucket
#[derive(Clone)]
pub struct FjallStore {
    keyspace: TxKeyspace,
}

impl FjallStore {
    /// Open or create a Fjall store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening Fjall store at: {}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open_transactional()?;

        info!("Fjall store opened successfully");
        Ok(Self { keyspace })
    }

    /// Open a store that must already exist on disk
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LedgerError::StoreNotFound(path.to_path_buf()));
        }
        Self::open(path)
    }

    fn partition(&self, name: &str) -> Result<TxPartitionHandle> {
        if !is_valid_bucket_name(name) {
            return Err(LedgerError::InvalidBucketName(name.to_string()));
        }
        Ok(self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())?)
    }

    /// Insert a record, creating the bucket if needed
    pub fn insert(&self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let handle = self.partition(bucket)?;
        let mut tx = self.keyspace.write_tx();
        tx.insert(&handle, key, value);
        tx.commit()?;
        debug!(bucket, key_len = key.len(), "Inserted record");
        Ok(())
    }

    pub fn bucket_exists(&self, name: &str) -> bool {
        is_valid_bucket_name(name) && self.keyspace.partition_exists(name)
    }

    /// All keys of a bucket in ascending order, `None` if the bucket is absent
    pub fn keys(&self, name: &str) -> Result<Option<Vec<Vec<u8>>>> {
        if !self.bucket_exists(name) {
            return Ok(None);
        }
        let handle = self.partition(name)?;
        let tx = self.keyspace.read_tx();

        let mut keys = Vec::new();
        for item in tx.iter(&handle) {
            let (key, _) = item?;
            keys.push(key.to_vec());
        }
        Ok(Some(keys))
    }

    /// Number of entries in a bucket, `None` if the bucket is absent
    pub fn bucket_len(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.keys(name)?.map(|keys| keys.len()))
    }

    /// Start the single write transaction of a prune run
    pub fn begin(&self) -> PruneTransaction<'_> {
        PruneTransaction {
            store: self,
            tx: self.keyspace.write_tx(),
            dropped: Vec::new(),
        }
    }

    /// Prune the named buckets in one transaction and commit it
    ///
    /// Outcomes are only returned once the commit succeeded; on any store
    /// error nothing is applied.
    pub fn prune<S: AsRef<str>>(
        &self,
        pruner: &Pruner,
        buckets: &[S],
        cutoff: Option<Cutoff>,
    ) -> Result<Vec<OutcomeRecord>> {
        info!(buckets = buckets.len(), filtered = cutoff.is_some(), "Starting pruning process");
        let mut tx = self.begin();
        let outcomes = pruner.prune(&mut tx, buckets, cutoff)?;
        tx.commit()?;
        info!("Pruning completed: {} buckets processed", outcomes.len());
        Ok(outcomes)
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

/// Existing bucket resolved inside a [`PruneTransaction`]
pub struct StoreBucket {
    name: String,
    handle: TxPartitionHandle,
}

/// Write transaction spanning one prune run
///
/// Key removals are staged in the Fjall write transaction. Whole-bucket
/// deletes are staged here and applied only once that transaction has
/// committed, so a failed commit leaves every bucket as it was. Dropping the
/// transaction without committing discards everything.
///
/// A failure after the commit cannot be rolled back; it surfaces as
/// [`LedgerError::DropFailed`] or [`LedgerError::SyncFailed`].
pub struct PruneTransaction<'a> {
    store: &'a FjallStore,
    tx: WriteTransaction<'a>,
    dropped: Vec<StoreBucket>,
}

impl PruneTransaction<'_> {
    /// Commit staged removals, drop staged buckets and sync to disk
    pub fn commit(self) -> Result<()> {
        let Self { store, tx, dropped } = self;

        tx.commit()?;
        let staged: Vec<(String, TxPartitionHandle)> = dropped
            .into_iter()
            .map(|bucket| (bucket.name, bucket.handle))
            .collect();
        finish_commit(
            staged,
            |handle| Ok(store.keyspace.delete_partition(handle)?),
            || store.persist(),
        )?;

        info!("Prune transaction committed");
        Ok(())
    }
}

/// Drop staged buckets in order, then sync
///
/// Runs after the key removals committed. Stops at the first failing drop and
/// reports which buckets are already gone and which are still pending.
fn finish_commit<H>(
    staged: Vec<(String, H)>,
    mut drop_bucket: impl FnMut(H) -> Result<()>,
    persist: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let mut dropped = Vec::with_capacity(staged.len());
    let mut staged = staged.into_iter();

    while let Some((name, handle)) = staged.next() {
        if let Err(err) = drop_bucket(handle) {
            let pending: Vec<String> = staged.by_ref().map(|(name, _)| name).collect();
            warn!(bucket = %name, ?dropped, ?pending, "Dropping bucket failed after commit");
            return Err(LedgerError::DropFailed {
                bucket: name,
                dropped,
                pending,
                source: Box::new(err),
            });
        }
        debug!(bucket = %name, "Dropped partition");
        dropped.push(name);
    }

    persist().map_err(|err| LedgerError::SyncFailed {
        source: Box::new(err),
    })
}

impl BucketTransaction for PruneTransaction<'_> {
    type Bucket = StoreBucket;

    fn bucket(&mut self, name: &str) -> Result<Option<StoreBucket>> {
        if self.dropped.iter().any(|bucket| bucket.name == name) {
            return Ok(None);
        }
        if !self.store.bucket_exists(name) {
            return Ok(None);
        }
        let handle = self.store.partition(name)?;
        Ok(Some(StoreBucket {
            name: name.to_string(),
            handle,
        }))
    }

    fn scan_keys<F>(&mut self, bucket: &StoreBucket, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8]),
    {
        for item in self.tx.iter(&bucket.handle) {
            let (key, _) = item?;
            visit(&*key);
        }
        Ok(())
    }

    fn remove(&mut self, bucket: &StoreBucket, key: &[u8]) -> Result<()> {
        self.tx.remove(&bucket.handle, key);
        Ok(())
    }

    fn delete_bucket(&mut self, bucket: StoreBucket) -> Result<()> {
        self.dropped.push(bucket);
        Ok(())
    }
}
