/// Fjall-based bucket store and the retention engine that prunes it
///
/// A store is a Fjall keyspace; each partition is an independent, ordered
/// bucket of byte-string keys and values. This module deletes obsolete data
/// from named buckets, either whole buckets or only the entries of
/// time-ordered buckets whose timestamp key predates a cutoff.
///
/// ## Retention policies
///
/// - `circuit-fwd-log`: time-filtered (8-byte big-endian nanosecond keys)
/// - `closed-chan-bucket`, `historical-chan-bucket`: whole bucket only
/// - anything else: whole bucket only, filtered cleanup refused
///
/// All deletions of one run happen inside a single [`PruneTransaction`] and
/// become visible together on commit.
///
/// ## Usage
///
/// ```rust,ignore
/// use bucketprune::ledger::{Cutoff, FjallStore, Pruner};
///
/// let store = FjallStore::open_existing("data/channel")?;
/// let mut tx = store.begin();
/// let cutoff = Cutoff::older_than("2w".parse()?);
/// let outcomes = Pruner::default().prune(&mut tx, &["circuit-fwd-log"], Some(cutoff))?;
/// tx.commit()?;
/// ```

pub mod error;
pub mod partitions;
pub mod policy;
pub mod pruning;
pub mod store;
pub mod transaction;

pub use error::{LedgerError, Result};
pub use partitions::{decode_timestamp_key, encode_timestamp_key, TIMESTAMP_KEY_LEN};
pub use policy::{BucketPolicy, RetentionPolicy, DEFAULT_PROTECTED_BUCKETS};
pub use pruning::{delete_older_than, Applied, Cutoff, OutcomeRecord, Pruner};
pub use store::{FjallStore, PruneTransaction, StoreBucket};
pub use transaction::BucketTransaction;
