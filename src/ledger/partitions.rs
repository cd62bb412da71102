/// Key layout and bucket naming rules for Fjall partitions
///
/// Time-ordered buckets (e.g. `circuit-fwd-log`) key every record by its
/// insertion instant: `{timestamp_nanos:u64 big-endian}` -> opaque value.
/// Big-endian keeps the store's native byte ordering equal to chronological
/// ordering for every non-negative timestamp.

/// Width of a timestamp key in bytes
pub const TIMESTAMP_KEY_LEN: usize = 8;

/// Longest partition name Fjall accepts
const MAX_BUCKET_NAME_LEN: usize = 255;

/// Encode a nanosecond timestamp as an 8-byte big-endian key
pub fn encode_timestamp_key(timestamp_nanos: i64) -> [u8; TIMESTAMP_KEY_LEN] {
    (timestamp_nanos as u64).to_be_bytes()
}

/// Decode an 8-byte big-endian key back into a nanosecond timestamp
///
/// Returns `None` for keys of any other length: those are not timestamps and
/// callers skip them rather than failing the scan.
pub fn decode_timestamp_key(key: &[u8]) -> Option<i64> {
    let bytes: [u8; TIMESTAMP_KEY_LEN] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes) as i64)
}

/// Whether `name` can exist as a partition in the keyspace
///
/// Names failing this check can never be present in the store, so lookups
/// treat them as absent buckets.
pub fn is_valid_bucket_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_BUCKET_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '#' | '$'))
}
