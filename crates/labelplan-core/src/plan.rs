//! Per-length count planning.

use crate::error::{PlanError, Result};

/// Split a total target of `n` distinct labels across the inclusive length
/// range `[min_length, max_length]`.
///
/// Every bucket gets `n / bucket_count`; the remainder is handed out one
/// unit at a time to the first buckets in index order, so any two buckets
/// differ by at most 1 and the result sums to exactly `n`.
pub fn fill_count_array(n: u64, min_length: u32, max_length: u32) -> Result<Vec<u64>> {
    if max_length < min_length {
        return Err(PlanError::InvalidRange {
            min: min_length,
            max: max_length,
        });
    }
    let buckets = (max_length - min_length + 1) as u64;
    let base = n / buckets;
    let remainder = (n - base * buckets) as usize;
    let mut counts = vec![base; buckets as usize];
    for count in counts.iter_mut().take(remainder) {
        *count += 1;
    }
    Ok(counts)
}
