//! Turning a directory of raw recording logs into reconciliation input.
//!
//! Annotation tools drop one `.txt` file per label; the file stem is the
//! label and each `;` in the body marks one completed occurrence. Files
//! are bucketed by the label's symbol count so each bucket can be applied
//! to the matching length table.

use crate::error::Result;
use crate::label::component_count;
use crate::reconcile::reconcile;
use crate::store::ProgressStore;
use std::collections::BTreeMap;
use std::path::Path;

/// Per-length label -> completed-count buckets read from `log_dir`.
pub fn scan_logs(log_dir: &Path) -> Result<BTreeMap<usize, BTreeMap<String, u64>>> {
    let mut buckets: BTreeMap<usize, BTreeMap<String, u64>> = BTreeMap::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(label) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let completed = std::fs::read_to_string(&path)?
            .matches(';')
            .count() as u64;
        buckets
            .entry(component_count(label))
            .or_default()
            .insert(label.to_string(), completed);
    }
    Ok(buckets)
}

/// Scan `log_dir` and reconcile each bucket into its length table,
/// walking consecutive lengths from 1 and stopping at the first length
/// with no log entries. Returns the total completed count applied.
pub fn sync_logs(store: &ProgressStore, log_dir: &Path) -> Result<u64> {
    let buckets = scan_logs(log_dir)?;
    let mut total = 0u64;
    let mut length = 1usize;
    while let Some(counts) = buckets.get(&length) {
        let applied = reconcile(store, length as u32, counts)?;
        tracing::debug!(length, applied, "synced length");
        total += applied;
        length += 1;
    }
    Ok(total)
}
