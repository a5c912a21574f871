//! Merging externally reported completion counts into a stored table.

use crate::error::{PlanError, Result};
use crate::store::ProgressStore;
use std::collections::BTreeMap;

/// Overwrite each matched row's `done_count` with the externally reported
/// total for that label, then save the table back.
///
/// The external count is authoritative, not a delta, so applying the same
/// input twice is a no-op. Returns the sum of all applied counts. Counts
/// above a row's `total_count` are accepted as reported.
pub fn reconcile(
    store: &ProgressStore,
    length: u32,
    external_counts: &BTreeMap<String, u64>,
) -> Result<u64> {
    let mut table = store
        .load(length)?
        .ok_or(PlanError::TableNotFound(length))?;

    let mut applied = 0u64;
    for (label, &completed) in external_counts {
        let row = table
            .find_row_mut(label)
            .ok_or_else(|| PlanError::UnknownLabel {
                label: label.clone(),
                length,
            })?;
        row.done_count = completed;
        applied += completed;
    }

    store.save(length, &table)?;
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AssignmentTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn seeded_store(length: u32, target: u64) -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        let mut rng = StdRng::seed_from_u64(98);
        let table =
            AssignmentTable::build(&mut rng, length, target, &["A".to_string()]).unwrap();
        store.save(length, &table).unwrap();
        (dir, store)
    }

    #[test]
    fn overwrites_done_count_for_matched_label() {
        let (_dir, store) = seeded_store(3, 5);
        let label = store.load(3).unwrap().unwrap().rows[0].label.clone();

        let counts = BTreeMap::from([(label.clone(), 2u64)]);
        let applied = reconcile(&store, 3, &counts).unwrap();
        assert_eq!(applied, 2);

        let table = store.load(3).unwrap().unwrap();
        let row = table.rows.iter().find(|r| r.label == label).unwrap();
        assert_eq!(row.done_count, 2);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let (_dir, store) = seeded_store(3, 5);
        let table = store.load(3).unwrap().unwrap();
        let counts: BTreeMap<String, u64> = table
            .rows
            .iter()
            .take(2)
            .map(|r| (r.label.clone(), 1u64))
            .collect();

        reconcile(&store, 3, &counts).unwrap();
        let once = store.load(3).unwrap().unwrap();
        reconcile(&store, 3, &counts).unwrap();
        let twice = store.load(3).unwrap().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let (_dir, store) = seeded_store(3, 5);
        let counts = BTreeMap::from([("NotInTheTable".to_string(), 1u64)]);
        assert!(matches!(
            reconcile(&store, 3, &counts),
            Err(PlanError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        let counts = BTreeMap::from([("Abi".to_string(), 1u64)]);
        assert!(matches!(
            reconcile(&store, 9, &counts),
            Err(PlanError::TableNotFound(9))
        ));
    }

    #[test]
    fn over_completion_is_accepted() {
        let (_dir, store) = seeded_store(2, 3);
        let row = store.load(2).unwrap().unwrap().rows[0].clone();
        let counts = BTreeMap::from([(row.label.clone(), row.total_count + 10)]);
        reconcile(&store, 2, &counts).unwrap();
        let table = store.load(2).unwrap().unwrap();
        assert_eq!(table.rows[0].done_count, row.total_count + 10);
    }
}
