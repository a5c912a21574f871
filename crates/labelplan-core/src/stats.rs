//! Per-recorder progress aggregation across all stored tables.

use crate::error::{PlanError, Result};
use crate::store::ProgressStore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RecorderStat {
    pub name: String,
    pub done_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    /// In the recorder order of the stored tables.
    pub recorders: Vec<RecorderStat>,
    pub total_done_count: u64,
}

/// Sum each recorder's done sub-counts over every table in the store.
///
/// The recorder set comes from the lowest-length table; any later table
/// with a different set is an error rather than a silent partial sum.
pub fn aggregate(store: &ProgressStore) -> Result<Stats> {
    let lengths = store.lengths()?;
    if lengths.is_empty() {
        return Err(PlanError::NoDataFound);
    }

    let mut names: Option<Vec<String>> = None;
    let mut sums: Vec<u64> = Vec::new();
    for length in lengths {
        let Some(table) = store.load(length)? else {
            continue;
        };
        match &names {
            None => {
                sums = vec![0; table.recorders.len()];
                names = Some(table.recorders.clone());
            }
            Some(expected) if *expected != table.recorders => {
                return Err(PlanError::DivergentRecorders { length });
            }
            Some(_) => {}
        }
        for row in &table.rows {
            for (sum, share) in sums.iter_mut().zip(&row.shares) {
                *sum += share.done_count;
            }
        }
    }

    let names = names.ok_or(PlanError::NoDataFound)?;
    let total_done_count = sums.iter().sum();
    Ok(Stats {
        recorders: names
            .into_iter()
            .zip(sums)
            .map(|(name, done_count)| RecorderStat { name, done_count })
            .collect(),
        total_done_count,
    })
}
