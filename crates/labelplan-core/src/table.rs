//! Assignment tables: one row per distinct label, with per-recorder shares.

use crate::error::{PlanError, Result};
use crate::label::generate_label;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashMap;

/// One recorder's slice of a row, aligned with the table's recorder list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecorderShare {
    pub total_count: u64,
    pub done_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    /// Unique within the table.
    pub label: String,
    /// Occurrences requested for this label, always >= 1.
    pub total_count: u64,
    /// Occurrences completed so far. Authoritative progress signal;
    /// reconciliation overwrites it, regeneration carries it forward.
    pub done_count: u64,
    /// Per-recorder sub-counts, one entry per table recorder in order.
    pub shares: Vec<RecorderShare>,
}

/// Ordered rows for one fixed label length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentTable {
    pub recorders: Vec<String>,
    pub rows: Vec<AssignmentRow>,
}

impl AssignmentTable {
    /// Build a fresh table: draw `target_distinct_count` labels of
    /// `length` symbols, collapse duplicates into `total_count`, and split
    /// each row's total across the recorders.
    ///
    /// The split gives every recorder `total / R`; the remainder goes one
    /// unit each to the first recorders of a per-row shuffle, so no single
    /// recorder systematically collects the extras across many rows.
    pub fn build(
        rng: &mut StdRng,
        length: u32,
        target_distinct_count: u64,
        recorders: &[String],
    ) -> Result<AssignmentTable> {
        if recorders.is_empty() {
            return Err(PlanError::EmptyRecorderSet);
        }

        let mut rows: Vec<AssignmentRow> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for _ in 0..target_distinct_count {
            let label = generate_label(rng, length as usize);
            match seen.get(&label) {
                Some(&i) => rows[i].total_count += 1,
                None => {
                    seen.insert(label.clone(), rows.len());
                    rows.push(AssignmentRow {
                        label,
                        total_count: 1,
                        done_count: 0,
                        shares: Vec::new(),
                    });
                }
            }
        }

        let r = recorders.len() as u64;
        let mut order: Vec<usize> = (0..recorders.len()).collect();
        for row in &mut rows {
            let each = row.total_count / r;
            let remaining = (row.total_count - each * r) as usize;
            order.shuffle(rng);
            let mut shares = vec![RecorderShare::default(); recorders.len()];
            for (pos, &idx) in order.iter().enumerate() {
                shares[idx].total_count = each + u64::from(pos < remaining);
            }
            row.shares = shares;
        }

        Ok(AssignmentTable { recorders: recorders.to_vec(), rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of `done_count` over all rows.
    pub fn done_total(&self) -> u64 {
        self.rows.iter().map(|r| r.done_count).sum()
    }

    pub fn find_row_mut(&mut self, label: &str) -> Option<&mut AssignmentRow> {
        self.rows.iter_mut().find(|r| r.label == label)
    }
}
