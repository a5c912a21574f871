//! Per-length table persistence.
//!
//! Each length gets one CSV file named `<length>.csv` in the store
//! directory. Writes go through a tempfile-and-rename so a crashed run
//! never leaves a half-written table behind.

use crate::error::{PlanError, Result};
use crate::io::{atomic_write, ensure_dir};
use crate::plan::fill_count_array;
use crate::table::{AssignmentRow, AssignmentTable, RecorderShare};
use rand::rngs::StdRng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// What `update_or_create` did for one length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No file existed; a fresh table was written.
    Created,
    /// The file already had at least the requested number of rows; left
    /// untouched so in-progress work cannot shrink.
    Skipped,
    /// A larger table was written with prior done-progress carried forward.
    Regenerated,
}

pub struct ProgressStore {
    dir: PathBuf,
}

impl ProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ProgressStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, length: u32) -> PathBuf {
        self.dir.join(format!("{length}.csv"))
    }

    pub fn exists(&self, length: u32) -> bool {
        self.table_path(length).exists()
    }

    /// Lengths that have a persisted table, ascending.
    pub fn lengths(&self) -> Result<Vec<u32>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut lengths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".csv") {
                if let Ok(length) = stem.parse::<u32>() {
                    // Only canonical names: "007.csv" would be listed as 7
                    // but never loadable via table_path.
                    if stem == length.to_string() {
                        lengths.push(length);
                    }
                }
            }
        }
        lengths.sort_unstable();
        Ok(lengths)
    }

    pub fn load(&self, length: u32) -> Result<Option<AssignmentTable>> {
        let path = self.table_path(length);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        decode(&content, &path).map(Some)
    }

    pub fn save(&self, length: u32, table: &AssignmentTable) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write(&self.table_path(length), encode(table).as_bytes())
    }

    /// Total distinct rows across every stored table.
    pub fn row_total(&self) -> Result<u64> {
        let mut total = 0u64;
        for length in self.lengths()? {
            if let Some(table) = self.load(length)? {
                total += table.row_count() as u64;
            }
        }
        Ok(total)
    }

    /// Plan counts over `[min_length, max_length]` and write one fresh
    /// table per length.
    pub fn generate_all(
        &self,
        rng: &mut StdRng,
        n: u64,
        min_length: u32,
        max_length: u32,
        recorders: &[String],
    ) -> Result<()> {
        let counts = fill_count_array(n, min_length, max_length)?;
        for (i, &count) in counts.iter().enumerate() {
            let length = min_length + i as u32;
            let table = AssignmentTable::build(rng, length, count, recorders)?;
            self.save(length, &table)?;
            tracing::debug!(length, rows = table.row_count(), "wrote table");
        }
        Ok(())
    }

    /// Re-plan counts over `1..=max_length` and grow each stored table to
    /// its new target. Returns the lengths that were skipped because their
    /// table already met or exceeded the target.
    pub fn update_all(
        &self,
        rng: &mut StdRng,
        n: u64,
        max_length: u32,
        recorders: &[String],
    ) -> Result<Vec<u32>> {
        let counts = fill_count_array(n, 1, max_length)?;
        let mut skipped = Vec::new();
        for (i, &count) in counts.iter().enumerate() {
            let length = 1 + i as u32;
            if self.update_or_create(rng, length, count, recorders)? == UpdateOutcome::Skipped {
                skipped.push(length);
            }
        }
        Ok(skipped)
    }

    /// Bring the table for `length` up to `target_distinct_count` rows
    /// without ever losing recorded progress.
    ///
    /// Carry-forward is positional: the first `done_total` rows of the new
    /// table are marked one-done each, so the table keeps the same overall
    /// done total it had before. Rows are not matched by label content.
    pub fn update_or_create(
        &self,
        rng: &mut StdRng,
        length: u32,
        target_distinct_count: u64,
        recorders: &[String],
    ) -> Result<UpdateOutcome> {
        let existing = match self.load(length)? {
            None => {
                let table =
                    AssignmentTable::build(rng, length, target_distinct_count, recorders)?;
                self.save(length, &table)?;
                return Ok(UpdateOutcome::Created);
            }
            Some(t) => t,
        };

        if target_distinct_count <= existing.row_count() as u64 {
            tracing::debug!(
                length,
                rows = existing.row_count(),
                target = target_distinct_count,
                "target not above current row count, skipping"
            );
            return Ok(UpdateOutcome::Skipped);
        }

        let mut fresh = AssignmentTable::build(rng, length, target_distinct_count, recorders)?;
        let carry = existing.done_total() as usize;
        for row in fresh.rows.iter_mut().take(carry) {
            row.done_count = 1;
        }
        self.save(length, &fresh)?;
        Ok(UpdateOutcome::Regenerated)
    }
}

// ---------------------------------------------------------------------------
// CSV codec
// ---------------------------------------------------------------------------

fn encode(table: &AssignmentTable) -> String {
    let mut out = String::new();
    out.push_str("label,total_count,done_count");
    for name in &table.recorders {
        let _ = write!(out, ",{name}_total_count,{name}_done_count");
    }
    out.push('\n');
    for row in &table.rows {
        let _ = write!(out, "{},{},{}", row.label, row.total_count, row.done_count);
        for share in &row.shares {
            let _ = write!(out, ",{},{}", share.total_count, share.done_count);
        }
        out.push('\n');
    }
    out
}

fn corrupt(path: &Path, reason: impl Into<String>) -> PlanError {
    PlanError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Column layout derived from a header line.
struct Layout {
    /// Leading index column present (written by some external editors).
    skip_first: bool,
    label: usize,
    total: usize,
    done: usize,
    /// Recorder name -> (total column, done column), in appearance order.
    recorders: Vec<(String, usize, usize)>,
    width: usize,
}

fn parse_header(header: &str, path: &Path) -> Result<Layout> {
    let mut cells: Vec<&str> = header.split(',').collect();
    // Tolerate a leading row-index column: skip it, never treat it as data.
    let skip_first = cells.first().is_some_and(|c| *c != "label");
    if skip_first {
        cells.remove(0);
    }

    let mut label = None;
    let mut total = None;
    let mut done = None;
    let mut totals: Vec<(String, usize)> = Vec::new();
    let mut dones: Vec<(String, usize)> = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        match *cell {
            "label" => label = Some(i),
            "total_count" => total = Some(i),
            "done_count" => done = Some(i),
            other => {
                if let Some(name) = other.strip_suffix("_total_count") {
                    totals.push((name.to_string(), i));
                } else if let Some(name) = other.strip_suffix("_done_count") {
                    dones.push((name.to_string(), i));
                } else {
                    return Err(corrupt(path, format!("unknown column '{other}'")));
                }
            }
        }
    }

    let label = label.ok_or_else(|| corrupt(path, "missing 'label' column"))?;
    let total = total.ok_or_else(|| corrupt(path, "missing 'total_count' column"))?;
    let done = done.ok_or_else(|| corrupt(path, "missing 'done_count' column"))?;

    let mut recorders = Vec::with_capacity(totals.len());
    for (name, tcol) in totals {
        let dcol = dones
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, i)| i)
            .ok_or_else(|| corrupt(path, format!("recorder '{name}' has no done column")))?;
        recorders.push((name, tcol, dcol));
    }
    if dones.len() != recorders.len() {
        return Err(corrupt(path, "recorder done column without a total column"));
    }

    Ok(Layout {
        skip_first,
        label,
        total,
        done,
        recorders,
        width: cells.len(),
    })
}

fn parse_count(cell: &str, path: &Path) -> Result<u64> {
    cell.trim()
        .parse::<u64>()
        .map_err(|_| corrupt(path, format!("bad count value '{cell}'")))
}

fn decode(content: &str, path: &Path) -> Result<AssignmentTable> {
    let mut lines = content.lines();
    let header = lines.next().ok_or_else(|| corrupt(path, "empty file"))?;
    let layout = parse_header(header, path)?;

    let mut rows = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut cells: Vec<&str> = line.split(',').collect();
        if layout.skip_first {
            if cells.is_empty() {
                return Err(corrupt(path, "short row"));
            }
            cells.remove(0);
        }
        if cells.len() != layout.width {
            return Err(corrupt(
                path,
                format!("row has {} cells, expected {}", cells.len(), layout.width),
            ));
        }
        let mut shares = Vec::with_capacity(layout.recorders.len());
        for &(_, tcol, dcol) in &layout.recorders {
            shares.push(RecorderShare {
                total_count: parse_count(cells[tcol], path)?,
                done_count: parse_count(cells[dcol], path)?,
            });
        }
        rows.push(AssignmentRow {
            label: cells[layout.label].to_string(),
            total_count: parse_count(cells[layout.total], path)?,
            done_count: parse_count(cells[layout.done], path)?,
            shares,
        });
    }

    Ok(AssignmentTable {
        recorders: layout.recorders.into_iter().map(|(n, _, _)| n).collect(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn recorders(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn store() -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn save_load_round_trip() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(98);
        let table = AssignmentTable::build(&mut rng, 2, 40, &recorders(&["A", "B"])).unwrap();
        store.save(2, &table).unwrap();
        let back = store.load(2).unwrap().unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load(7).unwrap().is_none());
        assert!(!store.exists(7));
    }

    #[test]
    fn loader_tolerates_index_column() {
        let (dir, store) = store();
        let content = "\
,label,total_count,done_count,A_total_count,A_done_count
0,AbiSabz,2,1,2,0
1,RuzRuz,1,0,1,1
";
        std::fs::write(dir.path().join("2.csv"), content).unwrap();
        let table = store.load(2).unwrap().unwrap();
        assert_eq!(table.recorders, vec!["A"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "AbiSabz");
        assert_eq!(table.rows[0].total_count, 2);
        assert_eq!(table.rows[0].done_count, 1);
        assert_eq!(table.rows[1].shares[0].done_count, 1);
    }

    #[test]
    fn loader_accepts_done_before_total_order() {
        let (dir, store) = store();
        let content = "label,done_count,total_count\nAbi,1,3\n";
        std::fs::write(dir.path().join("1.csv"), content).unwrap();
        let table = store.load(1).unwrap().unwrap();
        assert_eq!(table.rows[0].total_count, 3);
        assert_eq!(table.rows[0].done_count, 1);
    }

    #[test]
    fn loader_rejects_unknown_column() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("1.csv"), "label,total_count,done_count,junk\n").unwrap();
        assert!(matches!(
            store.load(1),
            Err(PlanError::Corrupt { .. })
        ));
    }

    #[test]
    fn loader_rejects_bad_count() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join("1.csv"),
            "label,total_count,done_count\nAbi,x,0\n",
        )
        .unwrap();
        assert!(matches!(store.load(1), Err(PlanError::Corrupt { .. })));
    }

    #[test]
    fn lengths_lists_numeric_csv_files_sorted() {
        let (dir, store) = store();
        for name in ["3.csv", "1.csv", "10.csv", "notes.txt", "x.csv"] {
            std::fs::write(dir.path().join(name), "label,total_count,done_count\n").unwrap();
        }
        assert_eq!(store.lengths().unwrap(), vec![1, 3, 10]);
    }

    #[test]
    fn lengths_skips_non_canonical_numeric_names() {
        let (dir, store) = store();
        for name in ["007.csv", "+7.csv", "7.csv"] {
            std::fs::write(dir.path().join(name), "label,total_count,done_count\n").unwrap();
        }
        // "007" and "+7" both parse as 7 but load() would never find them.
        assert_eq!(store.lengths().unwrap(), vec![7]);
        assert_eq!(store.row_total().unwrap(), 0);
    }

    #[test]
    fn row_total_sums_across_tables() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(98);
        store.generate_all(&mut rng, 30, 2, 4, &recorders(&["A"])).unwrap();
        let expected: u64 = store
            .lengths()
            .unwrap()
            .into_iter()
            .map(|l| store.load(l).unwrap().unwrap().row_count() as u64)
            .sum();
        assert_eq!(store.row_total().unwrap(), expected);
        assert!(expected > 0);
    }

    #[test]
    fn generate_all_writes_one_table_per_length() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(98);
        store.generate_all(&mut rng, 10, 1, 3, &recorders(&["A", "B"])).unwrap();
        assert_eq!(store.lengths().unwrap(), vec![1, 2, 3]);
        // 10 over 3 buckets: 4,3,3 occurrences by length.
        let occ: Vec<u64> = (1..=3)
            .map(|l| {
                store
                    .load(l)
                    .unwrap()
                    .unwrap()
                    .rows
                    .iter()
                    .map(|r| r.total_count)
                    .sum()
            })
            .collect();
        assert_eq!(occ, vec![4, 3, 3]);
    }

    #[test]
    fn update_creates_missing_table() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(98);
        let outcome = store
            .update_or_create(&mut rng, 2, 5, &recorders(&["A"]))
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Created);
        assert!(store.exists(2));
    }

    #[test]
    fn update_skips_when_target_not_above_row_count() {
        let (_dir, store) = store();
        let names = recorders(&["A"]);
        let mut rng = StdRng::seed_from_u64(98);
        // Length 4 over 16^4 labels: 5 draws collide with negligible odds.
        store.update_or_create(&mut rng, 4, 5, &names).unwrap();
        let before = std::fs::read_to_string(store.dir().join("4.csv")).unwrap();

        let outcome = store.update_or_create(&mut rng, 4, 3, &names).unwrap();
        assert_eq!(outcome, UpdateOutcome::Skipped);
        let after = std::fs::read_to_string(store.dir().join("4.csv")).unwrap();
        assert_eq!(before, after, "skip must leave the file untouched");
    }

    #[test]
    fn update_carries_done_total_forward_by_position() {
        let (_dir, store) = store();
        let names = recorders(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(98);
        store.update_or_create(&mut rng, 4, 6, &names).unwrap();

        // Record some progress by hand.
        let mut table = store.load(4).unwrap().unwrap();
        table.rows[0].done_count = 2;
        table.rows[3].done_count = 1;
        store.save(4, &table).unwrap();
        assert_eq!(store.load(4).unwrap().unwrap().done_total(), 3);

        let outcome = store.update_or_create(&mut rng, 4, 12, &names).unwrap();
        assert_eq!(outcome, UpdateOutcome::Regenerated);
        let grown = store.load(4).unwrap().unwrap();
        assert!(grown.row_count() > 6);
        assert_eq!(grown.done_total(), 3, "prior progress must be preserved");
        // Positional semantics: exactly the first three rows are marked.
        assert!(grown.rows[..3].iter().all(|r| r.done_count == 1));
        assert!(grown.rows[3..].iter().all(|r| r.done_count == 0));
    }

    #[test]
    fn update_never_decreases_done_total() {
        let (_dir, store) = store();
        let names = recorders(&["A"]);
        let mut rng = StdRng::seed_from_u64(98);
        store.update_or_create(&mut rng, 3, 4, &names).unwrap();
        let mut table = store.load(3).unwrap().unwrap();
        table.rows[0].done_count = 1;
        store.save(3, &table).unwrap();

        for target in [2, 4, 8, 8] {
            let before = store.load(3).unwrap().unwrap().done_total();
            store.update_or_create(&mut rng, 3, target, &names).unwrap();
            let after = store.load(3).unwrap().unwrap().done_total();
            assert!(after >= before, "target {target}: {after} < {before}");
        }
    }

    #[test]
    fn update_all_reports_skipped_lengths() {
        let (_dir, store) = store();
        let names = recorders(&["A"]);
        let mut rng = StdRng::seed_from_u64(98);
        store.generate_all(&mut rng, 30, 1, 3, &names).unwrap();
        // A smaller total makes every existing length skip.
        let skipped = store.update_all(&mut rng, 3, 3, &names).unwrap();
        assert_eq!(skipped, vec![1, 2, 3]);
    }
}
