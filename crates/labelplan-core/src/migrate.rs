//! Migration of legacy one-row-per-occurrence sheets.
//!
//! The legacy format has exactly two columns, `label` and `done`, with one
//! row per requested occurrence. Migration groups identical labels,
//! counting rows into `total_count` and summing the done flags into
//! `done_count`. Files in any other format are reported as failed and
//! skipped; the batch itself always succeeds on the convertible rest.

use crate::error::{PlanError, Result};
use crate::io::{atomic_write, ensure_dir};
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub converted: Vec<String>,
    /// Files whose column set was not exactly `{label, done}`.
    pub failed: Vec<String>,
}

pub fn upgrade_dir(input: &Path, output: &Path) -> Result<MigrationReport> {
    let mut files: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".csv") {
            files.push(name);
        }
    }
    files.sort_unstable();

    let mut report = MigrationReport::default();
    for name in files {
        let path = input.join(&name);
        let content = std::fs::read_to_string(&path)?;
        match convert(&content, &path)? {
            Some(converted) => {
                ensure_dir(output)?;
                atomic_write(&output.join(&name), converted.as_bytes())?;
                report.converted.push(name);
            }
            None => {
                tracing::warn!(file = %name, "not in legacy format, skipping");
                report.failed.push(name);
            }
        }
    }
    Ok(report)
}

/// `Ok(None)` means the file is not in the legacy two-column format and
/// belongs in the failed list; malformed rows inside a legacy-shaped file
/// are fatal.
///
/// The column check is exact: a leading index column makes the file
/// non-legacy, same as any other extra column. No stripping here.
fn convert(content: &str, path: &Path) -> Result<Option<String>> {
    let corrupt = |reason: String| PlanError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let mut lines = content.lines();
    let Some(header) = lines.next() else {
        return Ok(None);
    };
    let raw: Vec<&str> = header.split(',').collect();
    let mut columns = raw.clone();
    columns.sort_unstable();
    if columns != ["done", "label"] {
        return Ok(None);
    }
    let label_first = raw[0] == "label";

    // Aggregate in first-encounter order.
    let mut order: Vec<String> = Vec::new();
    let mut totals: Vec<(u64, u64)> = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != 2 {
            return Err(corrupt(format!("bad row: {line}")));
        }
        let (label, done) = if label_first {
            (cells[0], cells[1])
        } else {
            (cells[1], cells[0])
        };
        let done: u64 = done
            .trim()
            .parse()
            .map_err(|_| corrupt(format!("bad done flag '{done}'")))?;
        match order.iter().position(|l| l == label) {
            Some(i) => {
                totals[i].0 += 1;
                totals[i].1 += done;
            }
            None => {
                order.push(label.to_string());
                totals.push((1, done));
            }
        }
    }

    let mut out = String::from("label,total_count,done_count\n");
    for (label, (total, done)) in order.iter().zip(&totals) {
        let _ = writeln!(out, "{label},{total},{done}");
    }
    Ok(Some(out))
}
