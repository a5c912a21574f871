use crate::output::{print_json, print_table};
use anyhow::Context;
use labelplan_core::stats::aggregate;
use labelplan_core::store::ProgressStore;
use std::path::Path;

pub fn run(dir: &Path, json: bool) -> anyhow::Result<()> {
    let store = ProgressStore::new(dir);
    let stats = aggregate(&store).context("failed to aggregate stats")?;

    if json {
        print_json(&stats)?;
        return Ok(());
    }

    let mut rows: Vec<Vec<String>> = stats
        .recorders
        .iter()
        .map(|r| vec![r.name.clone(), r.done_count.to_string()])
        .collect();
    rows.push(vec!["total".to_string(), stats.total_done_count.to_string()]);
    print_table(&["recorder", "done"], rows);
    Ok(())
}
