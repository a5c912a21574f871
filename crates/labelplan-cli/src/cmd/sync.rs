use crate::output::print_json;
use anyhow::Context;
use labelplan_core::logscan::sync_logs;
use labelplan_core::store::ProgressStore;
use std::path::Path;

pub fn run(log_dir: &Path, data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let store = ProgressStore::new(data_dir);
    let total = sync_logs(&store, log_dir).context("failed to sync recording logs")?;

    if json {
        print_json(&serde_json::json!({ "total_synced": total }))?;
    } else {
        println!("Synced {total} completed recording(s).");
    }
    Ok(())
}
