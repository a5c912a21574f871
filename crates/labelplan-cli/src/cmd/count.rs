use crate::output::print_json;
use labelplan_core::store::ProgressStore;
use std::path::Path;

pub fn run(dir: &Path, json: bool) -> anyhow::Result<()> {
    if !dir.exists() {
        anyhow::bail!("directory does not exist: {}", dir.display());
    }
    let total = ProgressStore::new(dir).row_total()?;

    if json {
        print_json(&serde_json::json!({ "total_rows": total }))?;
    } else {
        println!("Total number of rows: {total}");
    }
    Ok(())
}
