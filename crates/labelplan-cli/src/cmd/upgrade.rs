use crate::output::print_json;
use anyhow::Context;
use labelplan_core::migrate::upgrade_dir;
use std::path::Path;

pub fn run(input: &Path, output: &Path, json: bool) -> anyhow::Result<()> {
    let report = upgrade_dir(input, output).context("migration failed")?;

    if json {
        print_json(&serde_json::json!({
            "converted": report.converted,
            "failed": report.failed,
        }))?;
        return Ok(());
    }
    println!("Converted {} file(s).", report.converted.len());
    if !report.failed.is_empty() {
        println!("Failed (not in legacy format): {}", report.failed.join(", "));
    }
    Ok(())
}
