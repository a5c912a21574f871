use crate::output::print_json;
use anyhow::Context;
use labelplan_core::store::ProgressStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

pub fn run(
    n: u64,
    max_length: u32,
    dir: &Path,
    recorders: &[String],
    seed: u64,
    json: bool,
) -> anyhow::Result<()> {
    let store = ProgressStore::new(dir);
    let mut rng = StdRng::seed_from_u64(seed);
    let skipped = store
        .update_all(&mut rng, n, max_length, recorders)
        .context("failed to update sheets")?;

    if json {
        print_json(&serde_json::json!({ "skipped_lengths": skipped }))?;
        return Ok(());
    }
    if !skipped.is_empty() {
        let list: Vec<String> = skipped.iter().map(|l| l.to_string()).collect();
        println!("Skipped lengths: {}", list.join(", "));
    }
    println!("Done.");
    Ok(())
}
