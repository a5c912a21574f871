use anyhow::Context;
use labelplan_core::store::ProgressStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;

pub fn run(
    n: u64,
    min_length: u32,
    max_length: u32,
    dir: &Path,
    recorders: &[String],
    force: bool,
    seed: u64,
) -> anyhow::Result<()> {
    let store = ProgressStore::new(dir);

    if !force && !store.lengths()?.is_empty() {
        print!("There are already sheets in {}. Overwrite? (y/n) ", dir.display());
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim() != "y" {
            println!("Canceled.");
            return Ok(());
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    store
        .generate_all(&mut rng, n, min_length, max_length, recorders)
        .context("failed to generate sheets")?;
    println!("Done.");
    Ok(())
}
