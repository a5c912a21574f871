mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "labelplan",
    about = "Plan, distribute, and track recording work over generated label sheets",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Seed for label generation and recorder shuffling
    #[arg(long, global = true, default_value_t = 98)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fresh assignment sheets, one per label length
    Generate {
        /// Total number of labels to plan across all lengths
        n: u64,
        /// Minimum label length (symbols)
        min_length: u32,
        /// Maximum label length (symbols)
        max_length: u32,
        /// Directory to write the sheets into
        dir: PathBuf,
        /// Comma-separated recorder names
        #[arg(value_delimiter = ',', required = true)]
        recorders: Vec<String>,
        /// Overwrite existing sheets without asking
        #[arg(long)]
        force: bool,
    },

    /// Count distinct rows across all sheets in a directory
    Count { dir: PathBuf },

    /// Grow existing sheets to a new total, preserving recorded progress
    Update {
        /// New total number of labels across lengths 1..=max_length
        n: u64,
        /// Maximum label length (symbols)
        max_length: u32,
        /// Directory holding the sheets
        dir: PathBuf,
        /// Comma-separated recorder names
        #[arg(value_delimiter = ',', required = true)]
        recorders: Vec<String>,
    },

    /// Convert legacy one-row-per-occurrence sheets to the current format
    Upgrade {
        /// Directory of legacy sheets
        input: PathBuf,
        /// Directory to write converted sheets into
        output: PathBuf,
    },

    /// Pull completion counts from recording logs into the sheets
    Sync {
        /// Directory of .txt recording logs
        log_dir: PathBuf,
        /// Directory holding the sheets
        data_dir: PathBuf,
    },

    /// Per-recorder completion totals across all sheets
    Stats { dir: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Generate {
            n,
            min_length,
            max_length,
            dir,
            recorders,
            force,
        } => cmd::generate::run(n, min_length, max_length, &dir, &recorders, force, cli.seed),
        Commands::Count { dir } => cmd::count::run(&dir, cli.json),
        Commands::Update {
            n,
            max_length,
            dir,
            recorders,
        } => cmd::update::run(n, max_length, &dir, &recorders, cli.seed, cli.json),
        Commands::Upgrade { input, output } => cmd::upgrade::run(&input, &output, cli.json),
        Commands::Sync { log_dir, data_dir } => cmd::sync::run(&log_dir, &data_dir, cli.json),
        Commands::Stats { dir } => cmd::stats::run(&dir, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
