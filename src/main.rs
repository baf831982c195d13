use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod amend;
mod latest;
mod pipeline;

pub type Result<T> = anyhow::Result<T>;

/// Batch-edit a directory of OpenAPI YAML files for API-client import.
#[derive(Parser)]
#[command(name = "openapi-prep")]
#[command(about = "OpenAPI YAML batch editor", long_about = None)]
struct Cli {
    /// Directory containing the source .yaml files.
    input: PathBuf,

    /// Output root; amended files land under `amended/`, latest picks
    /// under `latest/`.
    #[arg(short = 'o', long)]
    out: PathBuf,

    /// Also copy the highest-versioned file per collection into `latest/`
    /// and prune stale entries there.
    #[arg(long)]
    latest: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let summary = pipeline::run(&cli.input, &cli.out, cli.latest)?;

    if cli.latest {
        println!(
            "Amended {} file(s), copied {} latest, evicted {} stale",
            summary.amended, summary.latest_copied, summary.evicted
        );
    } else {
        println!("Amended {} file(s)", summary.amended);
    }
    Ok(())
}
