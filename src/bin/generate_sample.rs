use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use avocado_analytics::data::sample::{self, DEFAULT_SEED, REGIONS};
use clap::Parser;

/// Write a synthetic avocado dataset as CSV and Parquet.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory
    #[arg(default_value = "datasets/avocadodataset")]
    out_dir: PathBuf,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let rows = sample::generate(args.seed)?;

    let csv_path = args.out_dir.join("avocado.csv");
    sample::write_csv(&csv_path, &rows)?;

    let parquet_path = args.out_dir.join("avocado.parquet");
    let batch = sample::write_parquet(&parquet_path, &rows)?;

    let preview = pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("formatting preview")?;
    log::debug!("First rows:\n{preview}");

    log::info!(
        "Wrote {} rows ({} regions × 2 types × {} weeks) to {} and {}",
        rows.len(),
        REGIONS.len(),
        sample::weeks().len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
