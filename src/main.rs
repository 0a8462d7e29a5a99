/// Daily series builder entry point
///
/// Reads a period-observation CSV, disaggregates every (ticker, index)
/// series onto individual days with no double counting, and writes the
/// daily CSV with running cumulative values.
use std::env;
use std::process;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use granulate::allocation::build_daily_series;
use granulate::data::{read_observations, write_daily_series};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (input, output) = match parse_args() {
        Some(paths) => paths,
        None => {
            eprintln!("Usage: granulate --input <input-path> --output <output-path>");
            process::exit(1);
        }
    };

    let observations = read_observations(&input)
        .with_context(|| format!("failed to read observations from {}", input))?;
    info!("📄 Loaded {} observations from {}", observations.len(), input);

    let daily = build_daily_series(&observations);
    if daily.is_empty() {
        warn!("no daily values produced, writing header-only output");
    }

    write_daily_series(&output, &daily)
        .with_context(|| format!("failed to write daily series to {}", output))?;
    info!("✅ Daily data saved to {} ({} rows)", output, daily.len());

    Ok(())
}

/// Strict two-flag argument form: --input <path> --output <path>
fn parse_args() -> Option<(String, String)> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 4 || args[0] != "--input" || args[2] != "--output" {
        return None;
    }
    Some((args[1].clone(), args[3].clone()))
}
