/// Quarterly forecast entry point
///
/// Reads a CSV that may already contain published quarterly records,
/// fills missing and in-progress quarters per (ticker, index) series,
/// and writes the merged quarterly CSV. The reference as-of date is
/// captured exactly once at startup; pass --as-of to pin it for a
/// reproducible run.
use std::env;
use std::process;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use granulate::data::{read_observations, write_quarter_records};
use granulate::forecast::forecast_quarters;

struct RunArgs {
    input: String,
    output: String,
    as_of: Option<NaiveDate>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Some(args) => args,
        None => {
            eprintln!(
                "Usage: forecast_quarters --input <input-path> --output <output-path> [--as-of <YYYY-MM-DD>]"
            );
            process::exit(1);
        }
    };

    // fixed for the whole run; library code never reads the clock
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    info!("Forecasting quarters as of {}", as_of);

    let observations = read_observations(&args.input)
        .with_context(|| format!("failed to read observations from {}", args.input))?;
    info!("📄 Loaded {} observations from {}", observations.len(), args.input);

    let records = forecast_quarters(&observations, as_of);
    if records.is_empty() {
        warn!("no quarterly records produced, writing header-only output");
    }

    write_quarter_records(&args.output, &records)
        .with_context(|| format!("failed to write quarterly records to {}", args.output))?;
    info!("✅ Quarterly data saved to {} ({} rows)", args.output, records.len());

    Ok(())
}

/// Strict flag form: --input <path> --output <path> [--as-of <date>]
fn parse_args() -> Option<RunArgs> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 4 || args[0] != "--input" || args[2] != "--output" {
        return None;
    }

    let as_of = match args.len() {
        4 => None,
        6 if args[4] == "--as-of" => {
            Some(NaiveDate::parse_from_str(&args[5], "%Y-%m-%d").ok()?)
        }
        _ => return None,
    };

    Some(RunArgs {
        input: args[1].clone(),
        output: args[3].clone(),
        as_of,
    })
}
