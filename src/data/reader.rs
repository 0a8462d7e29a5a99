/// CSV ingestion of period observations
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::types::{Granularity, Observation};

/// Raw CSV row; column order is free and unknown columns are ignored
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "TICKER")]
    ticker: String,
    #[serde(rename = "DURATION")]
    duration: String,
    #[serde(rename = "PERIODEND")]
    period_end: String,
    #[serde(rename = "INDEXNAME")]
    index_name: String,
    #[serde(rename = "VALUE")]
    value: f64,
    #[serde(rename = "CUMULATIVEVALUE", default)]
    cumulative_value: Option<f64>,
    #[serde(rename = "COMMENT", default)]
    comment: Option<String>,
    #[serde(rename = "RELEASEDDATE", default)]
    released_date: Option<String>,
}

/// Parse a period-end marker, accepting ISO and day-first forms
pub fn parse_period_end(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%y"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| TransformError::DateParseError(raw.to_string()))
}

/// Read every observation row from a CSV file
///
/// Duration labels are classified, never rejected; an unreadable file or
/// an unparseable date/value aborts the run.
pub fn read_observations<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut observations = Vec::new();
    for row in reader.deserialize() {
        let row: RawRow = row?;
        let duration = Granularity::classify(&row.duration);
        if duration == Granularity::Unknown {
            debug!("unrecognized duration label {:?}, routed to Unknown", row.duration);
        }

        observations.push(Observation {
            ticker: row.ticker,
            index_name: row.index_name,
            duration,
            period_end: parse_period_end(&row.period_end)?,
            value: row.value,
            cumulative_value: row.cumulative_value,
            comment: row.comment,
            released_date: row.released_date,
        });
    }

    Ok(observations)
}
