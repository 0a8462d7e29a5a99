/// CSV emission of the daily and quarterly series
use std::path::Path;

use crate::error::Result;
use crate::types::{DailyValue, QuarterRecord};

const DAILY_HEADER: [&str; 6] = [
    "TICKER",
    "DURATION",
    "PERIODEND",
    "INDEXNAME",
    "VALUE",
    "CUMULATIVEVALUE",
];

const QUARTER_HEADER: [&str; 8] = [
    "TICKER",
    "DURATION",
    "PERIODEND",
    "INDEXNAME",
    "VALUE",
    "CUMULATIVEVALUE",
    "COMMENT",
    "RELEASEDDATE",
];

/// Write the daily series, dates in ISO form
///
/// The header row is always written, even for an empty result.
pub fn write_daily_series<P: AsRef<Path>>(path: P, rows: &[DailyValue]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(DAILY_HEADER)?;

    for row in rows {
        let period_end = row.date.format("%Y-%m-%d").to_string();
        let value = row.value.to_string();
        let cumulative_value = row.cumulative_value.to_string();
        writer.write_record([
            row.ticker.as_str(),
            "Daily",
            period_end.as_str(),
            row.index_name.as_str(),
            value.as_str(),
            cumulative_value.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the quarterly records, dates in dd/mm/yy form
///
/// Pass-through records may have empty cumulative/comment/release cells.
pub fn write_quarter_records<P: AsRef<Path>>(path: P, records: &[QuarterRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(QUARTER_HEADER)?;

    for record in records {
        let period_end = record.period_end.format("%d/%m/%y").to_string();
        let value = record.value.to_string();
        let cumulative_value = record
            .cumulative_value
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer.write_record([
            record.ticker.as_str(),
            "Quarter",
            period_end.as_str(),
            record.index_name.as_str(),
            value.as_str(),
            cumulative_value.as_str(),
            record.comment.as_deref().unwrap_or(""),
            record.released_date.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
