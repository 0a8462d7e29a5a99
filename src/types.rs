/// Core type definitions for the series pipeline
use chrono::NaiveDate;

/// Reporting granularity of a period observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Week,
    MidMonth,
    Month,
    Quarter,
    Year,
    Unknown,
}

impl Granularity {
    /// Classify a free-text duration label (case-insensitive substring match)
    ///
    /// Every label maps somewhere: unrecognized text lands in `Unknown`
    /// so malformed input degrades instead of aborting the run.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();

        // "mid-month" contains "month", so it must be tested first
        if label.contains("mid-month") || label.contains("mid month") || label.contains("midmonth") {
            Granularity::MidMonth
        } else if label.contains("week") {
            Granularity::Week
        } else if label.contains("quarter") {
            // also covers "custom quarter" variants
            Granularity::Quarter
        } else if label.contains("month") {
            Granularity::Month
        } else if label.contains("year") {
            Granularity::Year
        } else {
            Granularity::Unknown
        }
    }

    /// Allocation precedence: strictly increasing with coarseness
    ///
    /// Finer periods claim days first; `Unknown` always loses.
    pub fn rank(&self) -> u8 {
        match self {
            Granularity::Week => 0,
            Granularity::MidMonth => 1,
            Granularity::Month => 2,
            Granularity::Quarter => 3,
            Granularity::Year => 4,
            Granularity::Unknown => 5,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Granularity::Week => "Week",
            Granularity::MidMonth => "MidMonth",
            Granularity::Month => "Month",
            Granularity::Quarter => "Quarter",
            Granularity::Year => "Year",
            Granularity::Unknown => "Unknown",
        }
    }
}

/// One period-aggregated input row
///
/// `period_end` is an exclusive marker: the day AFTER the last day the
/// value covers. `value` is the total for the whole window, never a rate.
/// The trailing optional fields carry the pass-through columns of
/// already-published quarterly records.
#[derive(Debug, Clone)]
pub struct Observation {
    pub ticker: String,
    pub index_name: String,
    pub duration: Granularity,
    pub period_end: NaiveDate,
    pub value: f64,
    pub cumulative_value: Option<f64>,
    pub comment: Option<String>,
    pub released_date: Option<String>,
}

/// One day of the disaggregated output series
#[derive(Debug, Clone)]
pub struct DailyValue {
    pub ticker: String,
    pub index_name: String,
    pub date: NaiveDate,
    pub value: f64,
    pub cumulative_value: f64,
}

/// One quarterly output row, either passed through or computed
#[derive(Debug, Clone)]
pub struct QuarterRecord {
    pub ticker: String,
    pub index_name: String,
    pub period_end: NaiveDate,
    pub value: f64,
    pub cumulative_value: Option<f64>,
    pub comment: Option<String>,
    pub released_date: Option<String>,
}
