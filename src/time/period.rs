/// Calendar window arithmetic for period observations
use chrono::{Datelike, Duration, NaiveDate};

use crate::types::Granularity;

/// Inclusive [start, end] calendar window covered by a reported value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    /// Window covered by a value reported at `period_end`
    ///
    /// `period_end` is an exclusive marker: the last covered day is the
    /// day before it. Returns `None` when the window comes out inverted,
    /// which callers treat as "skip this observation".
    pub fn of(granularity: Granularity, period_end: NaiveDate) -> Option<Self> {
        let end = period_end - Duration::days(1);

        let start = match granularity {
            Granularity::Week => end - Duration::days(6),
            // Mid-month and month values both accrue from the first of the month
            Granularity::MidMonth | Granularity::Month => end.with_day(1)?,
            // Fixed 91-day window. Calendar quarters run 89-92 days; the
            // quarter module is calendar-exact, this one is not.
            Granularity::Quarter => end - Duration::days(90),
            Granularity::Year => NaiveDate::from_ymd_opt(end.year(), 1, 1)?,
            Granularity::Unknown => end,
        };

        if end < start {
            return None;
        }
        Some(PeriodWindow { start, end })
    }

    /// Number of days in the window
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Days of the window in calendar order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Number of days shared with another window
    pub fn overlap_days(&self, other: &PeriodWindow) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            (end - start).num_days() + 1
        } else {
            0
        }
    }
}
