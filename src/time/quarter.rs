/// Calendar quarter boundary arithmetic
use chrono::{Datelike, Duration, Months, NaiveDate};

/// Exclusive end marker of the calendar quarter containing `period_end`
///
/// The quarter is determined by the last covered day (marker minus one),
/// and the returned marker is the first day of the month after that
/// quarter, so a marker that already sits on a quarter boundary maps to
/// itself.
pub fn quarter_period_end(period_end: NaiveDate) -> NaiveDate {
    let last_day = period_end - Duration::days(1);
    let quarter_end_month = ((last_day.month() - 1) / 3 + 1) * 3;

    if quarter_end_month < 12 {
        NaiveDate::from_ymd_opt(last_day.year(), quarter_end_month + 1, 1)
            .expect("first of month is always valid")
    } else {
        NaiveDate::from_ymd_opt(last_day.year() + 1, 1, 1).expect("first of January is always valid")
    }
}

/// Quarter-end markers from the quarter containing `min_period_end`
/// through the one containing `max_period_end`, stepping 3 months
pub fn enumerate_quarter_ends(min_period_end: NaiveDate, max_period_end: NaiveDate) -> Vec<NaiveDate> {
    let last = quarter_period_end(max_period_end);
    let mut current = quarter_period_end(min_period_end);

    let mut ends = Vec::new();
    while current <= last {
        ends.push(current);
        current = current + Months::new(3);
    }
    ends
}

/// Month-end markers of the three months making up the quarter ending at
/// `quarter_end`, in calendar order
pub fn quarter_month_ends(quarter_end: NaiveDate) -> [NaiveDate; 3] {
    [
        quarter_end - Months::new(2),
        quarter_end - Months::new(1),
        quarter_end,
    ]
}

/// Number of days covered by a month observation ending at the marker
pub fn month_day_count(month_period_end: NaiveDate) -> i64 {
    (month_period_end - Duration::days(1)).day() as i64
}
