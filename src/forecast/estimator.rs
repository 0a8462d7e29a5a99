/// Quarter estimation from monthly and finer-grained observations
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::allocation::CumulativeTracker;
use crate::time::{enumerate_quarter_ends, month_day_count, quarter_month_ends, PeriodWindow};
use crate::types::{Granularity, Observation, QuarterRecord};

/// How a quarter value was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterBasis {
    /// All three months reported: the value is their exact sum
    Actual,
    /// Quarter still open: the value extrapolates a daily rate
    Estimated { with_granular: bool },
}

impl QuarterBasis {
    pub fn comment(&self) -> &'static str {
        match self {
            QuarterBasis::Actual => "Computed sum of months",
            QuarterBasis::Estimated { with_granular: true } => {
                "Estimated using daily rate extrapolation with partial granular data"
            }
            QuarterBasis::Estimated { with_granular: false } => {
                "Estimated using daily rate extrapolation"
            }
        }
    }

    /// Release marker mirroring the upstream feed: official records carry
    /// the midnight marker, estimates the 15:00 intraday cut
    pub fn released_marker(&self) -> &'static str {
        match self {
            QuarterBasis::Actual => "00:00.0",
            QuarterBasis::Estimated { .. } => "15:00.0",
        }
    }
}

/// Result of estimating a single quarter
#[derive(Debug, Clone, Copy)]
pub struct QuarterEstimate {
    pub value: f64,
    pub basis: QuarterBasis,
}

/// Estimate the quarter whose month-end markers are `month_ends`
///
/// Three cases:
/// - every month complete and reported: exact sum (`Actual`);
/// - quarter still open: completed months plus prorated granular data,
///   remainder extrapolated at a daily rate (`Estimated`); the rate
///   prefers recent granular data over the completed-month average;
/// - anything else (settled quarter with months missing, or nothing
///   elapsed / nothing left to extrapolate): `None`, the quarter is left
///   unfilled rather than guessed.
pub fn estimate_quarter(
    months: &[Observation],
    granular: &[Observation],
    month_ends: [NaiveDate; 3],
    as_of: NaiveDate,
) -> Option<QuarterEstimate> {
    let quarter_end = month_ends[2];
    let complete: Vec<NaiveDate> = month_ends.iter().copied().filter(|m| *m <= as_of).collect();

    if complete.len() == 3 {
        // settled quarter: only an exact sum of all three months counts
        let mut total = 0.0;
        for month_end in &month_ends {
            total += month_value(months, *month_end)?;
        }
        return Some(QuarterEstimate {
            value: total,
            basis: QuarterBasis::Actual,
        });
    }

    if quarter_end <= as_of {
        // quarter ended in the past with incomplete months
        return None;
    }

    // Completed months: values where reported, day counts regardless
    let mut sum_full = 0.0;
    let mut days_full: i64 = 0;
    for month_end in &complete {
        if let Some(value) = month_value(months, *month_end) {
            sum_full += value;
        }
        days_full += month_day_count(*month_end);
    }

    // The one month the as-of date falls inside
    let ongoing_end = month_ends.iter().copied().find(|m| *m > as_of)?;
    let ongoing = PeriodWindow::of(Granularity::Month, ongoing_end)?;

    // Prorate granular observations by their overlap with the ongoing month
    let mut sum_partial = 0.0;
    let mut days_partial: i64 = 0;
    for obs in granular {
        if obs.period_end > as_of {
            continue;
        }
        let window = match PeriodWindow::of(obs.duration, obs.period_end) {
            Some(window) => window,
            None => continue,
        };
        let overlap = window.overlap_days(&ongoing);
        if overlap > 0 {
            sum_partial += obs.value * overlap as f64 / window.day_count() as f64;
            days_partial += overlap;
        }
    }

    let total_quarter_days: i64 = month_ends.iter().map(|m| month_day_count(*m)).sum();
    let days_elapsed = days_full + days_partial;
    let days_left = total_quarter_days - days_elapsed;

    if days_elapsed == 0 || days_left <= 0 {
        debug!(
            "quarter {}: {} days elapsed, {} left, not estimable",
            quarter_end, days_elapsed, days_left
        );
        return None;
    }

    // Freshest rate available: recent granular data over the month average
    let daily_rate = if days_partial > 0 {
        sum_partial / days_partial as f64
    } else if days_full > 0 {
        sum_full / days_full as f64
    } else {
        0.0
    };

    Some(QuarterEstimate {
        value: sum_full + sum_partial + daily_rate * days_left as f64,
        basis: QuarterBasis::Estimated {
            with_granular: days_partial > 0,
        },
    })
}

/// Sum of the month observations reported for one month-end marker, or
/// `None` when the month has no data at all
fn month_value(months: &[Observation], period_end: NaiveDate) -> Option<f64> {
    let mut found = false;
    let mut total = 0.0;
    for obs in months.iter().filter(|o| o.period_end == period_end) {
        found = true;
        total += obs.value;
    }
    if found {
        Some(total)
    } else {
        None
    }
}

#[derive(Default)]
struct SeriesRows {
    months: Vec<Observation>,
    granular: Vec<Observation>,
    quarters: Vec<Observation>,
}

/// Fill in missing and in-progress quarters for every (ticker, index) series
///
/// Existing quarterly records pass through untouched and are never
/// recomputed; their persisted cumulative value reseeds the running
/// total. New records are estimated for every enumerated quarter the
/// data can support, and the combined output is sorted by ticker, index
/// name and period end.
pub fn forecast_quarters(observations: &[Observation], as_of: NaiveDate) -> Vec<QuarterRecord> {
    let mut series: BTreeMap<(String, String), SeriesRows> = BTreeMap::new();
    for obs in observations {
        let entry = series
            .entry((obs.ticker.clone(), obs.index_name.clone()))
            .or_default();
        match obs.duration {
            Granularity::Month => entry.months.push(obs.clone()),
            Granularity::Week | Granularity::MidMonth => entry.granular.push(obs.clone()),
            Granularity::Quarter => entry.quarters.push(obs.clone()),
            _ => {}
        }
    }

    let mut records: Vec<QuarterRecord> = Vec::new();

    for ((ticker, index_name), mut rows) in series {
        rows.months.sort_by_key(|o| o.period_end);
        rows.granular.sort_by_key(|o| o.period_end);

        // Published records pass through with their input fields untouched
        for existing in &rows.quarters {
            records.push(QuarterRecord {
                ticker: ticker.clone(),
                index_name: index_name.clone(),
                period_end: existing.period_end,
                value: existing.value,
                cumulative_value: existing.cumulative_value,
                comment: existing.comment.clone(),
                released_date: existing.released_date.clone(),
            });
        }

        if rows.months.is_empty() && rows.granular.is_empty() {
            continue;
        }

        let span = if rows.months.is_empty() {
            &rows.granular
        } else {
            &rows.months
        };
        let (min_end, max_end) = match (span.first(), span.last()) {
            (Some(first), Some(last)) => (first.period_end, last.period_end),
            _ => continue,
        };

        let mut tracker = CumulativeTracker::new();
        for quarter_end in enumerate_quarter_ends(min_end, max_end) {
            if let Some(existing) = rows.quarters.iter().find(|q| q.period_end == quarter_end) {
                // never recompute a published quarter; resume its total
                let seed = existing
                    .cumulative_value
                    .filter(|v| *v != 0.0)
                    .unwrap_or(existing.value);
                tracker = CumulativeTracker::seeded(seed);
                continue;
            }

            let estimate = match estimate_quarter(
                &rows.months,
                &rows.granular,
                quarter_month_ends(quarter_end),
                as_of,
            ) {
                Some(estimate) => estimate,
                None => continue,
            };

            let cumulative_value = tracker.add(estimate.value);
            records.push(QuarterRecord {
                ticker: ticker.clone(),
                index_name: index_name.clone(),
                period_end: quarter_end,
                value: estimate.value,
                cumulative_value: Some(cumulative_value),
                comment: Some(estimate.basis.comment().to_string()),
                released_date: Some(estimate.basis.released_marker().to_string()),
            });
        }
    }

    records.sort_by(|a, b| {
        (&a.ticker, &a.index_name, a.period_end).cmp(&(&b.ticker, &b.index_name, b.period_end))
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(duration: Granularity, period_end: NaiveDate, value: f64) -> Observation {
        Observation {
            ticker: "X".to_string(),
            index_name: "IDX".to_string(),
            duration,
            period_end,
            value,
            cumulative_value: None,
            comment: None,
            released_date: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn q1_2024() -> [NaiveDate; 3] {
        [date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]
    }

    #[test]
    fn test_three_complete_months_sum_exactly() {
        let months = vec![
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 3, 1), 110.0),
            obs(Granularity::Month, date(2024, 4, 1), 95.0),
        ];

        let estimate = estimate_quarter(&months, &[], q1_2024(), date(2024, 4, 10)).unwrap();
        assert!(close(estimate.value, 305.0));
        assert_eq!(estimate.basis, QuarterBasis::Actual);
        assert_eq!(estimate.basis.comment(), "Computed sum of months");
    }

    #[test]
    fn test_settled_quarter_with_missing_month_is_absent() {
        let months = vec![
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 4, 1), 95.0),
        ];

        assert!(estimate_quarter(&months, &[], q1_2024(), date(2024, 6, 1)).is_none());
    }

    #[test]
    fn test_open_quarter_extrapolates_month_average() {
        // Jan and Feb reported, as-of mid-March: rate 210/60, 31 days left
        let months = vec![
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 3, 1), 110.0),
        ];

        let estimate = estimate_quarter(&months, &[], q1_2024(), date(2024, 3, 15)).unwrap();
        assert!(close(estimate.value, 210.0 + 3.5 * 31.0));
        assert_eq!(
            estimate.basis,
            QuarterBasis::Estimated { with_granular: false }
        );
        assert_eq!(
            estimate.basis.comment(),
            "Estimated using daily rate extrapolation"
        );
    }

    #[test]
    fn test_open_quarter_prefers_granular_rate() {
        // no months complete yet; one week of January reported
        let granular = vec![obs(Granularity::Week, date(2024, 1, 15), 70.0)];

        let estimate = estimate_quarter(&[], &granular, q1_2024(), date(2024, 1, 20)).unwrap();
        // 7 elapsed days at rate 10, 84 quarter days left
        assert!(close(estimate.value, 70.0 + 10.0 * 84.0));
        assert_eq!(
            estimate.basis,
            QuarterBasis::Estimated { with_granular: true }
        );
        assert_eq!(
            estimate.basis.comment(),
            "Estimated using daily rate extrapolation with partial granular data"
        );
    }

    #[test]
    fn test_week_straddling_month_boundary_is_prorated() {
        // week ending marker Feb 4 covers Jan 28 .. Feb 3: 3 of 7 days in February
        let months = vec![obs(Granularity::Month, date(2024, 2, 1), 100.0)];
        let granular = vec![obs(Granularity::Week, date(2024, 2, 4), 14.0)];

        let estimate = estimate_quarter(&months, &granular, q1_2024(), date(2024, 2, 10)).unwrap();
        // sum_full 100 over 31 days, partial 14 * 3/7 = 6 over 3 days, rate 2
        let days_left = (31 + 29 + 31 - 31 - 3) as f64;
        assert!(close(estimate.value, 100.0 + 6.0 + 2.0 * days_left));
    }

    #[test]
    fn test_mid_month_observation_prorates_over_month_window() {
        // mid-month marker Jan 16 covers Jan 1 .. Jan 15, fully inside January
        let granular = vec![obs(Granularity::MidMonth, date(2024, 1, 16), 150.0)];

        let estimate = estimate_quarter(&[], &granular, q1_2024(), date(2024, 1, 20)).unwrap();
        // 15 elapsed days at rate 10, 76 quarter days left
        assert!(close(estimate.value, 150.0 + 10.0 * 76.0));
    }

    #[test]
    fn test_no_elapsed_days_is_absent() {
        assert!(estimate_quarter(&[], &[], q1_2024(), date(2024, 1, 10)).is_none());

        // granular data newer than the as-of date does not count
        let granular = vec![obs(Granularity::Week, date(2024, 2, 5), 70.0)];
        assert!(estimate_quarter(&[], &granular, q1_2024(), date(2024, 1, 10)).is_none());
    }

    #[test]
    fn test_forecast_quarters_end_to_end() {
        let observations = vec![
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 3, 1), 110.0),
        ];

        let records = forecast_quarters(&observations, date(2024, 3, 15));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period_end, date(2024, 4, 1));
        assert!(close(records[0].value, 318.5));
        assert!(close(records[0].cumulative_value.unwrap(), 318.5));
        assert_eq!(
            records[0].comment.as_deref(),
            Some("Estimated using daily rate extrapolation")
        );
        assert_eq!(records[0].released_date.as_deref(), Some("15:00.0"));
    }

    #[test]
    fn test_forecast_quarters_passes_existing_through_and_seeds_cumulative() {
        let mut published = obs(Granularity::Quarter, date(2024, 4, 1), 300.0);
        published.cumulative_value = Some(1300.0);
        published.comment = Some("Computed sum of months".to_string());
        published.released_date = Some("00:00.0".to_string());

        let observations = vec![
            published,
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 3, 1), 110.0),
            obs(Granularity::Month, date(2024, 4, 1), 95.0),
            obs(Granularity::Month, date(2024, 5, 1), 120.0),
        ];

        let records = forecast_quarters(&observations, date(2024, 5, 15));
        assert_eq!(records.len(), 2);

        // Q1 passes through untouched even though its months would sum to 305
        assert_eq!(records[0].period_end, date(2024, 4, 1));
        assert!(close(records[0].value, 300.0));
        assert!(close(records[0].cumulative_value.unwrap(), 1300.0));

        // Q2 estimate chains off the published cumulative value
        assert_eq!(records[1].period_end, date(2024, 7, 1));
        let april_only = 120.0;
        let rate = april_only / 30.0;
        let expected = april_only + rate * (30 + 31 + 30 - 30) as f64;
        assert!(close(records[1].value, expected));
        assert!(close(
            records[1].cumulative_value.unwrap(),
            1300.0 + expected
        ));
    }

    #[test]
    fn test_forecast_quarters_cumulative_falls_back_to_value() {
        // published record without a cumulative cell seeds from its value
        let published = obs(Granularity::Quarter, date(2024, 4, 1), 300.0);

        let observations = vec![
            published,
            obs(Granularity::Month, date(2024, 2, 1), 100.0),
            obs(Granularity::Month, date(2024, 4, 1), 95.0),
            obs(Granularity::Month, date(2024, 5, 1), 120.0),
        ];

        let records = forecast_quarters(&observations, date(2024, 5, 15));
        assert_eq!(records.len(), 2);
        let q2 = &records[1];
        assert!(close(
            q2.cumulative_value.unwrap(),
            300.0 + q2.value
        ));
    }

    #[test]
    fn test_forecast_quarters_skips_series_without_usable_data() {
        let observations = vec![obs(Granularity::Year, date(2024, 1, 1), 1000.0)];
        assert!(forecast_quarters(&observations, date(2024, 3, 1)).is_empty());
    }
}
