/// Greedy daily allocation of period totals
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::allocation::CumulativeTracker;
use crate::time::PeriodWindow;
use crate::types::{DailyValue, Observation};

/// Allocate one series' observations onto individual days
///
/// Observations are processed finest granularity first (ties broken by
/// earlier period end), and each day is claimed at most once: a coarser
/// period only distributes whatever value its window has not already
/// accounted for, spread evenly over the days still open.
pub fn allocate_series(observations: &[Observation]) -> BTreeMap<NaiveDate, f64> {
    let mut ordered: Vec<&Observation> = observations.iter().collect();
    ordered.sort_by_key(|obs| (obs.duration.rank(), obs.period_end));

    let mut allocated: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for obs in ordered {
        let window = match PeriodWindow::of(obs.duration, obs.period_end) {
            Some(window) => window,
            None => continue,
        };

        let uncovered: Vec<NaiveDate> = window.days().filter(|d| !allocated.contains_key(d)).collect();
        if uncovered.is_empty() {
            debug!(
                "{} {} {}: window fully covered by finer data, skipping",
                obs.ticker,
                obs.duration.as_str(),
                obs.period_end
            );
            continue;
        }

        let covered_sum: f64 = window.days().filter_map(|d| allocated.get(&d)).sum();
        let remaining = obs.value - covered_sum;
        if remaining <= 0.0 {
            // finer data already accounts for the whole reported total
            debug!(
                "{} {} {}: residual {:.4} <= 0, skipping",
                obs.ticker,
                obs.duration.as_str(),
                obs.period_end,
                remaining
            );
            continue;
        }

        let per_day = remaining / uncovered.len() as f64;
        for day in uncovered {
            allocated.insert(day, per_day);
        }
    }

    allocated
}

/// Build the full daily series across all (ticker, index) groups
///
/// Each series is allocated independently and annotated with its running
/// cumulative total in date order. Output rows come out sorted by ticker,
/// index name, then date.
pub fn build_daily_series(observations: &[Observation]) -> Vec<DailyValue> {
    let mut groups: BTreeMap<(String, String), Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        groups
            .entry((obs.ticker.clone(), obs.index_name.clone()))
            .or_default()
            .push(obs.clone());
    }

    let mut rows = Vec::new();
    for ((ticker, index_name), series) in groups {
        let allocated = allocate_series(&series);

        let mut tracker = CumulativeTracker::new();
        for (date, value) in allocated {
            let cumulative_value = tracker.add(value);
            rows.push(DailyValue {
                ticker: ticker.clone(),
                index_name: index_name.clone(),
                date,
                value,
                cumulative_value,
            });
        }
    }

    rows
}
