pub mod cumulative;
pub mod daily;

pub use cumulative::CumulativeTracker;
pub use daily::{allocate_series, build_daily_series};
