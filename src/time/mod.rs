pub mod period;
pub mod quarter;

pub use period::PeriodWindow;
pub use quarter::{enumerate_quarter_ends, month_day_count, quarter_month_ends, quarter_period_end};
