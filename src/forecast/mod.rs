pub mod estimator;

pub use estimator::{estimate_quarter, forecast_quarters, QuarterBasis, QuarterEstimate};
