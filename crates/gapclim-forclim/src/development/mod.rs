//! Plant development drivers
//!
//! - `DegreeDayCalculator`: annual and growing-season degree-day sums from
//!   monthly mean temperature
//! - `winter_minimum_temperature`: coldest of the December to February minima

mod degree_days;

pub use degree_days::{
    degree_day_correction, degree_days_annual, degree_days_month, degree_days_season,
    winter_minimum_temperature, DegreeDayCalculator, DegreeDaySummary, CORRECTION_LOWER_BREAK,
    CORRECTION_UPPER_BREAK,
};
