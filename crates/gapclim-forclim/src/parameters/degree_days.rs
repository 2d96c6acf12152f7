//! Degree-day parameters
//!
//! Thermal-time settings for reducing simulated monthly temperatures to
//! annual and seasonal degree-day sums.

use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::{FloatValue, MonthRange, SeasonEnd};
use serde::{Deserialize, Serialize};

/// Parameters for the degree-day calculator.
///
/// The growing season used for the seasonal sum runs from `season_start` to
/// `season_end`; the ForClim degree-day equations include the end month,
/// which is the default convention here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeDayParameters {
    /// Temperature above which degree-days accumulate (kDTT)
    /// unit: °C
    /// default: 5.5
    pub threshold: FloatValue,

    /// Mean number of days per month (kDays)
    /// unit: d
    /// default: 30.0
    pub days_per_month: FloatValue,

    /// First month of the growing season (January = 0)
    /// default: 3 (April)
    pub season_start: usize,

    /// Last month of the growing season
    /// default: 8 (September, included)
    pub season_end: usize,

    /// Whether `season_end` is part of the season
    /// default: inclusive
    pub season_convention: SeasonEnd,
}

impl DegreeDayParameters {
    pub fn season(&self) -> Option<MonthRange> {
        MonthRange::from_bounds(self.season_start, self.season_end, self.season_convention)
    }

    pub fn validate(&self, site: &str) -> GapClimResult<()> {
        if !(self.days_per_month > 0.0 && self.days_per_month <= 31.0) {
            return Err(GapClimError::InvalidParameter {
                site: site.to_string(),
                name: "days_per_month".to_string(),
                value: self.days_per_month,
                reason: "must lie in (0, 31]".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(GapClimError::InvalidParameter {
                site: site.to_string(),
                name: "threshold".to_string(),
                value: self.threshold,
                reason: "must be finite".to_string(),
            });
        }
        MonthRange::for_site(
            site,
            self.season_start,
            self.season_end,
            self.season_convention,
        )?;
        Ok(())
    }
}

impl Default for DegreeDayParameters {
    fn default() -> Self {
        Self {
            threshold: 5.5,
            days_per_month: 30.0,
            season_start: 3,
            season_end: 8,
            season_convention: SeasonEnd::Inclusive,
        }
    }
}
