//! Degree-day calculator
//!
//! Estimates thermal time above a development threshold from monthly mean
//! temperatures (ForClim v3 equations 2.2 and 2.3).
//!
//! Summing `(T - threshold) * days` over monthly means underestimates the
//! true degree-day sum, because daily temperatures above the threshold still
//! occur in months whose mean is close to it. A fitted three-piece correction
//! of the monthly mean compensates for that bias.

use crate::parameters::DegreeDayParameters;
use gapclim_core::errors::GapClimResult;
use gapclim_core::series::{FloatValue, MonthRange, MonthlySeries};
use serde::{Deserialize, Serialize};

/// Upper bound of the exponential-growth branch of the correction.
pub const CORRECTION_LOWER_BREAK: FloatValue = 5.5;
/// Upper bound of the exponential-decay branch of the correction.
pub const CORRECTION_UPPER_BREAK: FloatValue = 15.5;

/// Empirical correction for estimating degree-days from a monthly mean.
///
/// ```text
///            | 8.52 * 10^(0.165 t)      t <= 5.5
/// corr(t) =  | 187.2 * 10^(-0.0908 t)   5.5 < t <= 15.5
///            | -31.8 + 2.377 t          t > 15.5
/// ```
///
/// The branches are fitted separately and do not meet exactly at the break
/// points.
pub fn degree_day_correction(t: FloatValue) -> FloatValue {
    if t <= CORRECTION_LOWER_BREAK {
        8.52 * 10f64.powf(0.165 * t)
    } else if t <= CORRECTION_UPPER_BREAK {
        187.2 * 10f64.powf(-0.0908 * t)
    } else {
        -31.8 + 2.377 * t
    }
}

/// Degree-days of a single month.
///
/// Zero unless `t` is strictly above `threshold`.
pub fn degree_days_month(t: FloatValue, threshold: FloatValue, days: FloatValue) -> FloatValue {
    if t > threshold {
        (t - threshold).max(0.0) * days + degree_day_correction(t)
    } else {
        0.0
    }
}

/// Degree-days summed over the months of `season`.
pub fn degree_days_season(
    temperature: &MonthlySeries<FloatValue>,
    threshold: FloatValue,
    days: FloatValue,
    season: MonthRange,
) -> FloatValue {
    season
        .indices()
        .map(|m| temperature[m])
        .filter(|&t| t > threshold)
        .map(|t| degree_days_month(t, threshold, days))
        .sum()
}

/// Degree-days summed over the whole year.
pub fn degree_days_annual(
    temperature: &MonthlySeries<FloatValue>,
    threshold: FloatValue,
    days: FloatValue,
) -> FloatValue {
    degree_days_season(temperature, threshold, days, MonthRange::FULL_YEAR)
}

/// Minimum winter temperature from the December, January and February
/// minima (ForClim v3 equation 2.1).
pub fn winter_minimum_temperature(
    december: FloatValue,
    january: FloatValue,
    february: FloatValue,
) -> FloatValue {
    january.min(february).min(december)
}

/// Degree-day sums of one simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeDaySummary {
    /// unit: °C d
    pub monthly: MonthlySeries<FloatValue>,
    /// unit: °C d
    pub annual: FloatValue,
    /// Sum over the growing season
    /// unit: °C d
    pub season: FloatValue,
}

/// Degree-day calculator bound to a threshold, month length and growing season.
#[derive(Debug, Clone)]
pub struct DegreeDayCalculator {
    parameters: DegreeDayParameters,
    season: MonthRange,
}

impl DegreeDayCalculator {
    /// Create a calculator, validating the parameters against `site`.
    pub fn from_parameters(site: &str, parameters: DegreeDayParameters) -> GapClimResult<Self> {
        parameters.validate(site)?;
        let season = MonthRange::for_site(
            site,
            parameters.season_start,
            parameters.season_end,
            parameters.season_convention,
        )?;
        Ok(Self { parameters, season })
    }

    pub fn parameters(&self) -> &DegreeDayParameters {
        &self.parameters
    }

    pub fn season(&self) -> MonthRange {
        self.season
    }

    pub fn month(&self, t: FloatValue) -> FloatValue {
        degree_days_month(
            t,
            self.parameters.threshold,
            self.parameters.days_per_month,
        )
    }

    pub fn summarise(&self, temperature: &MonthlySeries<FloatValue>) -> DegreeDaySummary {
        let threshold = self.parameters.threshold;
        let days = self.parameters.days_per_month;

        DegreeDaySummary {
            monthly: temperature.map(|&t| self.month(t)),
            annual: degree_days_annual(temperature, threshold, days),
            season: degree_days_season(temperature, threshold, days, self.season),
        }
    }
}
