//! Monthly climate normals
//!
//! Long-term reference statistics that drive the stochastic weather generator.
//!
//! # Reference
//!
//! ForClim v3 Weather submodel: monthly temperature is normally distributed and
//! monthly precipitation log-normally distributed, with a cross-correlation
//! between the two.

use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::{FloatValue, Month};
use gapclim_core::utils::linear_algebra::symmetric_matrix;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

/// Relative slack allowed when checking that the covariance is positive semi-definite.
const COVARIANCE_TOLERANCE: FloatValue = 1e-9;

/// Long-term statistics of one calendar month at one site.
///
/// Precipitation statistics are in log space: the weather generator returns
/// `exp(x) - 1` for a log-space variate `x`, so `mean_log_precipitation` is the
/// mean of `ln(P + 1)` with `P` the monthly sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyClimateNormal {
    /// Mean monthly temperature
    /// unit: °C
    pub mean_temperature: FloatValue,

    /// Mean of ln(P + 1) for the monthly precipitation sum P
    /// unit: ln(cm)
    pub mean_log_precipitation: FloatValue,

    /// Variance of monthly mean temperature
    /// unit: °C²
    pub var_temperature: FloatValue,

    /// Variance of ln(P + 1)
    /// unit: ln(cm)²
    pub var_precipitation: FloatValue,

    /// Covariance between temperature and ln(P + 1)
    /// unit: °C ln(cm)
    #[serde(default)]
    pub covariance: FloatValue,
}

impl MonthlyClimateNormal {
    /// Build a normal from standard deviations and a cross-correlation.
    pub fn from_std_devs(
        mean_temperature: FloatValue,
        mean_log_precipitation: FloatValue,
        std_temperature: FloatValue,
        std_precipitation: FloatValue,
        correlation: FloatValue,
    ) -> Self {
        Self {
            mean_temperature,
            mean_log_precipitation,
            var_temperature: std_temperature * std_temperature,
            var_precipitation: std_precipitation * std_precipitation,
            covariance: correlation * std_temperature * std_precipitation,
        }
    }

    pub fn std_temperature(&self) -> FloatValue {
        self.var_temperature.sqrt()
    }

    pub fn std_precipitation(&self) -> FloatValue {
        self.var_precipitation.sqrt()
    }

    /// Pearson correlation between temperature and log precipitation.
    ///
    /// Zero when either variance is zero.
    pub fn correlation(&self) -> FloatValue {
        let scale = self.std_temperature() * self.std_precipitation();
        if scale > 0.0 {
            self.covariance / scale
        } else {
            0.0
        }
    }

    /// The symmetric temperature/precipitation covariance matrix.
    pub fn covariance_matrix(&self) -> Matrix2<FloatValue> {
        symmetric_matrix(
            self.var_temperature,
            self.var_precipitation,
            self.covariance,
        )
    }

    /// Check the normal is usable by the weather generator.
    ///
    /// All statistics must be finite, variances non-negative and the
    /// covariance matrix positive semi-definite.
    pub fn validate(&self, site: &str, month: Month) -> GapClimResult<()> {
        let invalid = |reason: String| GapClimError::InvalidClimateNormal {
            site: site.to_string(),
            month: month.to_string(),
            reason,
        };

        let fields = [
            ("mean_temperature", self.mean_temperature),
            ("mean_log_precipitation", self.mean_log_precipitation),
            ("var_temperature", self.var_temperature),
            ("var_precipitation", self.var_precipitation),
            ("covariance", self.covariance),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }
        if self.var_temperature < 0.0 || self.var_precipitation < 0.0 {
            return Err(invalid(format!(
                "variances must be non-negative, got {} and {}",
                self.var_temperature, self.var_precipitation
            )));
        }

        let bound = self.var_temperature * self.var_precipitation;
        let excess = self.covariance * self.covariance - bound;
        if excess > COVARIANCE_TOLERANCE * bound.max(FloatValue::MIN_POSITIVE) {
            return Err(invalid(format!(
                "covariance {} exceeds sqrt(var_temperature * var_precipitation) = {}",
                self.covariance,
                bound.sqrt()
            )));
        }
        Ok(())
    }
}

impl Default for MonthlyClimateNormal {
    /// A temperate mid-latitude month: 8 °C ± 1.5 °C and about 7 cm of
    /// precipitation, weakly anti-correlated.
    fn default() -> Self {
        Self::from_std_devs(8.0, 2.1, 1.5, 0.35, -0.2)
    }
}
