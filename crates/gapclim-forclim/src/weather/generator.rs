//! Stochastic monthly weather generator
//!
//! Simulates monthly mean temperature and monthly precipitation sums from
//! long-term climate normals and pairs of independent standard-normal draws.
//!
//! # What This Component Does
//!
//! 1. Applies an optional seasonal climate anomaly to each month's normal
//! 2. Decomposes each month's temperature/precipitation covariance once, at
//!    construction, into denormalised eigenvectors `R`
//! 3. For every simulated month, maps two independent draws `z` onto
//!    correlated anomalies `R z`
//! 4. Adds the temperature anomaly to the mean temperature and back-transforms
//!    the log-precipitation anomaly, floored at zero
//!
//! # Differences from ForClim v3 Weather
//!
//! - **No random number management**: the generator draws from a caller-owned
//!   [`StandardNormalSource`] and is deterministic given its draws.
//! - **No transient climate change ramp**: anomalies are applied in full; a
//!   caller that wants a ramp rebuilds the generator with a scaled anomaly.

use crate::parameters::{ClimateAnomaly, MonthlyClimateNormal};
use gapclim_core::sampler::StandardNormalSource;
use gapclim_core::series::{FloatValue, Month, MonthlySeries};
use gapclim_core::utils::float::nan_max;
use gapclim_core::utils::linear_algebra::SymmetricEigen2;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Simulated monthly mean temperature.
///
/// $$T = T_{ref} + z_0 r_0 + z_1 r_1$$
///
/// # Arguments
///
/// * `reference_temperature` - Long-term monthly mean temperature (°C)
/// * `draws` - Two independent standard-normal variates
/// * `temperature_components` - Temperature row of the denormalised eigenvector matrix
pub fn simulate_temperature(
    reference_temperature: FloatValue,
    draws: [FloatValue; 2],
    temperature_components: [FloatValue; 2],
) -> FloatValue {
    reference_temperature
        + draws[0] * temperature_components[0]
        + draws[1] * temperature_components[1]
}

/// Simulated monthly precipitation sum, log-normal and floored at zero.
///
/// $$P = \max(0, \exp(\mu + z_0 p_0 + z_1 p_1) - 1)$$
///
/// # Arguments
///
/// * `reference_log_precipitation` - Long-term mean of ln(P + 1)
/// * `draws` - The same two variates used for temperature
/// * `precipitation_components` - Precipitation row of the denormalised eigenvector matrix
pub fn simulate_precipitation(
    reference_log_precipitation: FloatValue,
    draws: [FloatValue; 2],
    precipitation_components: [FloatValue; 2],
) -> FloatValue {
    let log_precipitation = reference_log_precipitation
        + draws[0] * precipitation_components[0]
        + draws[1] * precipitation_components[1];
    nan_max(log_precipitation.exp() - 1.0, 0.0)
}

/// One year of simulated weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWeather {
    /// unit: °C
    pub temperature: MonthlySeries<FloatValue>,
    /// unit: cm
    pub precipitation: MonthlySeries<FloatValue>,
}

/// Monthly weather generator for one site.
#[derive(Debug, Clone)]
pub struct WeatherGenerator {
    normals: MonthlySeries<MonthlyClimateNormal>,
    anomaly: Option<ClimateAnomaly>,
    effective_normals: MonthlySeries<MonthlyClimateNormal>,
    denormalized: MonthlySeries<Matrix2<FloatValue>>,
}

impl WeatherGenerator {
    /// Create a generator for the reference climate.
    pub fn new(normals: MonthlySeries<MonthlyClimateNormal>) -> Self {
        Self::from_normals(normals, None)
    }

    /// Create a generator, optionally perturbing the normals with a climate anomaly.
    ///
    /// Normals are used as given; validate them first (see
    /// [`MonthlyClimateNormal::validate`]) if they come from configuration.
    pub fn from_normals(
        normals: MonthlySeries<MonthlyClimateNormal>,
        anomaly: Option<ClimateAnomaly>,
    ) -> Self {
        let effective_normals = match &anomaly {
            Some(anomaly) if !anomaly.is_zero() => {
                MonthlySeries::from_fn(|m| anomaly.apply(m, &normals[m]))
            }
            _ => normals,
        };
        let denormalized = effective_normals.map(|normal| {
            SymmetricEigen2::from_matrix(&normal.covariance_matrix()).denormalized_eigenvectors()
        });

        debug!(
            anomaly = anomaly.is_some(),
            anomaly_is_zero = anomaly.as_ref().map_or(true, ClimateAnomaly::is_zero),
            mean_annual_temperature = effective_normals.map(|n| n.mean_temperature).sum() / 12.0,
            "Created weather generator"
        );

        Self {
            normals,
            anomaly,
            effective_normals,
            denormalized,
        }
    }

    /// The reference normals, before any anomaly.
    pub fn normals(&self) -> &MonthlySeries<MonthlyClimateNormal> {
        &self.normals
    }

    /// The normals actually used for simulation.
    pub fn effective_normals(&self) -> &MonthlySeries<MonthlyClimateNormal> {
        &self.effective_normals
    }

    pub fn anomaly(&self) -> Option<&ClimateAnomaly> {
        self.anomaly.as_ref()
    }

    /// Denormalised eigenvectors of `month`'s covariance; row 0 drives
    /// temperature, row 1 log precipitation.
    pub fn denormalized_eigenvectors(&self, month: Month) -> &Matrix2<FloatValue> {
        &self.denormalized[month]
    }

    /// Simulate one month from explicit draws.
    ///
    /// # Returns
    ///
    /// (temperature, precipitation)
    pub fn simulate_month_with_draws(
        &self,
        month: Month,
        draws: [FloatValue; 2],
    ) -> (FloatValue, FloatValue) {
        let normal = &self.effective_normals[month];
        let r = &self.denormalized[month];

        let temperature =
            simulate_temperature(normal.mean_temperature, draws, [r[(0, 0)], r[(0, 1)]]);
        let precipitation = simulate_precipitation(
            normal.mean_log_precipitation,
            draws,
            [r[(1, 0)], r[(1, 1)]],
        );
        (temperature, precipitation)
    }

    /// Simulate one month, consuming exactly two draws from `source`.
    pub fn simulate_month<S: StandardNormalSource + ?Sized>(
        &self,
        month: Month,
        source: &mut S,
    ) -> (FloatValue, FloatValue) {
        self.simulate_month_with_draws(month, source.next_pair())
    }

    /// Simulate a calendar year, consuming 24 draws in month order.
    pub fn simulate_year<S: StandardNormalSource + ?Sized>(&self, source: &mut S) -> MonthlyWeather {
        let mut temperature = MonthlySeries::filled(0.0);
        let mut precipitation = MonthlySeries::filled(0.0);

        for month in Month::ALL {
            let (t, p) = self.simulate_month(month, source);
            temperature[month] = t;
            precipitation[month] = p;
        }

        MonthlyWeather {
            temperature,
            precipitation,
        }
    }
}
