//! Soil-water bucket parameters
//!
//! Parameters for the ForClim monthly water balance: a single soil "bucket"
//! filled by infiltrating precipitation and emptied by evapotranspiration,
//! with potential evapotranspiration following Thornthwaite (1948).
//!
//! All water quantities are in centimetres per month, like the ForClim
//! bucket size.

use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::{FloatValue, MonthRange, SeasonEnd};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Parameters of the monthly soil-water balance at one site.
///
/// # Potential evapotranspiration
///
/// $$HI = \sum_{m} \max(0, k_1 T_m)^{k_2}$$
///
/// $$k_C = ((k_3 HI + k_4) HI + k_5) HI + k_6$$
///
/// $$PET_m = k_{PM} \cdot k_{PMod} \cdot k_{LatPtr} \cdot \left(\frac{10 \max(T_m, 0)}{HI}\right)^{k_C}$$
///
/// # Active season
///
/// Annual evapotranspiration and the annual drought index are aggregated over
/// the months `active_season_start` to `active_season_end`. Whether the end
/// month is included is set by `active_season_convention`; the ForClim water
/// equations exclude it, which is the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteWaterParameters {
    /// Maximum soil-water holding capacity (kBS)
    /// unit: cm
    /// default: 20.0
    pub bucket_size: FloatValue,

    /// Maximum evapotranspiration from saturated soil under high demand (kCw)
    /// unit: cm/month
    /// default: 12.0
    pub max_saturated_evapotranspiration: FloatValue,

    /// Fraction of precipitation intercepted by the canopy (kIcpt)
    /// unit: dimensionless
    /// default: 0.3
    pub interception_fraction: FloatValue,

    /// Heat index multiplier (k1)
    /// unit: °C⁻¹
    /// default: 0.2
    pub heat_index_multiplier: FloatValue,

    /// Heat index exponent (k2)
    /// unit: dimensionless
    /// default: 1.514
    pub heat_index_exponent: FloatValue,

    /// Cubic coefficients (k3, k4, k5, k6) of the PET exponent in the heat index
    /// unit: dimensionless
    /// default: [6.75e-7, -7.71e-5, 1.792e-2, 0.49239]
    pub exponent_coefficients: [FloatValue; 4],

    /// Potential evapotranspiration multiplier (kPM)
    /// unit: cm/month
    /// default: 1.6
    pub pet_multiplier: FloatValue,

    /// Fractional PET change with incident solar radiation (kPMod)
    /// unit: dimensionless
    /// default: 1.0
    pub pet_solar_modifier: FloatValue,

    /// Correction for sun angle and day length (kLatPtr)
    /// unit: dimensionless
    /// default: 1.0
    pub latitude_correction: FloatValue,

    /// Development threshold temperature (kDTT); colder months are ignored by
    /// the annual drought index
    /// unit: °C
    /// default: 5.5
    pub development_threshold: FloatValue,

    /// First month of the active season (January = 0)
    /// default: 3 (April)
    pub active_season_start: usize,

    /// Last month of the active season, see `active_season_convention`
    /// default: 9 (October, excluded)
    pub active_season_end: usize,

    /// Whether `active_season_end` is part of the season
    /// default: exclusive
    pub active_season_convention: SeasonEnd,

    /// Soil moisture at the start of the first simulated year, as a fraction of `bucket_size`
    /// unit: dimensionless
    /// default: 1.0
    pub initial_soil_moisture_fraction: FloatValue,
}

impl SiteWaterParameters {
    /// The active season as a month range.
    ///
    /// Returns `None` if the configured bounds are invalid.
    pub fn active_season(&self) -> Option<MonthRange> {
        MonthRange::from_bounds(
            self.active_season_start,
            self.active_season_end,
            self.active_season_convention,
        )
    }

    /// Reject configurations the bucket model cannot represent.
    pub fn validate(&self, site: &str) -> GapClimResult<()> {
        let invalid = |name: &str, value: FloatValue, reason: &str| {
            Err(GapClimError::InvalidParameter {
                site: site.to_string(),
                name: name.to_string(),
                value,
                reason: reason.to_string(),
            })
        };

        if !(self.bucket_size > 0.0 && self.bucket_size.is_finite()) {
            return invalid("bucket_size", self.bucket_size, "must be positive");
        }
        if !(self.max_saturated_evapotranspiration >= 0.0
            && self.max_saturated_evapotranspiration.is_finite())
        {
            return invalid(
                "max_saturated_evapotranspiration",
                self.max_saturated_evapotranspiration,
                "must be finite and non-negative",
            );
        }
        if !(0.0..=1.0).contains(&self.interception_fraction) {
            return invalid(
                "interception_fraction",
                self.interception_fraction,
                "must lie in [0, 1]",
            );
        }
        if !(0.0..=1.0).contains(&self.initial_soil_moisture_fraction) {
            return invalid(
                "initial_soil_moisture_fraction",
                self.initial_soil_moisture_fraction,
                "must lie in [0, 1]",
            );
        }
        let pet_factors = [
            ("pet_multiplier", self.pet_multiplier),
            ("pet_solar_modifier", self.pet_solar_modifier),
            ("latitude_correction", self.latitude_correction),
        ];
        for (name, value) in pet_factors {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(name, value, "must be finite and non-negative");
            }
        }
        let coefficients = [
            ("heat_index_multiplier", self.heat_index_multiplier),
            ("heat_index_exponent", self.heat_index_exponent),
            ("development_threshold", self.development_threshold),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return invalid(name, value, "must be finite");
            }
        }
        for (i, &value) in self.exponent_coefficients.iter().enumerate() {
            if !value.is_finite() {
                return invalid(
                    &format!("exponent_coefficients[{}]", i),
                    value,
                    "must be finite",
                );
            }
        }
        let season = MonthRange::for_site(
            site,
            self.active_season_start,
            self.active_season_end,
            self.active_season_convention,
        )?;

        if self.interception_fraction == 0.0 {
            warn!(site = %site, "Interception fraction is zero; all precipitation infiltrates");
        }
        if season.is_empty() {
            warn!(
                site = %site,
                start = self.active_season_start,
                end = self.active_season_end,
                "Active season is empty; annual evapotranspiration and drought index will be zero"
            );
        }
        Ok(())
    }
}

impl Default for SiteWaterParameters {
    fn default() -> Self {
        Self {
            bucket_size: 20.0,
            max_saturated_evapotranspiration: 12.0,
            interception_fraction: 0.3,
            heat_index_multiplier: 0.2,
            heat_index_exponent: 1.514,
            exponent_coefficients: [6.75e-7, -7.71e-5, 1.792e-2, 0.49239],
            pet_multiplier: 1.6,
            pet_solar_modifier: 1.0,
            latitude_correction: 1.0,
            development_threshold: 5.5,
            active_season_start: 3,
            active_season_end: 9,
            active_season_convention: SeasonEnd::Exclusive,
            initial_soil_moisture_fraction: 1.0,
        }
    }
}
