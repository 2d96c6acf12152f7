//! Abiotic growth factors
//!
//! Reduction factors in `[0, 1]` that a gap model applies to the optimal
//! diameter increment of a cohort (ForClim v3 equations 4.8 to 4.11). The
//! degree-day and soil-moisture factors consume the annual drivers computed
//! by this crate; nitrogen and light are supplied by the host model.

use crate::development::DegreeDaySummary;
use crate::parameters::{GrowthResponseParameters, PlantFunctionalType};
use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::FloatValue;
use gapclim_core::utils::float::nan_max;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Exponent of the combined growth reduction factor.
pub const GROWTH_REDUCTION_EXPONENT: FloatValue = 0.3333333;

/// Degree-day growth factor, `max(0, 1 - exp((dd_min - dd_sum) * slope))`.
pub fn degree_day_growth_factor(
    degree_day_minimum: FloatValue,
    slope: FloatValue,
    degree_day_sum: FloatValue,
) -> FloatValue {
    nan_max(1.0 - ((degree_day_minimum - degree_day_sum) * slope).exp(), 0.0)
}

/// Soil-moisture growth factor, `sqrt(max(0, 1 - drought_index / tolerance))`.
///
/// A non-positive tolerance means any drought stops growth.
pub fn soil_moisture_growth_factor(
    drought_index: FloatValue,
    drought_tolerance: FloatValue,
) -> FloatValue {
    if drought_tolerance <= 0.0 {
        return if drought_index > 0.0 { 0.0 } else { 1.0 };
    }
    nan_max(1.0 - drought_index / drought_tolerance, 0.0).sqrt()
}

/// Soil nitrogen growth factor, `max(0, 1 - exp(k1 * (n - k2)))`.
///
/// `available_nitrogen` is in kg/ha.
pub fn soil_nitrogen_growth_factor(
    k1: FloatValue,
    k2: FloatValue,
    available_nitrogen: FloatValue,
) -> FloatValue {
    nan_max(1.0 - (k1 * (available_nitrogen - k2)).exp(), 0.0)
}

/// Combined growth reduction factor, the cube root of the factor product.
pub fn growth_reduction_factor(
    degree_days: FloatValue,
    soil_moisture: FloatValue,
    soil_nitrogen: FloatValue,
    light: FloatValue,
) -> FloatValue {
    (degree_days * soil_moisture * soil_nitrogen * light).powf(GROWTH_REDUCTION_EXPONENT)
}

/// Degree-day and soil-moisture factors of one species in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbioticGrowthFactors {
    pub degree_days: FloatValue,
    pub soil_moisture: FloatValue,
}

impl AbioticGrowthFactors {
    /// Combine with the host model's nitrogen and light factors.
    pub fn combine(&self, soil_nitrogen: FloatValue, light: FloatValue) -> FloatValue {
        growth_reduction_factor(self.degree_days, self.soil_moisture, soil_nitrogen, light)
    }
}

impl GrowthResponseParameters {
    /// Defaults for `plant_type`.
    pub fn for_plant_type(plant_type: PlantFunctionalType) -> Self {
        plant_type.default_response()
    }

    /// The degree-day sum this plant type responds to.
    ///
    /// Evergreen species use the annual sum, deciduous species the
    /// growing-season sum.
    pub fn degree_day_sum(&self, degree_days: &DegreeDaySummary) -> FloatValue {
        match self.plant_type {
            PlantFunctionalType::Evergreen => degree_days.annual,
            PlantFunctionalType::Deciduous => degree_days.season,
        }
    }

    pub fn growth_factors(
        &self,
        degree_days: &DegreeDaySummary,
        drought_index: FloatValue,
    ) -> AbioticGrowthFactors {
        AbioticGrowthFactors {
            degree_days: degree_day_growth_factor(
                self.degree_day_minimum,
                self.degree_day_slope,
                self.degree_day_sum(degree_days),
            ),
            soil_moisture: soil_moisture_growth_factor(drought_index, self.drought_tolerance),
        }
    }

    pub fn validate(&self, species: &str) -> GapClimResult<()> {
        let fields = [
            ("degree_day_minimum", self.degree_day_minimum),
            ("degree_day_slope", self.degree_day_slope),
            ("drought_tolerance", self.drought_tolerance),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(GapClimError::InvalidParameter {
                    site: species.to_string(),
                    name: name.to_string(),
                    value,
                    reason: "must be finite".to_string(),
                });
            }
        }
        if self.drought_tolerance <= 0.0 {
            warn!(
                species = %species,
                drought_tolerance = self.drought_tolerance,
                "Non-positive drought tolerance; any drought stops growth"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapclim_core::series::MonthlySeries;
    use is_close::is_close;

    fn summary(annual: FloatValue, season: FloatValue) -> DegreeDaySummary {
        DegreeDaySummary {
            monthly: MonthlySeries::filled(0.0),
            annual,
            season,
        }
    }

    #[test]
    fn test_degree_day_factor() {
        assert_eq!(degree_day_growth_factor(700.0, 0.0013, 500.0), 0.0);
        assert_eq!(degree_day_growth_factor(700.0, 0.0013, 700.0), 0.0);
        assert!(is_close!(
            degree_day_growth_factor(700.0, 0.0013, 1700.0),
            1.0 - (-1.3f64).exp()
        ));
    }

    #[test]
    fn test_soil_moisture_factor() {
        assert_eq!(soil_moisture_growth_factor(0.0, 0.3), 1.0);
        assert!(is_close!(soil_moisture_growth_factor(0.15, 0.3), 0.5f64.sqrt()));
        assert_eq!(soil_moisture_growth_factor(0.4, 0.3), 0.0);
    }

    #[test]
    fn test_soil_moisture_factor_without_tolerance() {
        assert_eq!(soil_moisture_growth_factor(0.0, 0.0), 1.0);
        assert_eq!(soil_moisture_growth_factor(0.01, 0.0), 0.0);
        assert_eq!(soil_moisture_growth_factor(0.01, -0.1), 0.0);
    }

    #[test]
    fn test_factors_keep_nan() {
        assert!(degree_day_growth_factor(800.0, 0.0013, FloatValue::NAN).is_nan());
        assert!(soil_moisture_growth_factor(FloatValue::NAN, 0.3).is_nan());
        assert!(soil_nitrogen_growth_factor(-0.05, 10.0, FloatValue::NAN).is_nan());
    }

    #[test]
    fn test_nitrogen_factor() {
        assert_eq!(soil_nitrogen_growth_factor(-0.05, 10.0, 10.0), 0.0);
        assert!(is_close!(
            soil_nitrogen_growth_factor(-0.05, 10.0, 30.0),
            1.0 - (-1.0f64).exp()
        ));
    }

    #[test]
    fn test_growth_reduction_factor() {
        assert!(is_close!(growth_reduction_factor(1.0, 1.0, 1.0, 1.0), 1.0));
        assert_eq!(growth_reduction_factor(0.0, 1.0, 1.0, 1.0), 0.0);
        assert!(is_close!(
            growth_reduction_factor(0.5, 0.5, 1.0, 1.0),
            0.25f64.powf(0.3333333)
        ));
    }

    #[test]
    fn test_plant_type_selects_degree_day_sum() {
        let degree_days = summary(2000.0, 1500.0);
        let evergreen = GrowthResponseParameters::for_plant_type(PlantFunctionalType::Evergreen);
        let deciduous = GrowthResponseParameters::for_plant_type(PlantFunctionalType::Deciduous);

        assert_eq!(evergreen.degree_day_sum(&degree_days), 2000.0);
        assert_eq!(deciduous.degree_day_sum(&degree_days), 1500.0);
    }

    #[test]
    fn test_growth_factors_and_combination() {
        let response = GrowthResponseParameters::for_plant_type(PlantFunctionalType::Deciduous);
        let factors = response.growth_factors(&summary(2500.0, 1800.0), 0.05);

        assert!(is_close!(
            factors.degree_days,
            1.0 - ((1000.0 - 1800.0) * 0.0013f64).exp()
        ));
        assert!(is_close!(factors.soil_moisture, 0.75f64.sqrt()));
        let grf = factors.combine(1.0, 1.0);
        assert!(grf > 0.0 && grf <= 1.0);
        assert_eq!(factors.combine(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_validate() {
        let mut response = PlantFunctionalType::Evergreen.default_response();
        assert!(response.validate("Picea abies").is_ok());

        response.drought_tolerance = 0.0;
        assert!(response.validate("Picea abies").is_ok());

        response.degree_day_slope = FloatValue::NAN;
        assert!(response.validate("Picea abies").is_err());
    }
}
