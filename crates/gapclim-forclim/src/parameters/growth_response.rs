//! Growth response parameters
//!
//! Species-level constants for turning annual abiotic drivers into growth
//! reduction factors. Only the constants that consume degree-day sums and the
//! drought index live here; species parameter tables belong to the host
//! gap model.

use gapclim_core::series::FloatValue;
use serde::{Deserialize, Serialize};

/// Plant functional types distinguished by the abiotic growth responses.
///
/// Evergreen species accumulate thermal time all year, deciduous species only
/// during the growing season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantFunctionalType {
    Evergreen,
    Deciduous,
}

impl PlantFunctionalType {
    /// Typical response constants for this plant functional type.
    pub fn default_response(self) -> GrowthResponseParameters {
        match self {
            PlantFunctionalType::Evergreen => GrowthResponseParameters {
                plant_type: self,
                degree_day_minimum: 700.0,
                degree_day_slope: 0.0013,
                drought_tolerance: 0.3,
            },
            PlantFunctionalType::Deciduous => GrowthResponseParameters {
                plant_type: self,
                degree_day_minimum: 1000.0,
                degree_day_slope: 0.0013,
                drought_tolerance: 0.2,
            },
        }
    }
}

/// Growth response constants of one species or cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthResponseParameters {
    /// Determines which degree-day sum the species responds to
    pub plant_type: PlantFunctionalType,

    /// Minimum degree-day sum for growth (kDDMin)
    /// unit: °C d
    pub degree_day_minimum: FloatValue,

    /// Steepness of the degree-day response
    /// unit: (°C d)⁻¹
    pub degree_day_slope: FloatValue,

    /// Drought index at which growth stops (kDrTol)
    /// unit: dimensionless
    pub drought_tolerance: FloatValue,
}
