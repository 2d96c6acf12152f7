//! ForClim driver parameters
//!
//! Parameter structures for the weather generator, the degree-day calculator
//! and the soil-water balance. Each struct provides defaults for a temperate
//! mid-latitude site.

mod climate_anomaly;
mod climate_normals;
mod degree_days;
mod growth_response;
mod water_balance;

pub use climate_anomaly::{ClimateAnomaly, SeasonalAnomaly};
pub use climate_normals::MonthlyClimateNormal;
pub use degree_days::DegreeDayParameters;
pub use growth_response::{GrowthResponseParameters, PlantFunctionalType};
pub use water_balance::SiteWaterParameters;
