//! Soil-water balance
//!
//! - `WaterBalance`: monthly single-bucket model with Thornthwaite PET
//! - `SoilBucketState`: soil moisture carried between months and years
//! - `processes`: the pure per-step equations

pub mod processes;
mod bucket;
mod state;

pub use bucket::{AnnualWaterSummary, HeatIndexTerms, MonthlyWaterStep, WaterBalance};
pub use state::SoilBucketState;
