//! ForClim abiotic drivers
//!
//! This crate provides the climate-dependent drivers of the ForClim forest gap
//! model: stochastic monthly weather, degree-day sums and the monthly soil-water
//! balance, plus the growth factors derived from them.
//!
//! # Module Organisation
//!
//! - `weather`: Monthly temperature and precipitation from climate normals
//! - `development`: Degree-day sums and winter minimum temperature
//! - `water`: Soil-water bucket with Thornthwaite evapotranspiration
//! - `growth`: Abiotic growth reduction factors for downstream cohorts
//! - `site`: Validated site configuration
//! - `annual`: One simulated year of all drivers for one site
//!
//! # Parameters
//!
//! Each component has an associated parameters struct in the `parameters` module
//! with defaults for a temperate mid-latitude site.

pub mod annual;
pub mod development;
pub mod growth;
pub mod parameters;
pub mod site;
pub mod water;
pub mod weather;
