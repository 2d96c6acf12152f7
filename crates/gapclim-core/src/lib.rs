//! Core types shared by the gapclim driver crates: calendar-ordered monthly
//! series, the closed-form covariance eigensolver, the standard-normal source
//! capability and the configuration error type.

pub mod errors;
pub mod sampler;
pub mod series;
pub mod utils;
