//! Soil-water bucket state.
//!
//! Carried from month to month and from year to year by one water-balance
//! run. Each replicate owns its own state.

use crate::parameters::SiteWaterParameters;
use gapclim_core::series::FloatValue;
use serde::{Deserialize, Serialize};

/// Water held in the soil bucket, in `[0, bucket_size]` once a month has run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilBucketState {
    /// unit: cm
    pub soil_moisture: FloatValue,
}

impl SoilBucketState {
    pub fn new(soil_moisture: FloatValue) -> Self {
        Self { soil_moisture }
    }

    /// Initial state from the configured fill fraction of the bucket.
    pub fn initialize(params: &SiteWaterParameters) -> Self {
        Self::new(params.initial_soil_moisture_fraction * params.bucket_size)
    }

    /// Soil moisture relative to `bucket_size`, 0 for a degenerate bucket.
    pub fn relative_moisture(&self, bucket_size: FloatValue) -> FloatValue {
        if bucket_size > 0.0 {
            self.soil_moisture / bucket_size
        } else {
            0.0
        }
    }
}
