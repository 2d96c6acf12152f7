//! One-year driver
//!
//! Runs the weather generator, the degree-day calculator and the water
//! balance of one site for a single year, in that order.
//!
//! Each call is one step of a sequential recurrence on a caller-owned
//! [`SoilBucketState`]. Independent replicates each own a state and a
//! standard-normal source, and may share one [`AnnualDrivers`] across threads.

use crate::development::DegreeDaySummary;
use crate::site::Site;
use crate::water::{AnnualWaterSummary, SoilBucketState};
use crate::weather::MonthlyWeather;
use gapclim_core::sampler::StandardNormalSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Abiotic drivers of one simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualClimate {
    pub year: i32,
    pub weather: MonthlyWeather,
    pub degree_days: DegreeDaySummary,
    pub water: AnnualWaterSummary,
}

#[derive(Debug, Clone)]
pub struct AnnualDrivers {
    site: Site,
}

impl AnnualDrivers {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Soil-water state to start the first year from.
    pub fn initial_state(&self) -> SoilBucketState {
        self.site.initial_state()
    }

    /// Simulate `year`, drawing 24 standard normals from `source` and
    /// advancing `state` by twelve months.
    pub fn simulate_year<S: StandardNormalSource + ?Sized>(
        &self,
        year: i32,
        state: &mut SoilBucketState,
        source: &mut S,
    ) -> AnnualClimate {
        let weather = self.site.weather().simulate_year(source);
        let degree_days = self.site.degree_days().summarise(&weather.temperature);
        let water = self.site.water().solve_year(state, &weather);

        debug!(
            site = %self.site.id(),
            year,
            annual_degree_days = degree_days.annual,
            annual_evapotranspiration = water.annual_evapotranspiration,
            annual_drought_index = water.annual_drought_index,
            "Simulated year"
        );

        AnnualClimate {
            year,
            weather,
            degree_days,
            water,
        }
    }

    /// Simulate consecutive years starting at `first_year`.
    pub fn simulate_years<S: StandardNormalSource + ?Sized>(
        &self,
        first_year: i32,
        years: usize,
        state: &mut SoilBucketState,
        source: &mut S,
    ) -> Vec<AnnualClimate> {
        (first_year..)
            .take(years)
            .map(|year| self.simulate_year(year, state, source))
            .collect()
    }
}
