//! Soil-Water Bucket Component
//!
//! Monthly water balance of a single soil bucket (ForClim v3 Water submodel,
//! after Bugmann and Cramer 1998).
//!
//! # What This Component Does
//!
//! 1. Computes the annual heat index and PET exponent from the 12 monthly temperatures
//! 2. Derives Thornthwaite potential evapotranspiration for each month
//! 3. Splits precipitation into canopy interception and infiltration
//! 4. Limits evapotranspiration by the supply from the soil bucket
//! 5. Updates soil moisture and the monthly drought index
//! 6. Aggregates actual evapotranspiration and the drought index over the active season
//!
//! # States (tracked between months and years)
//!
//! - Soil moisture (cm), see [`SoilBucketState`]
//!
//! # Outputs
//!
//! - Monthly PET, demand, evapotranspiration, drought index and soil moisture
//! - Annual actual evapotranspiration (cm/yr) and annual drought index (1)
//!
//! # Differences from ForClim
//!
//! - **Explicit season convention**: the end of the active season is either
//!   exclusive (as the ForClim water equations) or inclusive, chosen per site.
//! - **No snow**: precipitation infiltrates in the month it falls.

use super::processes::{
    annual_actual_evapotranspiration, annual_drought_index, drought_index, heat_index,
    intercepted_precipitation, pet_exponent, potential_evapotranspiration, update_soil_moisture,
    water_supply,
};
use super::state::SoilBucketState;
use crate::parameters::SiteWaterParameters;
use crate::weather::MonthlyWeather;
use gapclim_core::errors::GapClimResult;
use gapclim_core::series::{FloatValue, Month, MonthRange, MonthlySeries};
use gapclim_core::utils::float::nan_min;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Year-level terms of the PET formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatIndexTerms {
    /// Annual heat index (HI)
    pub heat_index: FloatValue,
    /// PET exponent (kC)
    pub exponent: FloatValue,
}

/// Fluxes of one month of the bucket recurrence, all in cm/month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWaterStep {
    pub potential_evapotranspiration: FloatValue,
    pub intercepted: FloatValue,
    pub infiltrated: FloatValue,
    pub demand: FloatValue,
    pub supply: FloatValue,
    pub evapotranspiration: FloatValue,
    /// unit: dimensionless, in [0, 1]
    pub drought_index: FloatValue,
    /// Soil moisture at the end of the month
    /// unit: cm
    pub soil_moisture: FloatValue,
}

/// Water balance of one simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualWaterSummary {
    pub heat_index: HeatIndexTerms,
    /// unit: cm/month
    pub potential_evapotranspiration: MonthlySeries<FloatValue>,
    /// unit: cm/month
    pub evapotranspiration: MonthlySeries<FloatValue>,
    /// unit: cm/month
    pub demand: MonthlySeries<FloatValue>,
    pub drought_index: MonthlySeries<FloatValue>,
    /// End-of-month soil moisture
    /// unit: cm
    pub soil_moisture: MonthlySeries<FloatValue>,
    /// Actual evapotranspiration over the active season
    /// unit: cm/yr
    pub annual_evapotranspiration: FloatValue,
    pub annual_drought_index: FloatValue,
    /// unit: cm
    pub final_soil_moisture: FloatValue,
}

/// Soil-water bucket model of one site.
///
/// For each month $m$ with temperature $T_m$ and precipitation $P_m$:
///
/// $$I_m = \min(k_{Icpt} P_m, PET_m)$$
///
/// $$D_m = PET_m - I_m, \quad S_m = \min(k_{BS}, k_{Cw}) \frac{SM}{k_{BS}}$$
///
/// $$ET_m = \min(S_m, D_m)$$
///
/// $$SM' = \mathrm{clamp}(SM + P_m - I_m - ET_m, 0, k_{BS})$$
///
/// $$DrI_m = 1 - ET_m / D_m$$
#[derive(Debug, Clone)]
pub struct WaterBalance {
    parameters: SiteWaterParameters,
    active_season: MonthRange,
}

impl WaterBalance {
    /// Create a water balance, rejecting invalid parameters for `site`.
    pub fn from_parameters(site: &str, parameters: SiteWaterParameters) -> GapClimResult<Self> {
        parameters.validate(site)?;
        let active_season = MonthRange::for_site(
            site,
            parameters.active_season_start,
            parameters.active_season_end,
            parameters.active_season_convention,
        )?;
        Ok(Self {
            parameters,
            active_season,
        })
    }

    pub fn parameters(&self) -> &SiteWaterParameters {
        &self.parameters
    }

    pub fn active_season(&self) -> MonthRange {
        self.active_season
    }

    /// Initial bucket state for this site.
    pub fn initial_state(&self) -> SoilBucketState {
        SoilBucketState::initialize(&self.parameters)
    }

    /// Heat index and PET exponent of a year's temperatures.
    pub fn heat_index_terms(&self, temperature: &MonthlySeries<FloatValue>) -> HeatIndexTerms {
        let p = &self.parameters;
        let hi = heat_index(p.heat_index_multiplier, temperature, p.heat_index_exponent);
        HeatIndexTerms {
            heat_index: hi,
            exponent: pet_exponent(hi, &p.exponent_coefficients),
        }
    }

    /// Advance the bucket by one month.
    ///
    /// # Arguments
    ///
    /// * `state` - Soil moisture at the start of the month, updated in place
    /// * `temperature` - Monthly mean temperature (°C)
    /// * `precipitation` - Monthly precipitation sum (cm)
    /// * `terms` - Heat index terms of the year the month belongs to
    pub fn solve_month(
        &self,
        state: &mut SoilBucketState,
        temperature: FloatValue,
        precipitation: FloatValue,
        terms: HeatIndexTerms,
    ) -> MonthlyWaterStep {
        let p = &self.parameters;
        let scale = p.pet_multiplier * p.pet_solar_modifier * p.latitude_correction;

        let pet =
            potential_evapotranspiration(temperature, terms.heat_index, terms.exponent, scale);
        let intercepted = intercepted_precipitation(precipitation, p.interception_fraction, pet);
        let infiltrated = precipitation - intercepted;
        let demand = pet - intercepted;
        let supply = water_supply(
            state.soil_moisture,
            p.bucket_size,
            p.max_saturated_evapotranspiration,
        );
        let evapotranspiration = nan_min(supply, demand);

        state.soil_moisture = update_soil_moisture(
            state.soil_moisture,
            infiltrated,
            evapotranspiration,
            p.bucket_size,
        );

        MonthlyWaterStep {
            potential_evapotranspiration: pet,
            intercepted,
            infiltrated,
            demand,
            supply,
            evapotranspiration,
            drought_index: drought_index(evapotranspiration, demand),
            soil_moisture: state.soil_moisture,
        }
    }

    /// Run the 12-month recurrence for one year of weather.
    pub fn solve_year(
        &self,
        state: &mut SoilBucketState,
        weather: &MonthlyWeather,
    ) -> AnnualWaterSummary {
        let terms = self.heat_index_terms(&weather.temperature);

        let mut pet = MonthlySeries::filled(0.0);
        let mut evapotranspiration = MonthlySeries::filled(0.0);
        let mut demand = MonthlySeries::filled(0.0);
        let mut drought = MonthlySeries::filled(0.0);
        let mut soil_moisture = MonthlySeries::filled(0.0);

        for month in Month::ALL {
            let step = self.solve_month(
                state,
                weather.temperature[month],
                weather.precipitation[month],
                terms,
            );
            trace!(
                month = %month,
                pet = step.potential_evapotranspiration,
                et = step.evapotranspiration,
                drought_index = step.drought_index,
                soil_moisture = step.soil_moisture,
                "Water balance step"
            );

            pet[month] = step.potential_evapotranspiration;
            evapotranspiration[month] = step.evapotranspiration;
            demand[month] = step.demand;
            drought[month] = step.drought_index;
            soil_moisture[month] = step.soil_moisture;
        }

        AnnualWaterSummary {
            heat_index: terms,
            potential_evapotranspiration: pet,
            evapotranspiration,
            demand,
            drought_index: drought,
            soil_moisture,
            annual_evapotranspiration: annual_actual_evapotranspiration(
                &evapotranspiration,
                self.active_season,
            ),
            annual_drought_index: annual_drought_index(
                &weather.temperature,
                &drought,
                self.parameters.development_threshold,
                self.active_season,
            ),
            final_soil_moisture: state.soil_moisture,
        }
    }
}
