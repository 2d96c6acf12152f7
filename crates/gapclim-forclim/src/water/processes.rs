//! Soil-water process functions.
//!
//! Pure functions for each step of the monthly bucket recurrence. All water
//! quantities are in cm/month and all degeneracies resolve to zero rather than
//! dividing by zero.
use gapclim_core::series::{FloatValue, MonthRange, MonthlySeries};
use gapclim_core::utils::float::{nan_max, nan_min};

/// Annual heat index of the Thornthwaite PET formula.
///
/// $$HI = \sum_m \max(0, k_1 T_m)^{k_2}$$
pub fn heat_index(
    multiplier: FloatValue,
    temperature: &MonthlySeries<FloatValue>,
    exponent: FloatValue,
) -> FloatValue {
    temperature
        .iter()
        .map(|&t| nan_max(multiplier * t, 0.0).powf(exponent))
        .sum()
}

/// Exponent of the PET formula as a cubic in the heat index.
///
/// `coefficients` are `[k3, k4, k5, k6]`, evaluated with Horner's scheme.
pub fn pet_exponent(heat_index: FloatValue, coefficients: &[FloatValue; 4]) -> FloatValue {
    let [k3, k4, k5, k6] = *coefficients;
    ((k3 * heat_index + k4) * heat_index + k5) * heat_index + k6
}

/// Monthly potential evapotranspiration [cm/month].
///
/// `scale` is the product of the PET multiplier, the solar modifier and the
/// latitude correction. Returns 0 when the heat index is zero, i.e. in a year
/// without a month above 0 °C.
pub fn potential_evapotranspiration(
    temperature: FloatValue,
    heat_index: FloatValue,
    exponent: FloatValue,
    scale: FloatValue,
) -> FloatValue {
    if heat_index == 0.0 {
        return 0.0;
    }
    scale * (10.0 * nan_max(temperature, 0.0) / heat_index).powf(exponent)
}

/// Canopy interception [cm/month], capped by the evaporative demand.
pub fn intercepted_precipitation(
    precipitation: FloatValue,
    interception_fraction: FloatValue,
    pet: FloatValue,
) -> FloatValue {
    nan_min(interception_fraction * precipitation, pet)
}

/// Water supply available for evapotranspiration [cm/month].
///
/// Scales linearly with the relative soil moisture; 0 for a non-positive bucket.
pub fn water_supply(
    soil_moisture: FloatValue,
    bucket_size: FloatValue,
    max_saturated_evapotranspiration: FloatValue,
) -> FloatValue {
    if bucket_size <= 0.0 {
        return 0.0;
    }
    bucket_size.min(max_saturated_evapotranspiration) * soil_moisture / bucket_size
}

/// Soil moisture after one month, clamped to `[0, bucket_size]` [cm].
pub fn update_soil_moisture(
    soil_moisture: FloatValue,
    infiltrated: FloatValue,
    evapotranspiration: FloatValue,
    bucket_size: FloatValue,
) -> FloatValue {
    nan_max(
        nan_min(soil_moisture + infiltrated - evapotranspiration, bucket_size),
        0.0,
    )
}

/// Monthly drought index, `1 - ET / demand`.
///
/// 0 when there is no demand.
pub fn drought_index(evapotranspiration: FloatValue, demand: FloatValue) -> FloatValue {
    if demand == 0.0 {
        0.0
    } else {
        1.0 - evapotranspiration / demand
    }
}

/// Actual evapotranspiration summed over the active season [cm/year].
pub fn annual_actual_evapotranspiration(
    evapotranspiration: &MonthlySeries<FloatValue>,
    season: MonthRange,
) -> FloatValue {
    evapotranspiration.sum_over(season)
}

/// Mean drought index of the active-season months warmer than `threshold`.
///
/// 0 if no such month exists.
pub fn annual_drought_index(
    temperature: &MonthlySeries<FloatValue>,
    drought: &MonthlySeries<FloatValue>,
    threshold: FloatValue,
    season: MonthRange,
) -> FloatValue {
    let (total, count) = season
        .indices()
        .filter(|&m| temperature[m] > threshold)
        .fold((0.0, 0usize), |(total, count), m| (total + drought[m], count + 1));

    if count == 0 {
        0.0
    } else {
        total / count as FloatValue
    }
}
