//! Climate change anomalies
//!
//! Optional seasonal perturbations of the climate normals, applied before the
//! weather generator decomposes each month's covariance. Anomalies are
//! explicit configuration of a generator; a generator built without one
//! reproduces the reference climate.

use super::MonthlyClimateNormal;
use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::{FloatValue, MeteorologicalSeason, Month};
use serde::{Deserialize, Serialize};

/// Change in the climate of one meteorological season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalAnomaly {
    /// Shift of the mean monthly temperature
    /// unit: °C
    /// default: 0.0
    pub temperature_shift: FloatValue,

    /// Change of the mean precipitation, applied to (P + 1)
    /// unit: %
    /// default: 0.0
    pub precipitation_change: FloatValue,

    /// Change of the temperature standard deviation
    /// unit: °C
    /// default: 0.0
    pub temperature_sd_change: FloatValue,

    /// Relative change of the log-precipitation standard deviation
    /// unit: %
    /// default: 0.0
    pub precipitation_sd_change: FloatValue,

    /// Replacement temperature/precipitation correlation, if different from the normal's
    /// unit: dimensionless
    /// default: None
    pub correlation: Option<FloatValue>,
}

impl SeasonalAnomaly {
    /// True if applying this anomaly changes nothing.
    pub fn is_zero(&self) -> bool {
        self.temperature_shift == 0.0
            && self.precipitation_change == 0.0
            && !self.changes_covariance()
    }

    fn changes_covariance(&self) -> bool {
        self.temperature_sd_change != 0.0
            || self.precipitation_sd_change != 0.0
            || self.correlation.is_some()
    }

    /// Perturb a climate normal.
    ///
    /// The mean temperature is shifted, `ln(P + 1)` is offset by
    /// `ln(1 + change / 100)`, and when any spread or correlation change is
    /// present the covariance is rebuilt from the adjusted standard
    /// deviations and correlation. Standard deviations are floored at zero.
    pub fn apply(&self, normal: &MonthlyClimateNormal) -> MonthlyClimateNormal {
        let mut adjusted = *normal;
        adjusted.mean_temperature += self.temperature_shift;
        adjusted.mean_log_precipitation += (self.precipitation_change / 100.0).ln_1p();

        if self.changes_covariance() {
            let std_temperature = (normal.std_temperature() + self.temperature_sd_change).max(0.0);
            let std_precipitation =
                (normal.std_precipitation() * (1.0 + self.precipitation_sd_change / 100.0))
                    .max(0.0);
            let correlation = self.correlation.unwrap_or_else(|| normal.correlation());

            adjusted.var_temperature = std_temperature * std_temperature;
            adjusted.var_precipitation = std_precipitation * std_precipitation;
            adjusted.covariance = correlation * std_temperature * std_precipitation;
        }
        adjusted
    }

    fn validate(&self, site: &str, season: MeteorologicalSeason) -> GapClimResult<()> {
        let invalid = |name: &str, value: FloatValue, reason: &str| {
            Err(GapClimError::InvalidParameter {
                site: site.to_string(),
                name: format!("anomaly.{:?}.{}", season, name).to_lowercase(),
                value,
                reason: reason.to_string(),
            })
        };

        if !(self.precipitation_change > -100.0) {
            return invalid(
                "precipitation_change",
                self.precipitation_change,
                "must be greater than -100%",
            );
        }
        if !(self.precipitation_sd_change >= -100.0) {
            return invalid(
                "precipitation_sd_change",
                self.precipitation_sd_change,
                "must be at least -100%",
            );
        }
        if !self.temperature_shift.is_finite() || !self.temperature_sd_change.is_finite() {
            return invalid(
                "temperature_shift",
                self.temperature_shift + self.temperature_sd_change,
                "temperature changes must be finite",
            );
        }
        if let Some(correlation) = self.correlation {
            if !(-1.0..=1.0).contains(&correlation) {
                return invalid("correlation", correlation, "must lie in [-1, 1]");
            }
        }
        Ok(())
    }
}

/// Seasonal climate anomalies for a whole year.
///
/// Seasons follow the meteorological convention: spring is March-May,
/// summer June-August, fall September-November and winter December-February.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateAnomaly {
    pub spring: SeasonalAnomaly,
    pub summer: SeasonalAnomaly,
    pub fall: SeasonalAnomaly,
    pub winter: SeasonalAnomaly,
}

impl ClimateAnomaly {
    /// The same anomaly in every season.
    pub fn uniform(anomaly: SeasonalAnomaly) -> Self {
        Self {
            spring: anomaly,
            summer: anomaly,
            fall: anomaly,
            winter: anomaly,
        }
    }

    pub fn for_season(&self, season: MeteorologicalSeason) -> &SeasonalAnomaly {
        match season {
            MeteorologicalSeason::Spring => &self.spring,
            MeteorologicalSeason::Summer => &self.summer,
            MeteorologicalSeason::Fall => &self.fall,
            MeteorologicalSeason::Winter => &self.winter,
        }
    }

    pub fn for_month(&self, month: Month) -> &SeasonalAnomaly {
        self.for_season(month.meteorological_season())
    }

    pub fn is_zero(&self) -> bool {
        [self.spring, self.summer, self.fall, self.winter]
            .iter()
            .all(SeasonalAnomaly::is_zero)
    }

    /// Apply the anomaly of `month`'s season to its normal.
    pub fn apply(&self, month: Month, normal: &MonthlyClimateNormal) -> MonthlyClimateNormal {
        self.for_month(month).apply(normal)
    }

    pub fn validate(&self, site: &str) -> GapClimResult<()> {
        self.spring.validate(site, MeteorologicalSeason::Spring)?;
        self.summer.validate(site, MeteorologicalSeason::Summer)?;
        self.fall.validate(site, MeteorologicalSeason::Fall)?;
        self.winter.validate(site, MeteorologicalSeason::Winter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn reference_normal() -> MonthlyClimateNormal {
        MonthlyClimateNormal::from_std_devs(10.0, 2.0, 2.0, 0.4, -0.3)
    }

    #[test]
    fn test_zero_anomaly_leaves_normal_unchanged() {
        let normal = reference_normal();
        let anomaly = ClimateAnomaly::default();

        assert!(anomaly.is_zero());
        for month in Month::ALL {
            assert_eq!(anomaly.apply(month, &normal), normal);
        }
    }

    #[test]
    fn test_temperature_shift_only_touches_the_mean() {
        let normal = reference_normal();
        let anomaly = SeasonalAnomaly {
            temperature_shift: 2.5,
            ..Default::default()
        };
        let adjusted = anomaly.apply(&normal);

        assert_eq!(adjusted.mean_temperature, 12.5);
        assert_eq!(adjusted.mean_log_precipitation, normal.mean_log_precipitation);
        assert_eq!(adjusted.var_temperature, normal.var_temperature);
        assert_eq!(adjusted.covariance, normal.covariance);
    }

    #[test]
    fn test_precipitation_change_scales_log_mean() {
        let normal = reference_normal();
        let anomaly = SeasonalAnomaly {
            precipitation_change: -20.0,
            ..Default::default()
        };
        let adjusted = anomaly.apply(&normal);

        // (P + 1) at the median is scaled by 0.8
        let ratio = adjusted.mean_log_precipitation.exp() / normal.mean_log_precipitation.exp();
        assert!(is_close!(ratio, 0.8));
    }

    #[test]
    fn test_spread_and_correlation_changes_rebuild_covariance() {
        let normal = reference_normal();
        let anomaly = SeasonalAnomaly {
            temperature_sd_change: 0.5,
            precipitation_sd_change: 50.0,
            correlation: Some(0.6),
            ..Default::default()
        };
        let adjusted = anomaly.apply(&normal);

        assert!(is_close!(adjusted.std_temperature(), 2.5));
        assert!(is_close!(adjusted.std_precipitation(), 0.6));
        assert!(is_close!(adjusted.correlation(), 0.6));
    }

    #[test]
    fn test_spread_cannot_go_negative() {
        let normal = reference_normal();
        let anomaly = SeasonalAnomaly {
            temperature_sd_change: -5.0,
            ..Default::default()
        };
        let adjusted = anomaly.apply(&normal);

        assert_eq!(adjusted.var_temperature, 0.0);
        assert_eq!(adjusted.covariance, 0.0);
    }

    #[test]
    fn test_seasons_map_to_months() {
        let anomaly = ClimateAnomaly {
            winter: SeasonalAnomaly {
                temperature_shift: 3.0,
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(anomaly.for_month(Month::December).temperature_shift, 3.0);
        assert_eq!(anomaly.for_month(Month::February).temperature_shift, 3.0);
        assert_eq!(anomaly.for_month(Month::March).temperature_shift, 0.0);
        assert!(!anomaly.is_zero());
    }

    #[test]
    fn test_validate_rejects_total_precipitation_loss() {
        let anomaly = ClimateAnomaly::uniform(SeasonalAnomaly {
            precipitation_change: -100.0,
            ..Default::default()
        });

        let err = anomaly.validate("site-a").unwrap_err();
        assert!(err.to_string().contains("anomaly.spring.precipitation_change"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_correlation() {
        let anomaly = ClimateAnomaly {
            fall: SeasonalAnomaly {
                correlation: Some(1.2),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(anomaly.validate("site-a").is_err());
        assert!(ClimateAnomaly::default().validate("site-a").is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let anomaly: ClimateAnomaly = toml::from_str(
            r#"
            [summer]
            temperature_shift = 1.8
            precipitation_change = -15.0
            "#,
        )
        .unwrap();

        assert_eq!(anomaly.summer.temperature_shift, 1.8);
        assert_eq!(anomaly.summer.precipitation_change, -15.0);
        assert!(anomaly.winter.is_zero());
    }
}
