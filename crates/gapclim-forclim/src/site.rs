//! Site configuration
//!
//! A site bundles the 12 monthly climate normals with the water-balance and
//! degree-day parameters, plus an optional climate anomaly. [`SiteConfig`] is
//! the serialised form; [`Site`] is only ever built through validation, so a
//! `Site` always holds components that can run.
//!
//! ```toml
//! id = "davos"
//!
//! [water]
//! bucket_size = 12.0
//!
//! [[normals]]
//! mean_temperature = -5.5
//! mean_log_precipitation = 1.9
//! var_temperature = 4.0
//! var_precipitation = 0.2
//! covariance = -0.1
//! # ... eleven more months
//! ```

use crate::development::DegreeDayCalculator;
use crate::parameters::{
    ClimateAnomaly, DegreeDayParameters, MonthlyClimateNormal, SiteWaterParameters,
};
use crate::water::{SoilBucketState, WaterBalance};
use crate::weather::WeatherGenerator;
use gapclim_core::errors::{GapClimError, GapClimResult};
use gapclim_core::series::{Month, MonthlySeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serialised description of a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: String,

    /// Climate normals for January to December
    pub normals: Vec<MonthlyClimateNormal>,

    #[serde(default)]
    pub water: SiteWaterParameters,

    #[serde(default)]
    pub degree_days: DegreeDayParameters,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<ClimateAnomaly>,
}

impl SiteConfig {
    /// A configuration with default parameters for the given normals.
    pub fn new(id: impl Into<String>, normals: MonthlySeries<MonthlyClimateNormal>) -> Self {
        Self {
            id: id.into(),
            normals: normals.iter().copied().collect(),
            water: SiteWaterParameters::default(),
            degree_days: DegreeDayParameters::default(),
            anomaly: None,
        }
    }

    pub fn to_toml_string(&self) -> GapClimResult<String> {
        toml::to_string(self).map_err(|e| GapClimError::Error(e.to_string()))
    }
}

/// A validated site, ready to drive simulations.
#[derive(Debug, Clone)]
pub struct Site {
    id: String,
    weather: WeatherGenerator,
    degree_days: DegreeDayCalculator,
    water: WaterBalance,
}

impl Site {
    /// Validate a configuration and build the site's components.
    pub fn from_config(config: SiteConfig) -> GapClimResult<Self> {
        let SiteConfig {
            id,
            normals,
            water,
            degree_days,
            anomaly,
        } = config;

        if id.trim().is_empty() {
            return Err(GapClimError::Error("Site id must not be empty".to_string()));
        }

        let normals = MonthlySeries::from_slice(&id, "normals", &normals)?;
        for (month, normal) in normals.iter_months() {
            normal.validate(&id, month)?;
        }
        if let Some(anomaly) = &anomaly {
            anomaly.validate(&id)?;
        }

        let water = WaterBalance::from_parameters(&id, water)?;
        let degree_days = DegreeDayCalculator::from_parameters(&id, degree_days)?;
        let weather = WeatherGenerator::from_normals(normals, anomaly);
        for month in Month::ALL {
            weather.effective_normals()[month].validate(&id, month)?;
        }

        debug!(
            site = %id,
            bucket_size = water.parameters().bucket_size,
            active_season = ?water.active_season(),
            degree_day_season = ?degree_days.season(),
            anomaly = weather.anomaly().is_some(),
            "Built site"
        );

        Ok(Self {
            id,
            weather,
            degree_days,
            water,
        })
    }

    /// Parse and validate a site from TOML.
    pub fn from_toml_str(config: &str) -> GapClimResult<Self> {
        let config: SiteConfig = toml::from_str(config)?;
        Self::from_config(config)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weather(&self) -> &WeatherGenerator {
        &self.weather
    }

    pub fn degree_days(&self) -> &DegreeDayCalculator {
        &self.degree_days
    }

    pub fn water(&self) -> &WaterBalance {
        &self.water
    }

    /// Soil-water state at the start of the first simulated year.
    pub fn initial_state(&self) -> SoilBucketState {
        self.water.initial_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::SeasonalAnomaly;

    fn config() -> SiteConfig {
        SiteConfig::new("bern", MonthlySeries::filled(MonthlyClimateNormal::default()))
    }

    #[test]
    fn test_from_config() {
        let site = Site::from_config(config()).unwrap();
        assert_eq!(site.id(), "bern");
        assert_eq!(site.initial_state().soil_moisture, 20.0);
        assert!(site.weather().anomaly().is_none());
    }

    #[test]
    fn test_rejects_wrong_number_of_normals() {
        let mut config = config();
        config.normals.pop();

        match Site::from_config(config) {
            Err(GapClimError::SeriesLength {
                site,
                series,
                actual,
            }) => {
                assert_eq!(site, "bern");
                assert_eq!(series, "normals");
                assert_eq!(actual, 11);
            }
            other => panic!("expected series length error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_id() {
        let mut config = config();
        config.id = "  ".to_string();
        assert!(matches!(
            Site::from_config(config),
            Err(GapClimError::Error(_))
        ));
    }

    #[test]
    fn test_reports_month_of_invalid_normal() {
        let mut config = config();
        config.normals[7].var_temperature = -1.0;

        let message = Site::from_config(config).unwrap_err().to_string();
        assert!(message.contains("August"), "{}", message);
        assert!(message.contains("bern"), "{}", message);
    }

    #[test]
    fn test_rejects_invalid_anomaly() {
        let mut config = config();
        config.anomaly = Some(ClimateAnomaly::uniform(SeasonalAnomaly {
            correlation: Some(-2.0),
            ..Default::default()
        }));
        assert!(Site::from_config(config).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut original = config();
        original.water.bucket_size = 9.0;
        let text = original.to_toml_string().unwrap();

        let site = Site::from_toml_str(&text).unwrap();
        assert_eq!(site.water().parameters().bucket_size, 9.0);
        assert_eq!(site.weather().normals()[Month::May], MonthlyClimateNormal::default());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            Site::from_toml_str("id = "),
            Err(GapClimError::ConfigParse(_))
        ));
    }
}
