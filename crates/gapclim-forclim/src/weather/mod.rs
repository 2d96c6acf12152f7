//! Weather domain components
//!
//! - `WeatherGenerator`: correlated monthly temperature and log-normal
//!   precipitation from climate normals and standard-normal draws

mod generator;

pub use generator::{simulate_precipitation, simulate_temperature, MonthlyWeather, WeatherGenerator};
