use thiserror::Error;

/// Error type for invalid site configuration.
///
/// Numerical degeneracies inside the monthly recurrences are never reported
/// through this type; they resolve to documented fallback values instead.
#[derive(Error, Debug)]
pub enum GapClimError {
    #[error("{0}")]
    Error(String),
    #[error("Invalid parameter `{name}` for site {site}: {value} ({reason})")]
    InvalidParameter {
        site: String,
        name: String,
        value: f64,
        reason: String,
    },
    #[error("Series `{series}` for site {site} must have 12 monthly values, got {actual}")]
    SeriesLength {
        site: String,
        series: String,
        actual: usize,
    },
    #[error("Invalid month range {start}..{end} ({convention}) for site {site}")]
    InvalidMonthRange {
        site: String,
        start: usize,
        end: usize,
        convention: String,
    },
    #[error("Invalid climate normal for site {site}, month {month}: {reason}")]
    InvalidClimateNormal {
        site: String,
        month: String,
        reason: String,
    },
    #[error("Could not parse site configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, GapClimError>`.
pub type GapClimResult<T> = Result<T, GapClimError>;
