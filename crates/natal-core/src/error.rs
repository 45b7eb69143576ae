use crate::ephemeris::EphemerisError;
use thiserror::Error;

/// Request input that cannot be charted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid timezone string. Use IANA, e.g., 'America/New_York'. Got: {timezone}")]
    InvalidTimezone { timezone: String },
    #[error("Invalid date: {date}. Expected YYYY-MM-DD")]
    InvalidDate { date: String },
    #[error("Invalid time: {time}. Expected 24-hour HH:MM")]
    InvalidTime { time: String },
    #[error("house_system must be one of: {}", valid.join(", "))]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("{field} must be between {min} and {max}, got {value}")]
    CoordinateOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors that abort a whole chart computation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Calculation(#[from] EphemerisError),
}

impl ChartError {
    /// True when the caller sent bad input rather than the engine failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChartError::Validation(_))
    }
}
