//! Error types for calendar computations.

use chrono::NaiveDate;

/// Result type for calendar computations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Failure of the underlying calendar or astronomical computation.
///
/// These are not recovered by the resolver: they indicate bad input or a
/// misconfigured host and are propagated to the caller unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// The Gregorian date lies outside the supported years (1..=9999).
    #[error("Date out of supported range: {0}")]
    DateOutOfRange(NaiveDate),

    /// Coordinates are not finite or out of bounds.
    #[error("Invalid location: lat={latitude}, lon={longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// Any other failure raised by an oracle implementation.
    #[error("Calendar computation failed for {date}: {message}")]
    Computation { date: NaiveDate, message: String },
}

impl CalendarError {
    /// Create a computation error for a date.
    pub fn computation(date: NaiveDate, message: impl Into<String>) -> Self {
        Self::Computation {
            date,
            message: message.into(),
        }
    }
}
