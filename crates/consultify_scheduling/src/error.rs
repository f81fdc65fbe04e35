// --- File: crates/consultify_scheduling/src/error.rs ---
use consultify_common::{external_service_error, validation_error, CommonError, HttpStatusCode};
use thiserror::Error;

/// Scheduling-specific error types.
///
/// A slot taken by someone else is not represented here: contention is an
/// expected outcome and travels as `BookingAttempt::SlotTaken`.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Error occurred during a request to the availability backend
    #[error("Scheduling API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the availability backend
    #[error("Scheduling API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing an availability backend response
    #[error("Failed to parse scheduling API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete scheduling configuration
    #[error("Scheduling configuration missing or incomplete: {0}")]
    ConfigError(String),

    /// The scheduling service is not reachable through the capability seam
    #[error("Scheduling service unavailable: {0}")]
    Unavailable(String),

    /// Requested date lies in the past
    #[error("Date is in the past")]
    DateInPast,

    /// Requested date lies beyond the booking horizon
    #[error("Date is beyond the booking horizon of {0} days")]
    DateBeyondHorizon(i64),

    /// Requested date has no known availability
    #[error("No availability on this date")]
    DateUnavailable,
}

/// Convert SchedulingError to CommonError
impl From<SchedulingError> for CommonError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::RequestError(e) => {
                external_service_error("Scheduling API", e.to_string())
            }
            SchedulingError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Scheduling API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            SchedulingError::ParseError(e) => {
                CommonError::ParseError(format!("Scheduling response parse error: {}", e))
            }
            SchedulingError::ConfigError(msg) => CommonError::ConfigError(msg),
            SchedulingError::Unavailable(msg) => external_service_error("Scheduling API", msg),
            SchedulingError::DateInPast
            | SchedulingError::DateBeyondHorizon(_)
            | SchedulingError::DateUnavailable => validation_error(err.to_string()),
        }
    }
}

/// Implement HttpStatusCode for SchedulingError to provide a consistent way
/// to convert it to HTTP status codes.
impl HttpStatusCode for SchedulingError {
    fn status_code(&self) -> u16 {
        match self {
            SchedulingError::RequestError(_) => 502,
            SchedulingError::ApiError { status_code, .. } => *status_code,
            SchedulingError::ParseError(_) => 502,
            SchedulingError::ConfigError(_) => 500,
            SchedulingError::Unavailable(_) => 502,
            SchedulingError::DateInPast
            | SchedulingError::DateBeyondHorizon(_)
            | SchedulingError::DateUnavailable => 422,
        }
    }
}
