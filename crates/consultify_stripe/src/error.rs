// --- File: crates/consultify_stripe/src/error.rs ---
use consultify_common::{external_service_error, CommonError, HttpStatusCode};
use thiserror::Error;

/// Stripe-specific error types.
///
/// A declined card is not an error: declines travel as
/// `ChargeOutcome::Declined` so the booking flow can offer a retry.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,
}

/// Convert StripeError to CommonError
impl From<StripeError> for CommonError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => {
                CommonError::HttpError(format!("Stripe request error: {}", e))
            }
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                CommonError::ParseError(format!("Stripe response parse error: {}", e))
            }
            StripeError::ConfigError => {
                CommonError::ConfigError("Stripe configuration missing or incomplete".to_string())
            }
        }
    }
}

/// Implement HttpStatusCode for StripeError to provide a consistent way to
/// convert StripeError to HTTP status codes.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 502,
            StripeError::ApiError { status_code, .. } => *status_code,
            StripeError::ParseError(_) => 502,
            StripeError::ConfigError => 500,
        }
    }
}
