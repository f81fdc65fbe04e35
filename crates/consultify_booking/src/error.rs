// --- File: crates/consultify_booking/src/error.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use consultify_common::HttpStatusCode;

use crate::forms::FieldError;
use crate::session::TransitionError;

/// Booking flow error types.
///
/// Expected outcomes of the flow itself (a taken slot, a declined card)
/// appear here because they cross the HTTP boundary with their own status
/// codes. The session keeps its own record of them, so the view stays
/// renderable after the error response.
#[derive(Error, Debug)]
pub enum BookingError {
    /// No session with the given id
    #[error("Booking session not found")]
    SessionNotFound,

    /// The action does not apply to the session's current step
    #[error("Cannot {action}: the session is {state}")]
    InvalidAction {
        state: &'static str,
        action: &'static str,
    },

    /// A submission for this session is still running
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Input failed validation; no remote call was made
    #[error("Submitted details failed validation")]
    Validation(Vec<FieldError>),

    /// The chosen slot was booked by someone else first
    #[error("Slot not available")]
    SlotTaken,

    /// The payment provider declined the charge
    #[error("Payment declined: {message}")]
    PaymentDeclined { message: String },

    /// The charge went through but the server-side confirmation did not
    #[error("Payment successful but confirmation failed. Please contact support.")]
    ConfirmationPending,

    /// The availability backend failed mid-flow
    #[error("Scheduling error: {0}")]
    Scheduling(String),

    /// The payment provider failed mid-flow
    #[error("Payment error: {0}")]
    Payment(String),

    /// A paid slot was submitted while the payment provider is off
    #[error("Payment service is disabled.")]
    PaymentDisabled,

    /// No capacity for another open session
    #[error("Too many open booking sessions, try again shortly")]
    Capacity,

    /// Invariant violation inside the orchestrator
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::SessionNotFound => 404,
            BookingError::InvalidAction { .. } => 409,
            BookingError::SubmissionInFlight => 409,
            BookingError::Validation(_) => 422,
            BookingError::SlotTaken => 409,
            BookingError::PaymentDeclined { .. } => 402,
            BookingError::ConfirmationPending => 502,
            BookingError::Scheduling(_) => 502,
            BookingError::Payment(_) => 502,
            BookingError::PaymentDisabled => 503,
            BookingError::Capacity => 503,
            BookingError::Internal(_) => 500,
        }
    }
}

/// Same `{"error": {...}}` body shape as `CommonError`, with a `fields`
/// array added for validation failures.
impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self {
            BookingError::Validation(fields) => Json(json!({
                "error": {
                    "message": self.to_string(),
                    "code": status.as_u16(),
                    "fields": fields,
                }
            })),
            _ => Json(json!({
                "error": {
                    "message": self.to_string(),
                    "code": status.as_u16(),
                }
            })),
        };

        (status, body).into_response()
    }
}

impl From<TransitionError> for BookingError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Terminal => BookingError::InvalidAction {
                state: "finished",
                action: "continue",
            },
            TransitionError::InFlight => BookingError::SubmissionInFlight,
            TransitionError::InvalidAction { state, action } => {
                BookingError::InvalidAction { state, action }
            }
            TransitionError::UnknownSlot => BookingError::Validation(vec![FieldError::new(
                "slot_id",
                "This slot is no longer offered. Pick a time again.",
            )]),
        }
    }
}
