// File: crates/consultify_booking/src/handlers.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use consultify_config::AppConfig;

use crate::forms::ContactForm;
use crate::logic::BookingEngine;
use crate::models::{
    OpenSessionResponse, PaymentRequest, SelectDateRequest, SelectSlotRequest, SessionView,
};

// Shared state for booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<BookingEngine>,
}

fn service_disabled() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "Booking service is disabled.".to_string(),
    )
        .into_response()
}

/// Handler to open a new booking session.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions", // Path relative to /api
    responses(
        (status = 200, description = "Fresh session plus the dates that currently have availability", body = OpenSessionResponse),
        (status = 503, description = "Booking service is disabled or at capacity")
    ),
    tag = "Booking"
))]
pub async fn open_session_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<OpenSessionResponse>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .open()
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler to fetch the current session view.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/sessions/{id}",
    params(("id" = Uuid, Path, description = "Booking session id")),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "No session with this id")
    ),
    tag = "Booking"
))]
pub async fn get_session_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .session_view(id)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler for the date-selection step.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/select-date",
    params(("id" = Uuid, Path, description = "Booking session id")),
    request_body = SelectDateRequest,
    responses(
        (status = 200, description = "View with the slots fetched for the date", body = SessionView),
        (status = 404, description = "No session with this id"),
        (status = 422, description = "Date is in the past, beyond the horizon, or has no availability")
    ),
    tag = "Booking"
))]
pub async fn select_date_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectDateRequest>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .select_date(id, body.date)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler for the slot-selection step.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/select-slot",
    params(("id" = Uuid, Path, description = "Booking session id")),
    request_body = SelectSlotRequest,
    responses(
        (status = 200, description = "View with the chosen slot", body = SessionView),
        (status = 404, description = "No session with this id"),
        (status = 422, description = "Slot is not in the list fetched for the selected date")
    ),
    tag = "Booking"
))]
pub async fn select_slot_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectSlotRequest>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .select_slot(id, &body.slot_id)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler for the contact step.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/contact",
    params(("id" = Uuid, Path, description = "Booking session id")),
    request_body = ContactForm,
    responses(
        (status = 200, description = "Booking created; paid slots move to the payment step", body = SessionView),
        (status = 404, description = "No session with this id"),
        (status = 409, description = "Slot was booked by someone else, or a submission is already running"),
        (status = 422, description = "Contact details failed validation"),
        (status = 502, description = "Availability backend or payment provider failed")
    ),
    tag = "Booking"
))]
pub async fn submit_contact_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
    Json(form): Json<ContactForm>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .submit_contact(id, form)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler for the payment step.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/payment",
    params(("id" = Uuid, Path, description = "Booking session id")),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Charge confirmed and booking confirmed upstream", body = SessionView),
        (status = 402, description = "The provider declined the charge; the same intent backs a retry"),
        (status = 404, description = "No session with this id"),
        (status = 409, description = "Payment does not apply to the session's current step"),
        (status = 502, description = "Charge succeeded but confirmation failed; do not charge again")
    ),
    tag = "Booking"
))]
pub async fn submit_payment_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .submit_payment(id, body)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// Handler to reset the session for a fresh attempt.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/sessions/{id}/reset",
    params(("id" = Uuid, Path, description = "Booking session id")),
    responses(
        (status = 200, description = "Session back at browsing, prior attempt recorded as cancelled", body = SessionView),
        (status = 404, description = "No session with this id")
    ),
    tag = "Booking"
))]
pub async fn reset_session_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, Response> {
    if !state.config.use_scheduling {
        return Err(service_disabled());
    }
    state
        .engine
        .reset(id)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}
