// File: crates/consultify_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::forms::{ContactForm, FieldError};
use crate::models::{
    BookingSummary, OpenSessionResponse, PaymentRequest, PaymentSummary, SelectDateRequest,
    SelectSlotRequest, SessionStep, SessionView,
};
use consultify_common::services::{BookingStatus, CommunicationMethod, Slot};

#[utoipa::path(
    post,
    path = "/booking/sessions",
    responses(
        (status = 200, description = "Fresh session plus the dates that currently have availability", body = OpenSessionResponse,
         example = json!({
             "session": {
                 "session_id": "7c41f0fe-90ed-4f5c-9cb4-5b2f8a3c6a10",
                 "step": "browsing",
                 "slots": [],
                 "is_submitting": false,
                 "payment": { "required": false, "currency": "usd" }
             },
             "available_dates": ["2025-09-12", "2025-09-15"]
         })
        ),
        (status = 503, description = "Booking service is disabled or at capacity")
    )
)]
fn doc_open_session_handler() {}

#[utoipa::path(
    get,
    path = "/booking/sessions/{id}",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "No session with this id")
    )
)]
fn doc_get_session_handler() {}

#[utoipa::path(
    post,
    path = "/booking/sessions/{id}/select-date",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    request_body = SelectDateRequest,
    responses(
        (status = 200, description = "View with the slots fetched for the date", body = SessionView,
         example = json!({
             "session_id": "7c41f0fe-90ed-4f5c-9cb4-5b2f8a3c6a10",
             "step": "browsing",
             "selected_date": "2025-09-15",
             "slots": [
                 {
                     "id": "slot-2025-09-15-1400",
                     "start_time": "2025-09-15T14:00:00Z",
                     "duration_minutes": 30,
                     "requires_payment": true,
                     "payment_amount_cents": 1000
                 }
             ],
             "is_submitting": false,
             "payment": { "required": false, "currency": "usd" }
         })
        ),
        (status = 422, description = "Date is in the past, beyond the horizon, or has no availability")
    )
)]
fn doc_select_date_handler() {}

#[utoipa::path(
    post,
    path = "/booking/sessions/{id}/select-slot",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    request_body = SelectSlotRequest,
    responses(
        (status = 200, description = "View with the chosen slot", body = SessionView),
        (status = 422, description = "Slot is not in the list fetched for the selected date")
    )
)]
fn doc_select_slot_handler() {}

#[utoipa::path(
    post,
    path = "/booking/sessions/{id}/contact",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    request_body(content = ContactForm, example = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "communication_method": "zoom",
        "notes": "First consultation"
    })),
    responses(
        (status = 200, description = "Booking created; paid slots move to the payment step", body = SessionView),
        (status = 409, description = "Slot was booked by someone else first",
         example = json!({ "error": { "message": "Slot not available", "code": 409 } })
        ),
        (status = 422, description = "Contact details failed validation",
         example = json!({
             "error": {
                 "message": "Submitted details failed validation",
                 "code": 422,
                 "fields": [
                     { "field": "email", "message": "Enter a valid email address." }
                 ]
             }
         })
        ),
        (status = 502, description = "Availability backend or payment provider failed")
    )
)]
fn doc_submit_contact_handler() {}

#[utoipa::path(
    post,
    path = "/booking/sessions/{id}/payment",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    request_body(content = PaymentRequest, example = json!({ "payment_method": "pm_card_visa" })),
    responses(
        (status = 200, description = "Charge confirmed and booking confirmed upstream", body = SessionView),
        (status = 402, description = "The provider declined the charge; the same intent backs a retry",
         example = json!({ "error": { "message": "Payment declined: Your card was declined.", "code": 402 } })
        ),
        (status = 502, description = "Charge succeeded but confirmation failed; do not charge again",
         example = json!({
             "error": {
                 "message": "Payment successful but confirmation failed. Please contact support.",
                 "code": 502
             }
         })
        )
    )
)]
fn doc_submit_payment_handler() {}

#[utoipa::path(
    post,
    path = "/booking/sessions/{id}/reset",
    params(
        ("id" = String, Path, description = "Booking session id", format = "uuid")
    ),
    responses(
        (status = 200, description = "Session back at browsing, prior attempt recorded as cancelled", body = SessionView),
        (status = 404, description = "No session with this id")
    )
)]
fn doc_reset_session_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_open_session_handler,
        doc_get_session_handler,
        doc_select_date_handler,
        doc_select_slot_handler,
        doc_submit_contact_handler,
        doc_submit_payment_handler,
        doc_reset_session_handler
    ),
    components(
        schemas(
            Slot,
            BookingStatus,
            CommunicationMethod,
            ContactForm,
            FieldError,
            SessionStep,
            SessionView,
            BookingSummary,
            PaymentSummary,
            OpenSessionResponse,
            SelectDateRequest,
            SelectSlotRequest,
            PaymentRequest
        )
    ),
    tags(
        (name = "booking", description = "Consultation booking session API")
    ),
    servers(
        (url = "/api", description = "Booking API server")
    )
)]
pub struct BookingApiDoc;
