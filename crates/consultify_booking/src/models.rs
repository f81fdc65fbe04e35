// --- File: crates/consultify_booking/src/models.rs ---
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use consultify_common::services::{BookingStatus, Slot};

use crate::forms::FieldError;

/// The flow step names as the presentation layer sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    Browsing,
    SlotSelected,
    ContactCaptured,
    PaymentPending,
    Confirmed,
    Cancelled,
    Failed,
}

/// The created booking, as far as the booking dialog needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingSummary {
    pub id: i64,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

/// Whether and what the selected slot costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentSummary {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    pub currency: String,
}

/// Everything the booking dialog needs to render one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: SessionStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_slot: Option<Slot>,
    /// Slots fetched for the selected date, sorted by start time.
    pub slots: Vec<Slot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    pub is_submitting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingSummary>,
    pub payment: PaymentSummary,
}

/// Response for opening a session: the fresh view plus the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OpenSessionResponse {
    pub session: SessionView,
    /// Dates with at least one bookable slot, in the directory timezone.
    pub available_dates: Vec<NaiveDate>,
}

/// Request body for the date-selection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SelectDateRequest {
    pub date: NaiveDate,
}

/// Request body for the slot-selection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SelectSlotRequest {
    pub slot_id: String,
}

/// Request body for the payment step: the provider token only. Raw card
/// numbers never reach this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentRequest {
    pub payment_method: String,
}
