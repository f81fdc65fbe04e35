// --- File: crates/consultify_scheduling/src/models.rs ---
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// The wire-level domain types are shared with the service traits and live in
// consultify_common; re-export them so consumers have one import path.
pub use consultify_common::services::{
    Booking, BookingAttempt, BookingRequest, BookingStatus, CommunicationMethod, LeadDetails,
    LeadSelector, Slot,
};

/// Query parameters for the per-date slot listing.
#[derive(Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct SlotsForDateQuery {
    /// Calendar date in YYYY-MM-DD form.
    pub date: NaiveDate,
}

/// The set of calendar dates that currently have at least one bookable slot.
///
/// Advisory data: a date listed here can still come back empty from the
/// per-date query if the last slot was taken in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailableDatesResponse {
    pub dates: Vec<NaiveDate>,
    /// IANA name of the timezone used to bucket slots into dates.
    pub timezone: String,
    pub horizon_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Live slot listing for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsForDateResponse {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}
