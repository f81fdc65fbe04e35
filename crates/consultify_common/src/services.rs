// --- File: crates/consultify_common/src/services.rs ---
//! Service abstractions for the remote collaborators.
//!
//! The booking flow talks to two upstream systems: the availability/booking
//! backend and the payment provider. Both are modelled as traits here so the
//! session state machine can be exercised against fakes, with the concrete
//! `reqwest` implementations living in their own crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

// --- Shared domain types ---

/// One bookable time window, as served by the availability backend.
///
/// Slots are immutable for the duration of one booking attempt; whether a
/// slot is still free is decided upstream at booking-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Slot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub requires_payment: bool,
    /// Fee in minor currency units. Present iff `requires_payment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount_cents: Option<i64>,
}

/// Contact details for a lead created together with a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeadDetails {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Either a reference to a lead the CRM already knows, or a fresh record
/// the backend creates (get-or-create by email) atomically with the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum LeadSelector {
    Existing { lead_id: i64 },
    New { lead: LeadDetails },
}

/// How the consultation is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CommunicationMethod {
    Zoom,
    Teams,
    DirectCall,
    GoogleMeet,
}

impl CommunicationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationMethod::Zoom => "zoom",
            CommunicationMethod::Teams => "teams",
            CommunicationMethod::DirectCall => "direct_call",
            CommunicationMethod::GoogleMeet => "google_meet",
        }
    }
}

impl fmt::Display for CommunicationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote lifecycle of a booking. Advances monotonically until terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    AwaitingPayment,
    Confirmed,
    Cancelled,
    Failed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::AwaitingPayment => "awaiting_payment",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Confirmed | BookingStatus::Cancelled | BookingStatus::Failed
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for `POST bookings` on the availability backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingRequest {
    pub slot_id: String,
    pub communication_method: CommunicationMethod,
    #[serde(flatten)]
    pub lead: LeadSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A reserved pairing of a slot and a lead, as the backend records it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Booking {
    pub id: i64,
    pub slot_id: String,
    pub lead: LeadDetails,
    pub communication_method: CommunicationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub requires_payment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount_cents: Option<i64>,
    /// Assigned upstream once the booking is confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

/// Outcome of a booking-creation attempt. A taken slot is an expected
/// rejection, not an error: it travels on the Ok channel so callers must
/// handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingAttempt {
    Created(Booking),
    SlotTaken { message: String },
}

/// Provider-issued authorization for one charge, scoped to one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentIntent {
    /// Client secret of the form `pi_..._secret_...`.
    pub client_secret: String,
}

impl PaymentIntent {
    /// The intent identifier embedded in the client secret.
    pub fn intent_id(&self) -> &str {
        match self.client_secret.split_once("_secret_") {
            Some((id, _)) => id,
            None => &self.client_secret,
        }
    }
}

/// Tokenized payment details. Raw card numbers never reach this service;
/// the presentation layer exchanges them for a provider token first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CardDetails {
    /// Provider payment-method token, e.g. `pm_card_visa`.
    pub payment_method: String,
}

/// Outcome of a charge confirmation. A decline is an expected outcome and
/// travels on the Ok channel; Err means the charge state is unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Succeeded { intent_id: String },
    Declined { message: String },
}

// --- Capability traits ---

/// Operations of the upstream availability/booking backend.
pub trait SchedulingService: Send + Sync {
    /// Error type returned by scheduling operations.
    type Error: StdError + Send + Sync + 'static;

    /// List every currently bookable slot.
    fn list_available_slots(&self) -> BoxFuture<'_, Vec<Slot>, Self::Error>;

    /// List the slots for one calendar date. Always a live query; the
    /// result may legitimately be empty.
    fn list_slots_for_date(&self, date: NaiveDate) -> BoxFuture<'_, Vec<Slot>, Self::Error>;

    /// Create a booking for a slot and lead. The backend is the authority
    /// on slot freshness; contention surfaces as `BookingAttempt::SlotTaken`.
    fn create_booking(&self, request: BookingRequest)
        -> BoxFuture<'_, BookingAttempt, Self::Error>;

    /// Server-side payment confirmation for a charged intent. Returns the
    /// booking in its post-confirmation state.
    fn confirm_payment(&self, payment_intent_id: &str) -> BoxFuture<'_, Booking, Self::Error>;
}

/// Operations of the payment provider.
pub trait PaymentProvider: Send + Sync {
    /// Error type returned by payment operations.
    type Error: StdError + Send + Sync + 'static;

    /// Request a payment intent keyed to a created booking and its amount.
    fn create_intent(
        &self,
        booking_id: i64,
        amount_cents: i64,
        currency: &str,
    ) -> BoxFuture<'_, PaymentIntent, Self::Error>;

    /// Confirm the charge for an intent with tokenized payment details.
    /// A decline keeps the intent usable for a retry.
    fn confirm_charge(
        &self,
        intent: &PaymentIntent,
        card: &CardDetails,
    ) -> BoxFuture<'_, ChargeOutcome, Self::Error>;
}

/// A factory for creating service instances.
///
/// Services are optional: a runtime flag or missing config section leaves
/// the corresponding capability unavailable.
pub trait ServiceFactory: Send + Sync {
    /// Get the availability/booking backend client.
    fn scheduling_service(&self) -> Option<Arc<dyn SchedulingService<Error = BoxedError>>>;

    /// Get the payment provider client.
    fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_derived_from_client_secret() {
        let intent = PaymentIntent {
            client_secret: "pi_3ABC123_secret_XYZ789".to_string(),
        };
        assert_eq!(intent.intent_id(), "pi_3ABC123");
    }

    #[test]
    fn test_intent_id_falls_back_to_whole_secret() {
        let intent = PaymentIntent {
            client_secret: "opaque-token".to_string(),
        };
        assert_eq!(intent.intent_id(), "opaque-token");
    }

    #[test]
    fn test_booking_request_serializes_new_lead_inline() {
        let request = BookingRequest {
            slot_id: "slot-1".to_string(),
            communication_method: CommunicationMethod::Zoom,
            lead: LeadSelector::New {
                lead: LeadDetails {
                    name: "Ada Lovelace".to_string(),
                    email: "ada@example.com".to_string(),
                    phone: None,
                    company: None,
                },
            },
            notes: Some("First consultation".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["slot_id"], "slot-1");
        assert_eq!(value["communication_method"], "zoom");
        assert_eq!(value["lead"]["email"], "ada@example.com");
        assert!(value.get("lead_id").is_none());
    }

    #[test]
    fn test_booking_request_serializes_existing_lead_reference() {
        let request = BookingRequest {
            slot_id: "slot-1".to_string(),
            communication_method: CommunicationMethod::DirectCall,
            lead: LeadSelector::Existing { lead_id: 42 },
            notes: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["lead_id"], 42);
        assert!(value.get("lead").is_none());
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_booking_status_wire_strings() {
        let status: BookingStatus = serde_json::from_str(r#""awaiting_payment""#).unwrap();
        assert_eq!(status, BookingStatus::AwaitingPayment);
        assert_eq!(status.as_str(), "awaiting_payment");
        assert!(!status.is_terminal());
        assert!(BookingStatus::Confirmed.is_terminal());
    }
}
