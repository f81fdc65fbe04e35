// --- File: crates/consultify_booking/src/session.rs ---
//! The booking session state machine.
//!
//! One `BookingSession` owns one user's progress through the flow. All
//! transitions are synchronous; the orchestrator performs the remote work
//! between them and reports outcomes back through the named transition
//! methods. Nothing here touches the network or the clock, which is what
//! keeps the machine testable.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use consultify_common::services::{Booking, PaymentIntent, Slot};

use crate::forms::FieldError;
use crate::models::{BookingSummary, PaymentSummary, SessionStep, SessionView};

/// Surfaced when the charge went through but the confirmation call did not.
pub const CONFIRMATION_PENDING_MESSAGE: &str =
    "Payment successful but confirmation failed. Please contact support.";

/// Surfaced when the chosen slot was booked by someone else first.
pub const SLOT_TAKEN_MESSAGE: &str = "Slot not available";

/// A transition that does not apply to the session's current state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// The attempt already reached a terminal state; only reset applies.
    #[error("the session has already finished")]
    Terminal,
    /// A submission is running; wait for it or reset.
    #[error("a submission is already in progress")]
    InFlight,
    /// The action is not defined for the current step.
    #[error("cannot {action} while {state}")]
    InvalidAction {
        state: &'static str,
        action: &'static str,
    },
    /// The slot id is not in the list fetched for the selected date.
    #[error("slot is not in the offered list")]
    UnknownSlot,
}

/// Where one booking attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Picking a date, or looking at the slots of one.
    Browsing,
    /// A slot is chosen; contact details are next.
    SlotSelected { slot: Slot },
    /// The booking exists upstream; payment is next if the slot is paid.
    ContactCaptured { slot: Slot, booking: Booking },
    /// A payment intent exists for the booking.
    PaymentPending {
        slot: Slot,
        booking: Booking,
        intent: PaymentIntent,
        /// Latched once the charge succeeds. Blocks further charges even
        /// when the confirmation call failed.
        charge_succeeded: bool,
        decline_message: Option<String>,
    },
    /// Terminal: the booking is confirmed upstream.
    Confirmed { booking: Booking },
    /// Terminal: the user abandoned the attempt.
    Cancelled,
    /// Terminal: the attempt hit an unrecoverable fault.
    Failed { message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Browsing => "browsing",
            SessionState::SlotSelected { .. } => "slot_selected",
            SessionState::ContactCaptured { .. } => "contact_captured",
            SessionState::PaymentPending { .. } => "payment_pending",
            SessionState::Confirmed { .. } => "confirmed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn step(&self) -> SessionStep {
        match self {
            SessionState::Browsing => SessionStep::Browsing,
            SessionState::SlotSelected { .. } => SessionStep::SlotSelected,
            SessionState::ContactCaptured { .. } => SessionStep::ContactCaptured,
            SessionState::PaymentPending { .. } => SessionStep::PaymentPending,
            SessionState::Confirmed { .. } => SessionStep::Confirmed,
            SessionState::Cancelled => SessionStep::Cancelled,
            SessionState::Failed { .. } => SessionStep::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Confirmed { .. } | SessionState::Cancelled | SessionState::Failed { .. }
        )
    }
}

/// One user's booking session. The engine owns it behind a lock; the
/// methods here assume the caller holds that lock.
#[derive(Debug)]
pub struct BookingSession {
    id: Uuid,
    state: SessionState,
    selected_date: Option<NaiveDate>,
    slots: Vec<Slot>,
    error: Option<String>,
    field_errors: Vec<FieldError>,
    in_flight: bool,
    attempt: u64,
}

impl BookingSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: SessionState::Browsing,
            selected_date: None,
            slots: Vec::new(),
            error: None,
            field_errors: Vec::new(),
            in_flight: false,
            attempt: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Monotonic attempt counter. Bumped by `reset`; outcomes carrying an
    /// older value must be discarded.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// True once the charge succeeded while confirmation is still owed.
    pub fn charge_awaiting_confirmation(&self) -> bool {
        matches!(
            self.state,
            SessionState::PaymentPending {
                charge_succeeded: true,
                ..
            }
        )
    }

    fn invalid(&self, action: &'static str) -> TransitionError {
        TransitionError::InvalidAction {
            state: self.state.name(),
            action,
        }
    }

    /// Chooses a calendar date. Allowed while browsing or after a slot was
    /// chosen; picking a date drops a previously chosen slot.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if self.in_flight {
            return Err(TransitionError::InFlight);
        }
        match self.state {
            SessionState::Browsing | SessionState::SlotSelected { .. } => {
                self.state = SessionState::Browsing;
                self.selected_date = Some(date);
                self.slots.clear();
                self.error = None;
                self.field_errors.clear();
                Ok(())
            }
            _ => Err(self.invalid("select a date")),
        }
    }

    /// Stores the slot list fetched for the selected date.
    pub fn record_slots(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
        self.error = None;
    }

    /// Records a failed per-date fetch. The date stays chosen so selecting
    /// it again retries.
    pub fn record_slot_fetch_failure(&mut self, message: &str) {
        self.slots.clear();
        self.error = Some(message.to_string());
    }

    /// Chooses a slot out of the fetched list. Re-selection replaces the
    /// previous choice.
    pub fn select_slot(&mut self, slot_id: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if self.in_flight {
            return Err(TransitionError::InFlight);
        }
        match self.state {
            SessionState::Browsing | SessionState::SlotSelected { .. } => {
                let slot = self
                    .slots
                    .iter()
                    .find(|slot| slot.id == slot_id)
                    .cloned()
                    .ok_or(TransitionError::UnknownSlot)?;
                self.state = SessionState::SlotSelected { slot };
                self.error = None;
                self.field_errors.clear();
                Ok(())
            }
            _ => Err(self.invalid("select a slot")),
        }
    }

    /// Marks a submission as running. Exactly one may run at a time.
    pub fn begin_submission(&mut self) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if self.in_flight {
            return Err(TransitionError::InFlight);
        }
        self.in_flight = true;
        Ok(())
    }

    /// Clears the submission flag after the outcome was applied.
    pub fn end_submission(&mut self) {
        self.in_flight = false;
    }

    pub fn record_field_errors(&mut self, errors: Vec<FieldError>) {
        self.field_errors = errors;
    }

    pub fn clear_field_errors(&mut self) {
        self.field_errors.clear();
    }

    /// Applies a successful remote booking creation.
    pub fn booking_created(&mut self, booking: Booking) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if let SessionState::SlotSelected { slot } = &self.state {
            let slot = slot.clone();
            self.state = SessionState::ContactCaptured { slot, booking };
            self.error = None;
            Ok(())
        } else {
            Err(self.invalid("record the booking"))
        }
    }

    /// Applies a rejected booking creation; the user re-picks a slot.
    pub fn booking_rejected(&mut self, message: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        match self.state {
            SessionState::SlotSelected { .. } => {
                self.error = Some(message.to_string());
                Ok(())
            }
            _ => Err(self.invalid("record the rejection")),
        }
    }

    /// Applies a created payment intent. Only paid slots get here.
    pub fn intent_created(&mut self, intent: PaymentIntent) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        match &self.state {
            SessionState::ContactCaptured { slot, booking } if slot.requires_payment => {
                let slot = slot.clone();
                let booking = booking.clone();
                self.state = SessionState::PaymentPending {
                    slot,
                    booking,
                    intent,
                    charge_succeeded: false,
                    decline_message: None,
                };
                self.error = None;
                Ok(())
            }
            _ => Err(self.invalid("start the payment step")),
        }
    }

    /// Applies a failed intent request; resubmitting the contact step
    /// resumes from the booking that already exists.
    pub fn intent_failed(&mut self, message: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        match self.state {
            SessionState::ContactCaptured { .. } => {
                self.error = Some(message.to_string());
                Ok(())
            }
            _ => Err(self.invalid("record the intent failure")),
        }
    }

    /// Applies the upstream confirmation. Free slots arrive here straight
    /// from `ContactCaptured`; paid ones from `PaymentPending`.
    pub fn confirmed(&mut self, booking: Booking) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        match self.state {
            SessionState::ContactCaptured { .. } | SessionState::PaymentPending { .. } => {
                self.state = SessionState::Confirmed { booking };
                self.error = None;
                self.field_errors.clear();
                Ok(())
            }
            _ => Err(self.invalid("confirm the booking")),
        }
    }

    /// Applies a provider decline. The intent stays usable for a retry.
    pub fn charge_declined(&mut self, message: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if let SessionState::PaymentPending {
            decline_message, ..
        } = &mut self.state
        {
            *decline_message = Some(message.to_string());
            Ok(())
        } else {
            Err(self.invalid("record the decline"))
        }
    }

    /// Applies a transport failure during the charge. The charge state is
    /// unknown on this side; the same intent backs the retry.
    pub fn payment_failed(&mut self, message: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        match self.state {
            SessionState::PaymentPending { .. } => {
                self.error = Some(message.to_string());
                Ok(())
            }
            _ => Err(self.invalid("record the payment failure")),
        }
    }

    /// Latches a successful charge whose confirmation call failed. Further
    /// charges are blocked; support resolves the attempt out of band.
    pub fn confirmation_pending(&mut self) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if let SessionState::PaymentPending {
            charge_succeeded,
            decline_message,
            ..
        } = &mut self.state
        {
            *charge_succeeded = true;
            *decline_message = None;
            self.error = Some(CONFIRMATION_PENDING_MESSAGE.to_string());
            Ok(())
        } else {
            Err(self.invalid("record the confirmation failure"))
        }
    }

    /// Abandons the attempt.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        self.state = SessionState::Cancelled;
        Ok(())
    }

    /// Marks the attempt as unrecoverably failed.
    pub fn fail(&mut self, message: &str) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        self.state = SessionState::Failed {
            message: message.to_string(),
        };
        Ok(())
    }

    /// Starts a fresh attempt. An attempt still underway is closed as
    /// `Cancelled` first, so every attempt ends in exactly one terminal
    /// state. Outcomes of submissions still running against the old
    /// attempt see the bumped counter and are dropped.
    pub fn reset(&mut self) {
        if self.cancel().is_ok() {
            debug!(session_id = %self.id, "open attempt recorded as cancelled");
        }
        self.state = SessionState::Browsing;
        self.selected_date = None;
        self.slots.clear();
        self.error = None;
        self.field_errors.clear();
        self.in_flight = false;
        self.attempt += 1;
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self, currency: &str) -> SessionView {
        let (selected_slot, booking) = match &self.state {
            SessionState::SlotSelected { slot } => (Some(slot.clone()), None),
            SessionState::ContactCaptured { slot, booking } => {
                (Some(slot.clone()), Some(booking.clone()))
            }
            SessionState::PaymentPending { slot, booking, .. } => {
                (Some(slot.clone()), Some(booking.clone()))
            }
            SessionState::Confirmed { booking } => (None, Some(booking.clone())),
            SessionState::Browsing | SessionState::Cancelled | SessionState::Failed { .. } => {
                (None, None)
            }
        };

        let error = match &self.state {
            SessionState::PaymentPending {
                decline_message: Some(message),
                ..
            } => Some(message.clone()),
            SessionState::Failed { message } => Some(message.clone()),
            _ => self.error.clone(),
        };

        let payment = match &self.state {
            SessionState::SlotSelected { slot }
            | SessionState::ContactCaptured { slot, .. }
            | SessionState::PaymentPending { slot, .. } => PaymentSummary {
                required: slot.requires_payment,
                amount_cents: slot.payment_amount_cents,
                currency: currency.to_string(),
            },
            SessionState::Confirmed { booking } => PaymentSummary {
                required: booking.requires_payment,
                amount_cents: booking.payment_amount_cents,
                currency: currency.to_string(),
            },
            _ => PaymentSummary {
                required: false,
                amount_cents: None,
                currency: currency.to_string(),
            },
        };

        SessionView {
            session_id: self.id,
            step: self.state.step(),
            selected_date: self.selected_date,
            selected_slot,
            slots: self.slots.clone(),
            error,
            field_errors: self.field_errors.clone(),
            is_submitting: self.in_flight,
            booking: booking.map(|booking| BookingSummary {
                id: booking.id,
                status: booking.status,
                meeting_link: booking.meeting_link,
            }),
            payment,
        }
    }
}
