// --- File: crates/consultify_booking/src/logic.rs ---
//! The booking orchestrator.
//!
//! `BookingEngine` sequences the flow across the slot directory, the
//! availability backend and the payment provider. Sessions live behind
//! per-session locks; remote calls never run under one. Each mutating
//! action locks briefly to validate and mark the submission, performs the
//! remote work, then re-locks and applies the outcome only if the attempt
//! counter still matches. `reset` therefore never waits on the network.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use consultify_common::services::{
    Booking, BookingAttempt, BookingRequest, BoxedError, CardDetails, ChargeOutcome,
    PaymentProvider, SchedulingService, Slot,
};
use consultify_config::{AppConfig, BookingConfig};
use consultify_scheduling::directory::SlotDirectory;
use consultify_scheduling::error::SchedulingError;

use crate::error::BookingError;
use crate::forms::{ContactForm, FieldError};
use crate::models::{OpenSessionResponse, PaymentRequest, SessionView};
use crate::session::{BookingSession, SessionState, TransitionError, SLOT_TAKEN_MESSAGE};

/// Fee applied when a paid slot carries no explicit amount.
pub const DEFAULT_CONSULTATION_FEE_CENTS: i64 = 1000;

type SharedSession = Arc<Mutex<BookingSession>>;

/// What a contact submission still has to do.
enum ContactStage {
    /// No booking yet: create it, then request the intent for paid slots.
    Create { slot: Slot, request: BookingRequest },
    /// The booking exists from an earlier submission; only the intent is
    /// still owed.
    Resume { slot: Slot, booking: Booking },
}

pub struct BookingEngine {
    directory: Arc<SlotDirectory>,
    scheduling: Arc<dyn SchedulingService<Error = BoxedError>>,
    payments: Option<Arc<dyn PaymentProvider<Error = BoxedError>>>,
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
    max_open_sessions: usize,
    currency: String,
}

impl BookingEngine {
    pub fn new(
        config: &AppConfig,
        directory: Arc<SlotDirectory>,
        scheduling: Arc<dyn SchedulingService<Error = BoxedError>>,
        payments: Option<Arc<dyn PaymentProvider<Error = BoxedError>>>,
    ) -> Self {
        let booking = config.booking.clone().unwrap_or_default();
        let currency = booking
            .currency
            .clone()
            .or_else(|| {
                config
                    .stripe
                    .as_ref()
                    .and_then(|stripe| stripe.default_currency.clone())
            })
            .unwrap_or_else(|| BookingConfig::DEFAULT_CURRENCY.to_string());

        Self {
            directory,
            scheduling,
            payments,
            sessions: Mutex::new(HashMap::new()),
            max_open_sessions: booking.max_open_sessions(),
            currency,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    async fn session(&self, id: Uuid) -> Result<SharedSession, BookingError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or(BookingError::SessionNotFound)
    }

    /// Opens a new session and refreshes the availability calendar.
    pub async fn open(&self) -> Result<OpenSessionResponse, BookingError> {
        let id = Uuid::new_v4();
        {
            let mut sessions = self.sessions.lock().await;
            if sessions.len() >= self.max_open_sessions {
                // Reclaim finished sessions before refusing. A session
                // whose lock is held is mid-request and stays.
                sessions.retain(|_, session| match session.try_lock() {
                    Ok(session) => !session.state().is_terminal(),
                    Err(_) => true,
                });
            }
            if sessions.len() >= self.max_open_sessions {
                warn!(open = sessions.len(), "session capacity reached");
                return Err(BookingError::Capacity);
            }
            sessions.insert(id, Arc::new(Mutex::new(BookingSession::new(id))));
        }
        info!(session_id = %id, "booking session opened");

        // A failed refresh leaves an empty calendar, not a failed open.
        if let Err(err) = self.directory.refresh().await {
            warn!(session_id = %id, "availability refresh failed: {}", err);
        }
        let available_dates = self.directory.available_dates().await.into_iter().collect();

        let session = self.session(id).await?;
        let view = session.lock().await.view(&self.currency);
        Ok(OpenSessionResponse {
            session: view,
            available_dates,
        })
    }

    /// Snapshot of one session for polling.
    pub async fn session_view(&self, id: Uuid) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;
        let view = session.lock().await.view(&self.currency);
        Ok(view)
    }

    /// Chooses a date and fetches its slots live from the backend. A
    /// failed fetch keeps the date chosen; selecting it again retries.
    pub async fn select_date(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;

        self.directory
            .validate_selectable(date)
            .await
            .map_err(date_rejection)?;

        let attempt = {
            let mut locked = session.lock().await;
            locked.select_date(date)?;
            locked.begin_submission()?;
            locked.attempt()
        };

        let fetched = self.directory.slots_for_date(date).await;

        let mut locked = session.lock().await;
        if locked.attempt() != attempt {
            debug!(session_id = %id, "dropping stale slot fetch");
            return Err(stale(&locked));
        }
        match fetched {
            Ok(slots) => {
                info!(session_id = %id, date = %date, slots = slots.len(), "slots fetched for date");
                locked.record_slots(slots);
            }
            Err(err) => {
                warn!(session_id = %id, date = %date, "slot fetch failed: {}", err);
                locked.record_slot_fetch_failure(
                    "Could not load times for this date. Select it again to retry.",
                );
            }
        }
        locked.end_submission();
        Ok(locked.view(&self.currency))
    }

    /// Chooses a slot out of the list fetched for the selected date. A
    /// pure client-side intent; nothing is held upstream.
    pub async fn select_slot(&self, id: Uuid, slot_id: &str) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;
        let mut locked = session.lock().await;
        locked.select_slot(slot_id)?;
        info!(session_id = %id, slot_id, "slot selected");
        Ok(locked.view(&self.currency))
    }

    /// Submits the contact step: creates the booking, then requests the
    /// payment intent for paid slots. A resubmission after an intent
    /// failure resumes from the booking that already exists rather than
    /// creating a second one.
    pub async fn submit_contact(
        &self,
        id: Uuid,
        form: ContactForm,
    ) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;

        let (attempt, stage) = {
            let mut locked = session.lock().await;
            if locked.is_submitting() {
                return Err(BookingError::SubmissionInFlight);
            }
            let stage = match locked.state().clone() {
                SessionState::SlotSelected { slot } => {
                    if slot.requires_payment && self.payments.is_none() {
                        return Err(BookingError::PaymentDisabled);
                    }
                    let validated = match form.validate() {
                        Ok(validated) => validated,
                        Err(errors) => {
                            locked.record_field_errors(errors.clone());
                            return Err(BookingError::Validation(errors));
                        }
                    };
                    locked.clear_field_errors();
                    let request = BookingRequest {
                        slot_id: slot.id.clone(),
                        communication_method: validated.communication_method,
                        lead: validated.lead,
                        notes: validated.notes,
                    };
                    ContactStage::Create { slot, request }
                }
                SessionState::ContactCaptured { slot, booking } => {
                    if slot.requires_payment && self.payments.is_none() {
                        return Err(BookingError::PaymentDisabled);
                    }
                    ContactStage::Resume { slot, booking }
                }
                state => {
                    return Err(BookingError::InvalidAction {
                        state: state.name(),
                        action: "submit contact details",
                    });
                }
            };
            locked.begin_submission()?;
            (locked.attempt(), stage)
        };

        match stage {
            ContactStage::Create { slot, request } => {
                let created = self.scheduling.create_booking(request).await;

                let mut locked = session.lock().await;
                if locked.attempt() != attempt {
                    debug!(session_id = %id, "dropping stale booking result");
                    return Err(stale(&locked));
                }
                match created {
                    Ok(BookingAttempt::Created(booking)) => {
                        info!(session_id = %id, booking_id = booking.id, "booking created");
                        locked.booking_created(booking.clone()).map_err(internal)?;
                        if !slot.requires_payment {
                            locked.confirmed(booking).map_err(internal)?;
                            locked.end_submission();
                            info!(session_id = %id, "booking confirmed without payment");
                            return Ok(locked.view(&self.currency));
                        }
                        drop(locked);
                        self.request_intent(id, &session, attempt, &booking, &slot)
                            .await
                    }
                    Ok(BookingAttempt::SlotTaken { message }) => {
                        info!(session_id = %id, "slot contention: {}", message);
                        locked
                            .booking_rejected(SLOT_TAKEN_MESSAGE)
                            .map_err(internal)?;
                        locked.end_submission();
                        Err(BookingError::SlotTaken)
                    }
                    Err(err) if is_malformed_response(&err) => {
                        error!(session_id = %id, "unusable booking response: {}", err);
                        locked
                            .fail("The booking could not be completed. Start over.")
                            .map_err(internal)?;
                        locked.end_submission();
                        Err(BookingError::Scheduling(err.to_string()))
                    }
                    Err(err) => {
                        warn!(session_id = %id, "booking creation failed: {}", err);
                        locked
                            .booking_rejected("Could not create the booking. Try again.")
                            .map_err(internal)?;
                        locked.end_submission();
                        Err(BookingError::Scheduling(err.to_string()))
                    }
                }
            }
            ContactStage::Resume { slot, booking } => {
                debug!(session_id = %id, booking_id = booking.id, "resuming payment setup for existing booking");
                self.request_intent(id, &session, attempt, &booking, &slot)
                    .await
            }
        }
    }

    /// Requests a payment intent for a created booking. Runs with the
    /// submission flag already set; clears it once the outcome lands.
    async fn request_intent(
        &self,
        id: Uuid,
        session: &SharedSession,
        attempt: u64,
        booking: &Booking,
        slot: &Slot,
    ) -> Result<SessionView, BookingError> {
        let Some(provider) = self.payments.clone() else {
            let mut locked = session.lock().await;
            if locked.attempt() == attempt {
                locked.end_submission();
            }
            return Err(BookingError::PaymentDisabled);
        };

        let amount = booking
            .payment_amount_cents
            .or(slot.payment_amount_cents)
            .unwrap_or(DEFAULT_CONSULTATION_FEE_CENTS);

        let requested = provider
            .create_intent(booking.id, amount, &self.currency)
            .await;

        let mut locked = session.lock().await;
        if locked.attempt() != attempt {
            debug!(session_id = %id, "dropping stale intent result");
            return Err(stale(&locked));
        }
        match requested {
            Ok(intent) => {
                info!(
                    session_id = %id,
                    booking_id = booking.id,
                    amount_cents = amount,
                    "payment intent created"
                );
                locked.intent_created(intent).map_err(internal)?;
                locked.end_submission();
                Ok(locked.view(&self.currency))
            }
            Err(err) => {
                warn!(session_id = %id, booking_id = booking.id, "intent request failed: {}", err);
                locked
                    .intent_failed("Could not start the payment step. Submit again to retry.")
                    .map_err(internal)?;
                locked.end_submission();
                Err(BookingError::Payment(err.to_string()))
            }
        }
    }

    /// Submits the payment step: confirms the charge with the provider,
    /// then confirms the booking upstream. A decline keeps the same intent
    /// for a retry; a successful charge is never charged again even when
    /// the confirmation call fails.
    pub async fn submit_payment(
        &self,
        id: Uuid,
        request: PaymentRequest,
    ) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;

        let payment_method = request.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(BookingError::Validation(vec![FieldError::new(
                "payment_method",
                "Payment details are missing.",
            )]));
        }

        let (attempt, intent) = {
            let mut locked = session.lock().await;
            if locked.is_submitting() {
                return Err(BookingError::SubmissionInFlight);
            }
            if locked.charge_awaiting_confirmation() {
                return Err(BookingError::ConfirmationPending);
            }
            let intent = match locked.state() {
                SessionState::PaymentPending { intent, .. } => intent.clone(),
                state => {
                    return Err(BookingError::InvalidAction {
                        state: state.name(),
                        action: "submit payment",
                    });
                }
            };
            locked.begin_submission()?;
            (locked.attempt(), intent)
        };

        let Some(provider) = self.payments.clone() else {
            let mut locked = session.lock().await;
            if locked.attempt() == attempt {
                locked.end_submission();
            }
            return Err(BookingError::PaymentDisabled);
        };

        let card = CardDetails { payment_method };
        let charged = provider.confirm_charge(&intent, &card).await;

        let intent_id = match charged {
            Ok(ChargeOutcome::Succeeded { intent_id }) => intent_id,
            Ok(ChargeOutcome::Declined { message }) => {
                let mut locked = session.lock().await;
                if locked.attempt() != attempt {
                    debug!(session_id = %id, "dropping stale decline");
                    return Err(stale(&locked));
                }
                info!(session_id = %id, "charge declined: {}", message);
                locked.charge_declined(&message).map_err(internal)?;
                locked.end_submission();
                return Err(BookingError::PaymentDeclined { message });
            }
            Err(err) => {
                let mut locked = session.lock().await;
                if locked.attempt() != attempt {
                    debug!(session_id = %id, "dropping stale charge failure");
                    return Err(stale(&locked));
                }
                warn!(session_id = %id, "charge attempt failed: {}", err);
                locked
                    .payment_failed("Payment could not be processed. Try again.")
                    .map_err(internal)?;
                locked.end_submission();
                return Err(BookingError::Payment(err.to_string()));
            }
        };

        // The charge went through. Check the attempt still stands before
        // confirming upstream; a reset in between abandons the attempt.
        {
            let locked = session.lock().await;
            if locked.attempt() != attempt {
                warn!(session_id = %id, intent_id = %intent_id, "charge succeeded for a reset attempt, not confirming");
                return Err(stale(&locked));
            }
        }

        let confirmed = self.scheduling.confirm_payment(&intent_id).await;

        let mut locked = session.lock().await;
        if locked.attempt() != attempt {
            debug!(session_id = %id, "dropping stale confirmation");
            return Err(stale(&locked));
        }
        match confirmed {
            Ok(booking) => {
                info!(session_id = %id, booking_id = booking.id, "booking confirmed");
                locked.confirmed(booking).map_err(internal)?;
                locked.end_submission();
                Ok(locked.view(&self.currency))
            }
            Err(err) => {
                error!(session_id = %id, intent_id = %intent_id, "confirmation failed after successful charge: {}", err);
                locked.confirmation_pending().map_err(internal)?;
                locked.end_submission();
                Err(BookingError::ConfirmationPending)
            }
        }
    }

    /// Returns the session to browsing for a fresh attempt. Never waits on
    /// an in-flight submission; its late outcome is dropped by the bumped
    /// attempt counter.
    pub async fn reset(&self, id: Uuid) -> Result<SessionView, BookingError> {
        let session = self.session(id).await?;
        let mut locked = session.lock().await;
        locked.reset();
        info!(session_id = %id, attempt = locked.attempt(), "session reset");
        Ok(locked.view(&self.currency))
    }
}

/// An unparseable response marks the attempt failed; transport errors stay
/// retryable because the backend's answer is simply unknown.
fn is_malformed_response(err: &BoxedError) -> bool {
    matches!(
        err.0.downcast_ref::<SchedulingError>(),
        Some(SchedulingError::ParseError(_))
    )
}

fn date_rejection(err: SchedulingError) -> BookingError {
    match err {
        SchedulingError::DateInPast
        | SchedulingError::DateBeyondHorizon(_)
        | SchedulingError::DateUnavailable => {
            BookingError::Validation(vec![FieldError::new("date", &err.to_string())])
        }
        other => BookingError::Scheduling(other.to_string()),
    }
}

fn stale(session: &BookingSession) -> BookingError {
    BookingError::InvalidAction {
        state: session.state().name(),
        action: "complete a submission after a reset",
    }
}

fn internal(err: TransitionError) -> BookingError {
    BookingError::Internal(err.to_string())
}
