#[cfg(test)]
mod tests {
    use crate::session::{BookingSession, SessionState};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use consultify_common::services::{
        Booking, BookingStatus, CommunicationMethod, LeadDetails, PaymentIntent, Slot,
    };
    use proptest::prelude::*;
    use uuid::Uuid;

    /// Every transition the orchestrator can drive, with small argument
    /// spaces so sequences actually reach the deep states.
    #[derive(Debug, Clone)]
    enum Action {
        SelectDate(u32),
        RecordSlots(Vec<u8>),
        RecordFetchFailure,
        SelectSlot(u8),
        BeginSubmission,
        EndSubmission,
        BookingCreated,
        BookingRejected,
        IntentCreated,
        IntentFailed,
        Confirmed,
        ChargeDeclined,
        PaymentFailed,
        ConfirmationPending,
        Cancel,
        Fail,
        Reset,
    }

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn slot(n: u8) -> Slot {
        let paid = n % 2 == 1;
        Slot {
            id: format!("slot-{n}"),
            start_time: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
                + Duration::hours(n as i64),
            duration_minutes: 30,
            requires_payment: paid,
            payment_amount_cents: paid.then_some(1000),
        }
    }

    /// A booking shaped to whatever slot the session currently holds, so
    /// `booking_created` and `confirmed` are reachable in random walks.
    fn booking_for(session: &BookingSession, status: BookingStatus) -> Booking {
        let (slot_id, paid, amount) = match session.state() {
            SessionState::SlotSelected { slot }
            | SessionState::ContactCaptured { slot, .. }
            | SessionState::PaymentPending { slot, .. } => (
                slot.id.clone(),
                slot.requires_payment,
                slot.payment_amount_cents,
            ),
            _ => ("slot-0".to_string(), false, None),
        };
        Booking {
            id: 1,
            slot_id,
            lead: LeadDetails {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                company: None,
            },
            communication_method: CommunicationMethod::Zoom,
            notes: None,
            status,
            requires_payment: paid,
            payment_amount_cents: amount,
            meeting_link: None,
        }
    }

    fn apply(session: &mut BookingSession, action: &Action) {
        match action {
            Action::SelectDate(offset) => {
                let _ = session.select_date(base_date() + Duration::days(*offset as i64));
            }
            Action::RecordSlots(ids) => {
                session.record_slots(ids.iter().map(|&n| slot(n)).collect());
            }
            Action::RecordFetchFailure => {
                session.record_slot_fetch_failure("Could not load times for this date.");
            }
            Action::SelectSlot(n) => {
                let _ = session.select_slot(&format!("slot-{n}"));
            }
            Action::BeginSubmission => {
                let _ = session.begin_submission();
            }
            Action::EndSubmission => session.end_submission(),
            Action::BookingCreated => {
                let booking = booking_for(session, BookingStatus::Pending);
                let _ = session.booking_created(booking);
            }
            Action::BookingRejected => {
                let _ = session.booking_rejected("Slot not available");
            }
            Action::IntentCreated => {
                let _ = session.intent_created(PaymentIntent {
                    client_secret: "pi_1_secret_t".to_string(),
                });
            }
            Action::IntentFailed => {
                let _ = session.intent_failed("Could not start the payment step.");
            }
            Action::Confirmed => {
                let booking = booking_for(session, BookingStatus::Confirmed);
                let _ = session.confirmed(booking);
            }
            Action::ChargeDeclined => {
                let _ = session.charge_declined("Your card was declined.");
            }
            Action::PaymentFailed => {
                let _ = session.payment_failed("Payment could not be processed.");
            }
            Action::ConfirmationPending => {
                let _ = session.confirmation_pending();
            }
            Action::Cancel => {
                let _ = session.cancel();
            }
            Action::Fail => {
                let _ = session.fail("backend fault");
            }
            Action::Reset => session.reset(),
        }
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0u32..70).prop_map(Action::SelectDate),
            prop::collection::vec(0u8..4, 0..4).prop_map(Action::RecordSlots),
            Just(Action::RecordFetchFailure),
            (0u8..4).prop_map(Action::SelectSlot),
            Just(Action::BeginSubmission),
            Just(Action::EndSubmission),
            Just(Action::BookingCreated),
            Just(Action::BookingRejected),
            Just(Action::IntentCreated),
            Just(Action::IntentFailed),
            Just(Action::Confirmed),
            Just(Action::ChargeDeclined),
            Just(Action::PaymentFailed),
            Just(Action::ConfirmationPending),
            Just(Action::Cancel),
            Just(Action::Fail),
            Just(Action::Reset),
        ]
    }

    fn action_sequence() -> impl Strategy<Value = Vec<Action>> {
        prop::collection::vec(action_strategy(), 0..40)
    }

    proptest! {
        // Test that a terminal state refuses every transition and survives
        // the refusals unchanged
        #[test]
        fn test_terminal_states_admit_only_reset(actions in action_sequence()) {
            let mut session = BookingSession::new(Uuid::new_v4());
            for action in &actions {
                apply(&mut session, action);
            }
            prop_assume!(session.state().is_terminal());

            let before = session.state().clone();
            prop_assert!(session.select_date(base_date()).is_err());
            prop_assert!(session.select_slot("slot-0").is_err());
            prop_assert!(session.begin_submission().is_err());
            prop_assert!(session.booking_rejected("late").is_err());
            prop_assert!(session.intent_failed("late").is_err());
            prop_assert!(session.charge_declined("late").is_err());
            prop_assert!(session.payment_failed("late").is_err());
            prop_assert!(session.confirmation_pending().is_err());
            prop_assert!(session.cancel().is_err());
            prop_assert!(session.fail("late").is_err());
            let booking = booking_for(&session, BookingStatus::Confirmed);
            prop_assert!(session.booking_created(booking.clone()).is_err());
            prop_assert!(session.confirmed(booking).is_err());
            prop_assert_eq!(session.state(), &before);
        }

        // Test that reset lands in a clean browsing state from anywhere
        #[test]
        fn test_reset_always_yields_a_clean_browsing_state(actions in action_sequence()) {
            let mut session = BookingSession::new(Uuid::new_v4());
            for action in &actions {
                apply(&mut session, action);
            }
            let attempt_before = session.attempt();

            session.reset();

            prop_assert_eq!(session.state(), &SessionState::Browsing);
            prop_assert_eq!(session.attempt(), attempt_before + 1);
            prop_assert!(session.selected_date().is_none());
            prop_assert!(session.slots().is_empty());
            prop_assert!(session.error().is_none());
            prop_assert!(session.field_errors().is_empty());
            prop_assert!(!session.is_submitting());
        }

        // Test that the attempt counter counts resets exactly and never
        // moves otherwise
        #[test]
        fn test_attempt_counter_counts_resets_exactly(actions in action_sequence()) {
            let mut session = BookingSession::new(Uuid::new_v4());
            let mut previous = session.attempt();
            for action in &actions {
                apply(&mut session, action);
                let current = session.attempt();
                if matches!(action, Action::Reset) {
                    prop_assert_eq!(current, previous + 1, "Reset must bump by one");
                } else {
                    prop_assert_eq!(current, previous, "Only reset may move the counter");
                }
                previous = current;
            }
            let resets = actions.iter().filter(|a| matches!(a, Action::Reset)).count() as u64;
            prop_assert_eq!(session.attempt(), resets);
        }

        // Test that a successful charge stays latched until the attempt
        // ends in a terminal state or a reset
        #[test]
        fn test_charge_latch_holds_until_reset_or_terminal(actions in action_sequence()) {
            let mut session = BookingSession::new(Uuid::new_v4());
            let mut latched = false;
            let mut attempt = session.attempt();
            for action in &actions {
                apply(&mut session, action);
                let now_latched = session.charge_awaiting_confirmation();
                if latched && session.attempt() == attempt && !session.state().is_terminal() {
                    prop_assert!(now_latched, "Latch dropped by {:?}", action);
                }
                latched = now_latched;
                attempt = session.attempt();
            }
        }

        // Test that the view is renderable for every reachable state
        #[test]
        fn test_view_reflects_the_machine(actions in action_sequence()) {
            let mut session = BookingSession::new(Uuid::new_v4());
            for action in &actions {
                apply(&mut session, action);
            }

            let view = session.view("usd");

            prop_assert_eq!(view.step, session.state().step());
            prop_assert_eq!(view.is_submitting, session.is_submitting());
            prop_assert_eq!(view.selected_date, session.selected_date());
            let carries_booking = matches!(
                session.state(),
                SessionState::ContactCaptured { .. }
                    | SessionState::PaymentPending { .. }
                    | SessionState::Confirmed { .. }
            );
            prop_assert_eq!(view.booking.is_some(), carries_booking);
            if view.payment.required {
                prop_assert!(view.payment.amount_cents.is_some(),
                    "A required payment must carry its amount");
            }
        }
    }
}
