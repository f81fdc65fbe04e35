#[cfg(test)]
mod tests {
    use crate::directory::SlotDirectory;
    use crate::handlers::{list_dates_handler, list_slots_handler, SchedulingState};
    use crate::models::{Slot, SlotsForDateQuery};
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use consultify_common::services::{
        Booking, BookingAttempt, BookingRequest, BoxFuture, BoxedError, SchedulingService,
    };
    use consultify_config::{AppConfig, ServerConfig};
    use std::sync::Arc;

    struct FixedSlots(Vec<Slot>);

    impl SchedulingService for FixedSlots {
        type Error = BoxedError;

        fn list_available_slots(&self) -> BoxFuture<'_, Vec<Slot>, BoxedError> {
            let slots = self.0.clone();
            Box::pin(async move { Ok(slots) })
        }

        fn list_slots_for_date(&self, _date: NaiveDate) -> BoxFuture<'_, Vec<Slot>, BoxedError> {
            self.list_available_slots()
        }

        fn create_booking(
            &self,
            _request: BookingRequest,
        ) -> BoxFuture<'_, BookingAttempt, BoxedError> {
            Box::pin(async move { Err(BoxedError(Box::new(std::io::Error::other("unused")))) })
        }

        fn confirm_payment(&self, _payment_intent_id: &str) -> BoxFuture<'_, Booking, BoxedError> {
            Box::pin(async move { Err(BoxedError(Box::new(std::io::Error::other("unused")))) })
        }
    }

    fn test_config(use_scheduling: bool) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
            },
            use_scheduling,
            use_payment: false,
            scheduling: None,
            stripe: None,
            booking: None,
        })
    }

    fn state_with_slots(use_scheduling: bool, slots: Vec<Slot>) -> Arc<SchedulingState> {
        let service: Arc<dyn SchedulingService<Error = BoxedError>> =
            Arc::new(FixedSlots(slots));
        Arc::new(SchedulingState {
            config: test_config(use_scheduling),
            directory: Arc::new(SlotDirectory::new(service, Tz::UTC, 60)),
        })
    }

    fn slot_on(date: NaiveDate, hour: u32) -> Slot {
        Slot {
            id: format!("slot-{}-{}", date, hour),
            start_time: Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap()),
            duration_minutes: 30,
            requires_payment: false,
            payment_amount_cents: None,
        }
    }

    #[tokio::test]
    async fn test_list_dates_returns_refreshed_directory_contents() {
        let date = (Utc::now() + Duration::days(2)).date_naive();
        let state = state_with_slots(true, vec![slot_on(date, 9), slot_on(date, 14)]);

        let response = list_dates_handler(State(state)).await.unwrap();

        assert_eq!(response.0.dates, vec![date]);
        assert_eq!(response.0.timezone, "UTC");
        assert_eq!(response.0.horizon_days, 60);
        assert!(response.0.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn test_list_dates_rejected_when_scheduling_disabled() {
        let state = state_with_slots(false, Vec::new());

        let result = list_dates_handler(State(state)).await;

        let (status, _) = result.err().expect("disabled service should be rejected");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_slots_returns_slots_for_the_date() {
        let date = (Utc::now() + Duration::days(2)).date_naive();
        let state = state_with_slots(true, vec![slot_on(date, 14), slot_on(date, 9)]);

        let response = list_slots_handler(State(state), Query(SlotsForDateQuery { date }))
            .await
            .unwrap();

        assert_eq!(response.0.date, date);
        let hours: Vec<_> = response
            .0
            .slots
            .iter()
            .map(|s| s.start_time.with_timezone(&Utc).format("%H").to_string())
            .collect();
        assert_eq!(hours, vec!["09", "14"], "Slots should be sorted by start");
    }

    #[tokio::test]
    async fn test_list_slots_rejects_past_dates() {
        let state = state_with_slots(true, Vec::new());
        let yesterday = (Utc::now() - Duration::days(1)).date_naive();

        let result = list_slots_handler(State(state), Query(SlotsForDateQuery { date: yesterday }))
            .await;

        let response = result.err().expect("past date should be rejected");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_slots_allows_empty_result() {
        let state = state_with_slots(true, Vec::new());
        let date = (Utc::now() + Duration::days(2)).date_naive();

        let response = list_slots_handler(State(state), Query(SlotsForDateQuery { date }))
            .await
            .unwrap();

        assert!(response.0.slots.is_empty(), "Empty day is a valid answer");
    }
}
