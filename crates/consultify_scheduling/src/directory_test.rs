#[cfg(test)]
mod tests {
    use crate::directory::SlotDirectory;
    use crate::error::SchedulingError;
    use crate::models::Slot;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use consultify_common::services::{
        Booking, BookingAttempt, BookingRequest, BoxFuture, BoxedError, SchedulingService,
    };
    use consultify_config::SchedulingConfig;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fake availability backend with a scripted slot listing. Booking
    /// operations are not exercised by the directory.
    struct FakeBackend {
        slots: Mutex<Vec<Slot>>,
        fail_listing: AtomicBool,
    }

    impl FakeBackend {
        fn with_slots(slots: Vec<Slot>) -> Arc<Self> {
            Arc::new(Self {
                slots: Mutex::new(slots),
                fail_listing: AtomicBool::new(false),
            })
        }
    }

    impl SchedulingService for FakeBackend {
        type Error = BoxedError;

        fn list_available_slots(&self) -> BoxFuture<'_, Vec<Slot>, BoxedError> {
            let result = if self.fail_listing.load(Ordering::SeqCst) {
                Err(BoxedError(Box::new(std::io::Error::other("backend down"))))
            } else {
                Ok(self.slots.lock().unwrap().clone())
            };
            Box::pin(async move { result })
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

    fn free_slot(id: &str, start_time: chrono::DateTime<Utc>) -> Slot {
        Slot {
            id: id.to_string(),
            start_time,
            duration_minutes: 30,
            requires_payment: false,
            payment_amount_cents: None,
        }
    }

    fn directory_over(backend: Arc<FakeBackend>) -> SlotDirectory {
        let service: Arc<dyn SchedulingService<Error = BoxedError>> = backend;
        SlotDirectory::new(service, Tz::UTC, 60)
    }

    #[tokio::test]
    async fn test_refresh_populates_the_date_set() {
        let date = (Utc::now() + Duration::days(2)).date_naive();
        let backend = FakeBackend::with_slots(vec![
            free_slot("a", Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap())),
            free_slot("b", Utc.from_utc_datetime(&date.and_hms_opt(14, 0, 0).unwrap())),
            free_slot(
                "c",
                Utc.from_utc_datetime(&(date + Duration::days(3)).and_hms_opt(10, 0, 0).unwrap()),
            ),
        ]);
        let directory = directory_over(backend);

        let count = directory.refresh().await.unwrap();

        assert_eq!(count, 3);
        let dates = directory.available_dates().await;
        assert_eq!(dates.len(), 2, "Two distinct dates expected");
        assert!(directory.refreshed_at().await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_the_previous_snapshot() {
        let now = Utc::now();
        let backend = FakeBackend::with_slots(vec![free_slot("a", now + Duration::days(2))]);
        let directory = directory_over(backend.clone());

        directory.refresh().await.unwrap();
        assert!(!directory.available_dates().await.is_empty());

        backend.fail_listing.store(true, Ordering::SeqCst);
        let result = directory.refresh().await;

        assert!(matches!(result, Err(SchedulingError::Unavailable(_))));
        assert!(
            directory.available_dates().await.is_empty(),
            "Stale dates must not survive a failed refresh"
        );
        assert!(directory.refreshed_at().await.is_none());
    }

    #[tokio::test]
    async fn test_slots_for_date_sorts_and_scopes_to_the_date() {
        let date = (Utc::now() + Duration::days(3)).date_naive();
        let morning = Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap());
        let afternoon = Utc.from_utc_datetime(&date.and_hms_opt(14, 0, 0).unwrap());
        let other_day = Utc.from_utc_datetime(
            &(date + Duration::days(1)).and_hms_opt(9, 0, 0).unwrap(),
        );

        // Listed out of order, with a neighbouring date mixed in.
        let backend = FakeBackend::with_slots(vec![
            free_slot("afternoon", afternoon),
            free_slot("other-day", other_day),
            free_slot("morning", morning),
        ]);
        let directory = directory_over(backend);

        let slots = directory.slots_for_date(date).await.unwrap();
        let ids: Vec<&str> = slots.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["morning", "afternoon"]);
    }

    #[tokio::test]
    async fn test_every_listed_slot_is_reachable_through_its_date() {
        let base = (Utc::now() + Duration::days(2)).date_naive();
        let slots: Vec<Slot> = (0..6i64)
            .map(|i| {
                let day = base + Duration::days(i / 2);
                let hour = 9 + (i % 2) as u32 * 5;
                free_slot(
                    &format!("s{i}"),
                    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap()),
                )
            })
            .collect();
        let backend = FakeBackend::with_slots(slots.clone());
        let directory = directory_over(backend);
        directory.refresh().await.unwrap();

        let dates = directory.available_dates().await;
        for slot in &slots {
            let date = slot.start_time.date_naive();
            assert!(dates.contains(&date), "date of {} missing", slot.id);
            let listed = directory.slots_for_date(date).await.unwrap();
            assert!(
                listed.iter().any(|s| s.id == slot.id),
                "slot {} not reachable through {}",
                slot.id,
                date
            );
        }
    }

    #[tokio::test]
    async fn test_slots_for_date_propagates_backend_failure() {
        let backend = FakeBackend::with_slots(Vec::new());
        backend.fail_listing.store(true, Ordering::SeqCst);
        let directory = directory_over(backend);

        let date = (Utc::now() + Duration::days(3)).date_naive();
        let result = directory.slots_for_date(date).await;

        assert!(matches!(result, Err(SchedulingError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_validate_selectable_checks_the_snapshot() {
        let now = Utc::now();
        let listed_start = now + Duration::days(4);
        let backend = FakeBackend::with_slots(vec![free_slot("a", listed_start)]);
        let directory = directory_over(backend);
        directory.refresh().await.unwrap();

        let listed_date = listed_start.date_naive();
        let unlisted_date = (now + Duration::days(5)).date_naive();

        assert!(directory.validate_selectable(listed_date).await.is_ok());
        assert!(matches!(
            directory.validate_selectable(unlisted_date).await,
            Err(SchedulingError::DateUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_from_config_falls_back_to_utc_for_unknown_timezone() {
        let backend = FakeBackend::with_slots(Vec::new());
        let service: Arc<dyn SchedulingService<Error = BoxedError>> = backend;
        let config = SchedulingConfig {
            base_url: "http://localhost:9090".to_string(),
            timezone: Some("Not/AZone".to_string()),
            horizon_days: None,
        };

        let directory = SlotDirectory::from_config(service, &config);

        assert_eq!(directory.timezone(), Tz::UTC);
        assert_eq!(directory.horizon_days(), 60);
    }
}
