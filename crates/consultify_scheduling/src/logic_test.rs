#[cfg(test)]
mod tests {
    use crate::error::SchedulingError;
    use crate::logic::{
        derive_available_dates, filter_bookable_slots, slots_on_date, validate_date_in_window,
        validate_selectable_date,
    };
    use crate::models::Slot;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use std::collections::BTreeSet;

    fn free_slot(id: &str, start_time: DateTime<Utc>) -> Slot {
        Slot {
            id: id.to_string(),
            start_time,
            duration_minutes: 30,
            requires_payment: false,
            payment_amount_cents: None,
        }
    }

    fn paid_slot(id: &str, start_time: DateTime<Utc>, amount_cents: i64) -> Slot {
        Slot {
            id: id.to_string(),
            start_time,
            duration_minutes: 30,
            requires_payment: true,
            payment_amount_cents: Some(amount_cents),
        }
    }

    #[test]
    fn test_filter_keeps_only_slots_inside_the_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let slots = vec![
            free_slot("past", now - Duration::hours(3)),
            free_slot("soon", now + Duration::hours(2)),
            free_slot("at-horizon", now + Duration::days(60)),
            free_slot("beyond", now + Duration::days(61)),
        ];

        let kept = filter_bookable_slots(slots, now, 60);
        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(
            ids,
            vec!["soon", "at-horizon"],
            "Only future slots within the horizon should survive"
        );
    }

    #[test]
    fn test_filter_treats_horizon_boundary_as_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let slots = vec![free_slot("edge", now + Duration::days(60))];

        let kept = filter_bookable_slots(slots, now, 60);
        assert_eq!(kept.len(), 1, "A slot exactly at the horizon is bookable");
    }

    #[test]
    fn test_filter_drops_slots_with_inconsistent_payment_fields() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let start = now + Duration::days(1);

        let paid_without_amount = Slot {
            id: "paid-no-amount".to_string(),
            start_time: start,
            duration_minutes: 30,
            requires_payment: true,
            payment_amount_cents: None,
        };
        let free_with_amount = Slot {
            id: "free-with-amount".to_string(),
            start_time: start,
            duration_minutes: 30,
            requires_payment: false,
            payment_amount_cents: Some(1000),
        };
        let slots = vec![
            paid_without_amount,
            free_with_amount,
            paid_slot("paid-ok", start, 1000),
            free_slot("free-ok", start),
        ];

        let kept = filter_bookable_slots(slots, now, 60);
        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["paid-ok", "free-ok"]);
    }

    #[test]
    fn test_derive_available_dates_buckets_by_local_date() {
        let slots = vec![
            free_slot("a", Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap()),
            free_slot("b", Utc.with_ymd_and_hms(2024, 3, 20, 14, 0, 0).unwrap()),
            free_slot("c", Utc.with_ymd_and_hms(2024, 3, 22, 10, 0, 0).unwrap()),
        ];

        let dates = derive_available_dates(&slots, Tz::UTC);

        let expected: BTreeSet<NaiveDate> = [
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 22).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_derive_available_dates_respects_timezone_boundary() {
        // 23:30 UTC is already the next day in Zurich (UTC+1 in March).
        let slots = vec![free_slot(
            "late",
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap(),
        )];

        let dates = derive_available_dates(&slots, Tz::Europe__Zurich);

        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()));
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn test_slots_on_date_filters_neighbouring_dates() {
        let slots = vec![
            free_slot("wanted", Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap()),
            free_slot(
                "next-day",
                Utc.with_ymd_and_hms(2024, 3, 21, 9, 0, 0).unwrap(),
            ),
        ];

        let on_date = slots_on_date(
            slots,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            Tz::UTC,
        );

        assert_eq!(on_date.len(), 1);
        assert_eq!(on_date[0].id, "wanted");
    }

    #[test]
    fn test_validate_date_in_window_rejects_past_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();

        let result = validate_date_in_window(yesterday, today, 60);
        assert!(matches!(result, Err(SchedulingError::DateInPast)));
    }

    #[test]
    fn test_validate_date_in_window_accepts_today_and_horizon_edge() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert!(validate_date_in_window(today, today, 60).is_ok());
        assert!(validate_date_in_window(today + Duration::days(60), today, 60).is_ok());
    }

    #[test]
    fn test_validate_date_in_window_rejects_dates_beyond_horizon() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let too_far = today + Duration::days(61);

        let result = validate_date_in_window(too_far, today, 60);
        assert!(matches!(
            result,
            Err(SchedulingError::DateBeyondHorizon(60))
        ));
    }

    #[test]
    fn test_validate_selectable_date_requires_membership_in_available_set() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let listed = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let unlisted = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let available: BTreeSet<NaiveDate> = [listed].into_iter().collect();

        assert!(validate_selectable_date(listed, today, 60, &available).is_ok());
        assert!(matches!(
            validate_selectable_date(unlisted, today, 60, &available),
            Err(SchedulingError::DateUnavailable)
        ));
    }

    #[test]
    fn test_validate_selectable_date_window_check_runs_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        // Membership alone is not enough for a past date.
        let available: BTreeSet<NaiveDate> = [past].into_iter().collect();

        assert!(matches!(
            validate_selectable_date(past, today, 60, &available),
            Err(SchedulingError::DateInPast)
        ));
    }
}
