#[cfg(test)]
mod tests {
    use crate::logic::{derive_available_dates, filter_bookable_slots, validate_selectable_date};
    use crate::models::Slot;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn base_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    // Helper to build a slot at a minute offset from the fixed test clock
    fn slot_at(offset_minutes: i64, paid: bool) -> Slot {
        Slot {
            id: format!("slot-{}", offset_minutes),
            start_time: base_now() + Duration::minutes(offset_minutes),
            duration_minutes: 30,
            requires_payment: paid,
            payment_amount_cents: if paid { Some(1000) } else { None },
        }
    }

    proptest! {
        // Test that the filter never lets a slot escape the bookable window
        #[test]
        fn test_filtered_slots_always_inside_window(
            offsets in prop::collection::vec(-100_000i64..200_000i64, 0..20),
            horizon_days in 1..90i64,
        ) {
            let now = base_now();
            let slots: Vec<Slot> = offsets.iter().map(|&m| slot_at(m, m % 2 == 0)).collect();

            let kept = filter_bookable_slots(slots, now, horizon_days);

            for slot in &kept {
                prop_assert!(slot.start_time > now,
                    "Kept slot must start in the future: {:?}", slot.start_time);
                prop_assert!(slot.start_time <= now + Duration::days(horizon_days),
                    "Kept slot must start within the horizon: {:?}", slot.start_time);
            }
        }

        // Test that the derived date set covers exactly the slots' local dates
        #[test]
        fn test_derived_dates_match_slot_dates_exactly(
            offsets in prop::collection::vec(0i64..80_000i64, 0..20),
        ) {
            let timezone = Tz::Europe__Zurich;
            let slots: Vec<Slot> = offsets.iter().map(|&m| slot_at(m, false)).collect();

            let dates = derive_available_dates(&slots, timezone);

            let expected: BTreeSet<_> = slots
                .iter()
                .map(|s| s.start_time.with_timezone(&timezone).date_naive())
                .collect();
            prop_assert_eq!(dates, expected);
        }

        // Test that a date accepted as selectable is in the window and listed
        #[test]
        fn test_selectable_ok_implies_window_and_membership(
            day_offsets in prop::collection::vec(0i64..120, 0..15),
            candidate_offset in -30i64..150,
            horizon_days in 1..90i64,
        ) {
            let today = base_now().date_naive();
            let available: BTreeSet<_> = day_offsets
                .iter()
                .map(|&d| today + Duration::days(d))
                .collect();
            let candidate = today + Duration::days(candidate_offset);

            if validate_selectable_date(candidate, today, horizon_days, &available).is_ok() {
                prop_assert!(candidate >= today,
                    "Selectable date must not be in the past: {:?}", candidate);
                prop_assert!(candidate <= today + Duration::days(horizon_days),
                    "Selectable date must be within the horizon: {:?}", candidate);
                prop_assert!(available.contains(&candidate),
                    "Selectable date must be in the available set: {:?}", candidate);
            }
        }
    }
}
