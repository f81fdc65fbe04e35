// --- File: crates/consultify_scheduling/src/logic.rs ---
//! Pure slot-window logic: horizon filtering, date-set derivation and
//! date validation. Everything here takes its clock as a parameter so the
//! behavior is deterministic under test.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::SchedulingError;
use crate::models::Slot;

/// Keeps the slots a user may actually book: starting after `now`, within
/// the horizon, and with consistent payment fields (`payment_amount_cents`
/// present iff `requires_payment`). Inconsistent slots are dropped with a
/// warning rather than failing the whole listing.
pub fn filter_bookable_slots(slots: Vec<Slot>, now: DateTime<Utc>, horizon_days: i64) -> Vec<Slot> {
    let horizon_end = now + Duration::days(horizon_days);
    slots
        .into_iter()
        .filter(|slot| {
            if slot.requires_payment != slot.payment_amount_cents.is_some() {
                warn!(slot_id = %slot.id, "dropping slot with inconsistent payment fields");
                return false;
            }
            slot.start_time > now && slot.start_time <= horizon_end
        })
        .collect()
}

/// Derives the set of calendar dates with at least one slot, bucketing each
/// slot's start time into the given timezone.
pub fn derive_available_dates(slots: &[Slot], timezone: Tz) -> BTreeSet<NaiveDate> {
    slots
        .iter()
        .map(|slot| slot.start_time.with_timezone(&timezone).date_naive())
        .collect()
}

/// Keeps only the slots whose local date matches `date`. The per-date query
/// is upstream-scoped already; this guards against a backend answering with
/// neighbouring dates across timezone boundaries.
pub fn slots_on_date(slots: Vec<Slot>, date: NaiveDate, timezone: Tz) -> Vec<Slot> {
    slots
        .into_iter()
        .filter(|slot| slot.start_time.with_timezone(&timezone).date_naive() == date)
        .collect()
}

/// Rejects dates outside the bookable window (past or beyond the horizon).
pub fn validate_date_in_window(
    date: NaiveDate,
    today: NaiveDate,
    horizon_days: i64,
) -> Result<(), SchedulingError> {
    if date < today {
        return Err(SchedulingError::DateInPast);
    }
    if date > today + Duration::days(horizon_days) {
        return Err(SchedulingError::DateBeyondHorizon(horizon_days));
    }
    Ok(())
}

/// Full selectability check for the calendar: in the window AND present in
/// the advisory availability set. The calendar disables everything else.
pub fn validate_selectable_date(
    date: NaiveDate,
    today: NaiveDate,
    horizon_days: i64,
    available: &BTreeSet<NaiveDate>,
) -> Result<(), SchedulingError> {
    validate_date_in_window(date, today, horizon_days)?;
    if !available.contains(&date) {
        return Err(SchedulingError::DateUnavailable);
    }
    Ok(())
}
