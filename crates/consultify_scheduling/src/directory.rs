// --- File: crates/consultify_scheduling/src/directory.rs ---
//! The slot directory: an advisory cache of which dates have availability.
//!
//! The directory never holds a write lock on availability. The date set is
//! replaced wholesale on refresh (never patched incrementally), and per-date
//! listings always go upstream so slot freshness is decided there.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use consultify_common::services::{BoxedError, SchedulingService};
use consultify_config::SchedulingConfig;

use crate::error::SchedulingError;
use crate::logic::{
    derive_available_dates, filter_bookable_slots, slots_on_date, validate_date_in_window,
    validate_selectable_date,
};
use crate::models::Slot;

#[derive(Default)]
struct DirectoryCache {
    dates: BTreeSet<NaiveDate>,
    slot_count: usize,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Shared read-only availability snapshot plus live per-date queries.
pub struct SlotDirectory {
    service: Arc<dyn SchedulingService<Error = BoxedError>>,
    timezone: Tz,
    horizon_days: i64,
    cache: RwLock<DirectoryCache>,
}

impl SlotDirectory {
    pub fn new(
        service: Arc<dyn SchedulingService<Error = BoxedError>>,
        timezone: Tz,
        horizon_days: i64,
    ) -> Self {
        Self {
            service,
            timezone,
            horizon_days,
            cache: RwLock::new(DirectoryCache::default()),
        }
    }

    /// Builds a directory from the scheduling config section. An unknown
    /// timezone name falls back to UTC with a warning.
    pub fn from_config(
        service: Arc<dyn SchedulingService<Error = BoxedError>>,
        config: &SchedulingConfig,
    ) -> Self {
        let timezone = match config.timezone.as_deref() {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(timezone = name, "unknown timezone in config, using UTC");
                    Tz::UTC
                }
            },
            None => Tz::UTC,
        };
        Self::new(service, timezone, config.horizon_days())
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn horizon_days(&self) -> i64 {
        self.horizon_days
    }

    /// Today in the directory's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Replaces the availability snapshot wholesale from the upstream
    /// listing. On failure the snapshot is cleared: stale availability must
    /// not outlive a failed refresh, and an empty calendar is the designed
    /// "no slots" state.
    pub async fn refresh(&self) -> Result<usize, SchedulingError> {
        let result = self.service.list_available_slots().await;
        let mut cache = self.cache.write().await;
        match result {
            Ok(slots) => {
                let bookable = filter_bookable_slots(slots, Utc::now(), self.horizon_days);
                cache.dates = derive_available_dates(&bookable, self.timezone);
                cache.slot_count = bookable.len();
                cache.refreshed_at = Some(Utc::now());
                info!(
                    slots = cache.slot_count,
                    dates = cache.dates.len(),
                    "slot directory refreshed"
                );
                Ok(cache.slot_count)
            }
            Err(err) => {
                *cache = DirectoryCache::default();
                warn!(error = %err, "slot directory refresh failed, availability cleared");
                Err(SchedulingError::Unavailable(err.to_string()))
            }
        }
    }

    /// Snapshot of the advisory date set.
    pub async fn available_dates(&self) -> BTreeSet<NaiveDate> {
        self.cache.read().await.dates.clone()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().await.refreshed_at
    }

    /// Live per-date listing, trimmed to the bookable window and sorted by
    /// start time. May legitimately be empty.
    pub async fn slots_for_date(&self, date: NaiveDate) -> Result<Vec<Slot>, SchedulingError> {
        let slots = self
            .service
            .list_slots_for_date(date)
            .await
            .map_err(|err| SchedulingError::Unavailable(err.to_string()))?;
        let mut slots = filter_bookable_slots(slots, Utc::now(), self.horizon_days);
        slots = slots_on_date(slots, date, self.timezone);
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    /// Window-only validation for raw per-date queries.
    pub fn validate_query_date(&self, date: NaiveDate) -> Result<(), SchedulingError> {
        validate_date_in_window(date, self.today(), self.horizon_days)
    }

    /// Full calendar selectability check against the advisory set.
    pub async fn validate_selectable(&self, date: NaiveDate) -> Result<(), SchedulingError> {
        let dates = self.cache.read().await;
        validate_selectable_date(date, self.today(), self.horizon_days, &dates.dates)
    }
}
