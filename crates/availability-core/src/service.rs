//! The operations a request layer calls: set, get, overlap, reschedule, delete.
//!
//! Every operation takes the user id explicitly and reads "now" once from the
//! injected [`Clock`], so a batch is judged against a single instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::{BatchPolicy, EngineConfig};
use crate::error::{AvailabilityError, ConfigError, Result, ValidationError};
use crate::expander::expand_within;
use crate::interval::TimeInterval;
use crate::overlap;
use crate::slot::{SlotBounds, SlotRequest};
use crate::store::AvailabilityStore;
use crate::validation;

/// Counts from a successful [`AvailabilityService::set_availability`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetOutcome {
    /// Intervals that were new to the store.
    pub inserted: usize,
    /// Intervals already present, left as they were.
    pub duplicates: usize,
}

/// Availability operations over one owned [`AvailabilityStore`].
///
/// The store is private: every write goes through validation.
#[derive(Debug)]
pub struct AvailabilityService<C = SystemClock> {
    store: AvailabilityStore,
    clock: C,
    config: EngineConfig,
}

impl AvailabilityService<SystemClock> {
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> AvailabilityService<C> {
    /// A service with an empty store and the default configuration.
    pub fn new(clock: C) -> Self {
        AvailabilityService {
            store: AvailabilityStore::new(),
            clock,
            config: EngineConfig::default(),
        }
    }

    /// # Errors
    /// Returns [`ConfigError`] when `config` is out of bounds.
    pub fn with_config(clock: C, config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        Ok(AvailabilityService {
            store: AvailabilityStore::new(),
            clock,
            config: config.validated()?,
        })
    }

    /// Every stored interval for `user_id`, past ones included.
    pub fn snapshot(&self, user_id: &str) -> Vec<TimeInterval> {
        self.store.snapshot(user_id)
    }

    /// Number of stored intervals for `user_id`, past ones included.
    pub fn slot_count(&self, user_id: &str) -> usize {
        self.store.len(user_id)
    }

    /// Availability of `user_id` as seen at `now` instead of the clock's instant.
    pub fn availability_at(&self, user_id: &str, now: DateTime<Utc>) -> Vec<TimeInterval> {
        self.store.future_view(user_id, now)
    }

    /// Overlap of two users as seen at `now` instead of the clock's instant.
    pub fn overlap_at(&self, user_a: &str, user_b: &str, now: DateTime<Utc>) -> Vec<TimeInterval> {
        let a = self.store.snapshot(user_a);
        let b = self.store.snapshot(user_b);
        overlap::compute_overlap(&a, &b, now)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate, expand and store `slots` for `user_id`.
    ///
    /// Stops at the first invalid slot and reports it as an
    /// `AvailabilityError::Validation` labelled `availability[<index>]`. Under
    /// [`BatchPolicy::PerSlot`] slots before it stay committed; under
    /// [`BatchPolicy::AllOrNothing`] nothing is stored.
    pub fn set_availability(&self, user_id: &str, slots: &[SlotRequest]) -> Result<SetOutcome> {
        let now = self.clock.now();
        let mut outcome = SetOutcome::default();
        let mut pending: Vec<TimeInterval> = Vec::new();

        for (index, slot) in slots.iter().enumerate() {
            let expanded = match self.expand_at(slot, now) {
                Ok(expanded) => expanded,
                Err(source) => {
                    warn!(
                        user_id,
                        slot = index,
                        committed = outcome.inserted,
                        error = %source,
                        "rejected availability slot"
                    );
                    return Err(AvailabilityError::validation(
                        format!("availability[{index}]"),
                        source,
                    ));
                }
            };

            match self.config.batch_policy {
                BatchPolicy::PerSlot => {
                    let inserted = self.store.insert_all(user_id, &expanded);
                    outcome.inserted += inserted;
                    outcome.duplicates += expanded.len() - inserted;
                }
                BatchPolicy::AllOrNothing => pending.extend(expanded),
            }
        }

        if !pending.is_empty() {
            let inserted = self.store.insert_all(user_id, &pending);
            outcome.inserted += inserted;
            outcome.duplicates += pending.len() - inserted;
        }

        Ok(outcome)
    }

    /// Future availability of `user_id` (start after now), ascending.
    pub fn get_availability(&self, user_id: &str) -> Vec<TimeInterval> {
        self.availability_at(user_id, self.clock.now())
    }

    /// Future overlap between two users, ascending. Unknown users have no
    /// availability, so they overlap with nobody.
    pub fn compute_overlap(&self, user_a: &str, user_b: &str) -> Vec<TimeInterval> {
        self.overlap_at(user_a, user_b, self.clock.now())
    }

    /// Replace `old` with `new` for `user_id`.
    ///
    /// Both slots are parsed and `new` is validated as a fresh interval before
    /// the store is touched.
    ///
    /// # Errors
    /// `Validation` (`old_slot` / `new_slot`) for bad input, `NotFound` when
    /// `old` is not stored. Neither mutates the store.
    pub fn reschedule_slot(&self, user_id: &str, old: &SlotBounds, new: &SlotBounds) -> Result<()> {
        let now = self.clock.now();
        let old = validation::lookup_interval(old)
            .map_err(|source| AvailabilityError::validation("old_slot", source))?;
        let new = validation::new_interval(new, now)
            .map_err(|source| AvailabilityError::validation("new_slot", source))?;
        self.store.replace(user_id, &old, new)
    }

    /// Remove `slot` from `user_id`'s availability. Past slots may be removed.
    ///
    /// # Errors
    /// `Validation` (`slot`) for malformed bounds, `NotFound` when not stored.
    pub fn delete_slot(&self, user_id: &str, slot: &SlotBounds) -> Result<()> {
        let interval = validation::lookup_interval(slot)
            .map_err(|source| AvailabilityError::validation("slot", source))?;
        self.store.remove(user_id, &interval)
    }

    /// Validate and expand `slot` without storing anything.
    ///
    /// # Errors
    /// `Validation` (`slot`) when the base interval is invalid.
    pub fn expand_slot(&self, slot: &SlotRequest) -> Result<Vec<TimeInterval>> {
        self.expand_at(slot, self.clock.now())
            .map_err(|source| AvailabilityError::validation("slot", source))
    }

    fn expand_at(
        &self,
        slot: &SlotRequest,
        now: DateTime<Utc>,
    ) -> std::result::Result<Vec<TimeInterval>, ValidationError> {
        let base = validation::new_interval(&slot.bounds(), now)?;
        let recurrence = slot.recurrence.unwrap_or_default();
        Ok(expand_within(base, recurrence, self.config.expansion_horizon_days))
    }
}
