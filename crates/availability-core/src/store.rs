//! In-memory, per-user availability storage.
//!
//! Each user owns a `Vec<TimeInterval>` kept strictly ascending by
//! `(start, end)` with no duplicates. The overlap sweep depends on that order
//! as a precondition, so every mutation restores it before releasing the lock.
//!
//! Locking: the user map sits behind an `RwLock` that is only write-locked to
//! create a user's entry; each entry has its own `Mutex`. Operations on
//! different users never contend on the same entry lock, and a reader of one
//! user always sees either the state before or after a whole mutation.
//!
//! Contents live for the lifetime of the store value and are lost when it is
//! dropped. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{AvailabilityError, Result};
use crate::interval::TimeInterval;

type Entry = Arc<Mutex<Vec<TimeInterval>>>;

/// Per-user sorted, duplicate-free interval sets.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    users: RwLock<HashMap<String, Entry>>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `interval` for `user_id`, creating the user's entry if needed.
    ///
    /// Returns `false` (and changes nothing) when an equal interval is
    /// already stored.
    pub fn insert(&self, user_id: &str, interval: TimeInterval) -> bool {
        let entry = self.entry_or_create(user_id);
        let mut intervals = lock(&entry);
        let inserted = insert_sorted(&mut intervals, interval);
        if inserted {
            debug!(user_id, %interval, "inserted availability slot");
        }
        inserted
    }

    /// Insert every interval in `batch` under a single lock acquisition.
    ///
    /// Returns how many were new.
    pub fn insert_all(&self, user_id: &str, batch: &[TimeInterval]) -> usize {
        let entry = self.entry_or_create(user_id);
        let mut intervals = lock(&entry);
        let inserted = batch
            .iter()
            .filter(|interval| insert_sorted(&mut intervals, **interval))
            .count();
        debug!(user_id, inserted, requested = batch.len(), "inserted availability batch");
        inserted
    }

    /// Remove the interval equal to `interval`.
    ///
    /// # Errors
    /// `NotFound` when the user has no equal interval, including when the user
    /// has never stored anything.
    pub fn remove(&self, user_id: &str, interval: &TimeInterval) -> Result<()> {
        let entry = self.entry(user_id).ok_or_else(|| not_found(user_id, interval))?;
        let mut intervals = lock(&entry);
        let pos = intervals
            .binary_search(interval)
            .map_err(|_| not_found(user_id, interval))?;
        intervals.remove(pos);
        debug!(user_id, %interval, "removed availability slot");
        Ok(())
    }

    /// Replace `old` with `new` as one step under the user's lock.
    ///
    /// If `new` already exists the result is just the removal of `old`.
    ///
    /// # Errors
    /// `NotFound` under the same conditions as [`remove`](Self::remove); the
    /// store is untouched in that case.
    pub fn replace(&self, user_id: &str, old: &TimeInterval, new: TimeInterval) -> Result<()> {
        let entry = self.entry(user_id).ok_or_else(|| not_found(user_id, old))?;
        let mut intervals = lock(&entry);
        let pos = intervals
            .binary_search(old)
            .map_err(|_| not_found(user_id, old))?;
        intervals.remove(pos);
        insert_sorted(&mut intervals, new);
        debug!(user_id, old = %old, new = %new, "replaced availability slot");
        Ok(())
    }

    /// Stored intervals with `start > now`, ascending.
    ///
    /// An interval that started at or before `now` is left out even if it has
    /// not ended yet. Nothing is purged.
    pub fn future_view(&self, user_id: &str, now: DateTime<Utc>) -> Vec<TimeInterval> {
        let Some(entry) = self.entry(user_id) else {
            return Vec::new();
        };
        let intervals = lock(&entry);
        // Sorted by start, so everything after the first future start is future too.
        let first_future = intervals.partition_point(|interval| interval.start() <= now);
        intervals[first_future..].to_vec()
    }

    /// Every stored interval for `user_id`, past ones included.
    pub fn snapshot(&self, user_id: &str) -> Vec<TimeInterval> {
        let Some(entry) = self.entry(user_id) else {
            return Vec::new();
        };
        let intervals = lock(&entry);
        intervals.clone()
    }

    /// Number of stored intervals for `user_id`.
    pub fn len(&self, user_id: &str) -> usize {
        let Some(entry) = self.entry(user_id) else {
            return 0;
        };
        let intervals = lock(&entry);
        intervals.len()
    }

    pub fn contains(&self, user_id: &str, interval: &TimeInterval) -> bool {
        let Some(entry) = self.entry(user_id) else {
            return false;
        };
        let intervals = lock(&entry);
        intervals.binary_search(interval).is_ok()
    }

    /// Ids of users with an entry, sorted.
    pub fn user_ids(&self) -> Vec<String> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = users.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entry(&self, user_id: &str) -> Option<Entry> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.get(user_id).cloned()
    }

    fn entry_or_create(&self, user_id: &str) -> Entry {
        if let Some(entry) = self.entry(user_id) {
            return entry;
        }
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(users.entry(user_id.to_string()).or_default())
    }
}

/// Insert keeping ascending order; `false` if an equal interval is present.
fn insert_sorted(intervals: &mut Vec<TimeInterval>, interval: TimeInterval) -> bool {
    match intervals.binary_search(&interval) {
        Ok(_) => false,
        Err(pos) => {
            intervals.insert(pos, interval);
            true
        }
    }
}

// Each Vec operation leaves the collection sorted, so a poisoned guard is still usable.
fn lock(entry: &Entry) -> MutexGuard<'_, Vec<TimeInterval>> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(user_id: &str, interval: &TimeInterval) -> AvailabilityError {
    AvailabilityError::NotFound {
        user_id: user_id.to_string(),
        interval: *interval,
    }
}
