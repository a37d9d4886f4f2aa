//! Pairwise overlap of two users' availability.
//!
//! A two-cursor merge sweep over inputs that are already sorted ascending by
//! `(start, end)`. Sortedness is a precondition and is not re-checked here;
//! [`AvailabilityStore`](crate::store::AvailabilityStore) guarantees it.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::interval::TimeInterval;

/// Intersections of `a` and `b` whose start is strictly after `now`, ascending.
///
/// Runs in `O(a.len() + b.len())`. At each step the candidate is
/// `(max(s1, s2), min(e1, e2))`; it is emitted if non-empty and in the future.
/// The cursor whose interval ends first advances; on equal ends the cursor
/// into `b` advances.
///
/// If one side's own intervals overlap each other, the result may contain
/// overlapping intersections.
pub fn compute_overlap(
    a: &[TimeInterval],
    b: &[TimeInterval],
    now: DateTime<Utc>,
) -> Vec<TimeInterval> {
    let mut overlap = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (first, second) = (&a[i], &b[j]);

        if let Some(common) = first.intersection(second) {
            if common.start() > now {
                overlap.push(common);
            }
        }

        if first.end() < second.end() {
            i += 1;
        } else {
            j += 1;
        }
    }

    trace!(
        left = a.len(),
        right = b.len(),
        emitted = overlap.len(),
        "overlap sweep finished"
    );
    overlap
}

/// Total overlapping time, in whole minutes.
pub fn overlap_minutes(overlap: &[TimeInterval]) -> i64 {
    overlap
        .iter()
        .map(|interval| interval.duration().num_minutes())
        .sum()
}
