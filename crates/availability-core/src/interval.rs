//! The half-open UTC interval `[start, end)` every other module works with.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A non-empty half-open range of UTC instants.
///
/// `start < end` holds for every value of this type. Equality compares both
/// endpoints and ordering is lexicographic on `(start, end)`, which is what the
/// store relies on for deduplication and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvertedOrDegenerate { start, end });
        }
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` falls in `[start, end)`.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Adjacent intervals (one ends exactly when the other starts) do not.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The common part of two intervals, or `None` when they do not overlap.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeInterval { start, end })
    }

    /// Shift both endpoints by the same amount, or `None` if either leaves
    /// chrono's representable range.
    pub fn checked_shift(&self, by: Duration) -> Option<TimeInterval> {
        Some(TimeInterval {
            start: self.start.checked_add_signed(by)?,
            end: self.end.checked_add_signed(by)?,
        })
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Wire shape: `{"start_time": ..., "end_time": ...}`.
#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<IntervalRepr> for TimeInterval {
    type Error = ValidationError;

    fn try_from(repr: IntervalRepr) -> Result<Self, Self::Error> {
        TimeInterval::new(repr.start_time, repr.end_time)
    }
}

impl From<TimeInterval> for IntervalRepr {
    fn from(interval: TimeInterval) -> Self {
        IntervalRepr {
            start_time: interval.start,
            end_time: interval.end,
        }
    }
}
