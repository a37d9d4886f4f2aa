//! Request-side slot descriptors, as they arrive from a request layer.
//!
//! Timestamps stay as strings here; [`crate::validation`] turns them into
//! [`TimeInterval`](crate::interval::TimeInterval)s.

use serde::{Deserialize, Serialize};

use crate::expander::Recurrence;

/// A raw `{start_time, end_time}` pair, used for lookups (delete, reschedule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBounds {
    pub start_time: String,
    pub end_time: String,
}

impl SlotBounds {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        SlotBounds {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// An availability slot to create: a base interval plus an optional recurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl SlotRequest {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        SlotRequest {
            start_time: start_time.into(),
            end_time: end_time.into(),
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn bounds(&self) -> SlotBounds {
        SlotBounds::new(self.start_time.clone(), self.end_time.clone())
    }
}
