//! Error types for availability operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::interval::TimeInterval;

/// The rule a slot violated, without the offending values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    NotUtc,
    Unparseable,
    NotFuture,
    InvertedOrDegenerate,
}

/// A single timestamp or interval failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The timestamp parsed but carries a non-zero offset, or no offset at all.
    #[error("timestamp {value:?} is not in UTC (expected e.g. '2024-09-27T09:00:00Z')")]
    NotUtc { value: String },

    #[error("timestamp {value:?} is not a valid ISO 8601 instant")]
    Unparseable { value: String },

    #[error("start time {start} is not in the future (now is {now})")]
    NotFuture {
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// `end` is before `start`, or equal to it.
    #[error("end time {end} must be later than start time {start}")]
    InvertedOrDegenerate {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::NotUtc { .. } => ValidationErrorKind::NotUtc,
            ValidationError::Unparseable { .. } => ValidationErrorKind::Unparseable,
            ValidationError::NotFuture { .. } => ValidationErrorKind::NotFuture,
            ValidationError::InvertedOrDegenerate { .. } => {
                ValidationErrorKind::InvertedOrDegenerate
            }
        }
    }
}

/// Errors returned by store and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// A slot in the request failed validation. `slot` names it
    /// (`availability[2]`, `old_slot`, `new_slot`, `slot`).
    #[error("{slot}: {source}")]
    Validation {
        slot: String,
        #[source]
        source: ValidationError,
    },

    #[error("slot {interval} not found in availability for user {user_id:?}")]
    NotFound {
        user_id: String,
        interval: TimeInterval,
    },
}

impl AvailabilityError {
    pub(crate) fn validation(slot: impl Into<String>, source: ValidationError) -> Self {
        AvailabilityError::Validation {
            slot: slot.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AvailabilityError::NotFound { .. })
    }

    /// The validation rule that failed, if this is a validation error.
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            AvailabilityError::Validation { source, .. } => Some(source.kind()),
            AvailabilityError::NotFound { .. } => None,
        }
    }

    /// HTTP-like status for a request layer: 400 for bad input, 404 for a missing slot.
    pub fn status_hint(&self) -> u16 {
        match self {
            AvailabilityError::Validation { .. } => 400,
            AvailabilityError::NotFound { .. } => 404,
        }
    }
}

/// Invalid [`EngineConfig`](crate::config::EngineConfig) values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expansion horizon must be between 1 and {max} days, got {got}")]
    HorizonOutOfRange { got: u16, max: u16 },
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
