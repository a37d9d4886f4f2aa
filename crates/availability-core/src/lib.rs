//! # availability-core
//!
//! Per-user availability windows and pairwise overlap.
//!
//! Each user's availability is a sorted, duplicate-free set of UTC intervals.
//! Two such sets are intersected in a single linear sweep to find the times
//! both users are free.
//!
//! ## Modules
//!
//! - [`interval`] — `TimeInterval`, the half-open `[start, end)` value type
//! - [`validation`] — UTC parsing and the future / ordering rules
//! - [`expander`] — one slot + recurrence → bounded list of intervals
//! - [`store`] — in-memory per-user interval sets
//! - [`overlap`] — two-cursor intersection sweep
//! - [`service`] — the set / get / overlap / reschedule / delete operations
//! - [`clock`], [`config`], [`slot`] — injected time, tunables, request shapes
//! - [`error`] — Error types

pub mod clock;
pub mod config;
pub mod error;
pub mod expander;
pub mod interval;
pub mod overlap;
pub mod service;
pub mod slot;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BatchPolicy, EngineConfig};
pub use error::{AvailabilityError, ValidationError, ValidationErrorKind};
pub use expander::{expand, Recurrence};
pub use interval::TimeInterval;
pub use overlap::compute_overlap;
pub use service::{AvailabilityService, SetOutcome};
pub use slot::{SlotBounds, SlotRequest};
pub use store::AvailabilityStore;
