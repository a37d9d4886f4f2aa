//! Recurrence expansion -- turns one base slot into the concrete intervals it stands for.
//!
//! Expansion is always bounded by a horizon counted in whole days from the base
//! `start`, so a single request can never produce an unbounded number of intervals.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Weekday};
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Horizon used when none is configured.
pub const DEFAULT_HORIZON_DAYS: u16 = 30;

/// Upper bound accepted by [`EngineConfig`](crate::config::EngineConfig).
pub const MAX_EXPANSION_HORIZON_DAYS: u16 = 366;

/// How a single slot repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// The slot occurs once.
    #[default]
    None,
    /// The slot repeats on every Monday–Friday inside the horizon.
    Weekdays,
}

impl FromStr for Recurrence {
    type Err = UnknownRecurrence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Recurrence::None),
            "weekdays" => Ok(Recurrence::Weekdays),
            _ => Err(UnknownRecurrence(s.to_string())),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => f.write_str("none"),
            Recurrence::Weekdays => f.write_str("weekdays"),
        }
    }
}

/// Returned when a recurrence tag is not one of `none`, `weekdays`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown recurrence {0:?} (expected 'none' or 'weekdays')")]
pub struct UnknownRecurrence(pub String);

/// Expand `base` with the default 30-day horizon.
pub fn expand(base: TimeInterval, recurrence: Recurrence) -> Vec<TimeInterval> {
    expand_within(base, recurrence, DEFAULT_HORIZON_DAYS)
}

/// Expand `base` over `[start, start + horizon_days)`.
///
/// - `None` yields exactly `base`.
/// - `Weekdays` yields `base` shifted by `k` days for each `k` in
///   `0..horizon_days` whose shifted start falls Monday–Friday. Weekend offsets
///   are dropped, not moved. Output is in increasing `k`, hence ascending.
///
/// The weekday is taken from the UTC calendar date of the shifted `start`;
/// both endpoints move by the same whole number of days. Expansion stops early
/// if a shift would leave chrono's representable range.
pub fn expand_within(
    base: TimeInterval,
    recurrence: Recurrence,
    horizon_days: u16,
) -> Vec<TimeInterval> {
    match recurrence {
        Recurrence::None => vec![base],
        Recurrence::Weekdays => (0..i64::from(horizon_days))
            .map_while(|k| base.checked_shift(Duration::days(k)))
            .filter(|interval| is_weekday(interval.start().weekday()))
            .collect(),
    }
}

fn is_weekday(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}
