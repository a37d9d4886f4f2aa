//! Well-formedness and temporal rules shared by the insert, reschedule and
//! delete paths.
//!
//! Parsing comes first (`Unparseable`, `NotUtc`), then the future check for
//! interval-creating operations (`NotFuture`), then ordering of the endpoints
//! (`InvertedOrDegenerate`). The first failing rule is reported.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::error::ValidationError;
use crate::interval::TimeInterval;
use crate::slot::SlotBounds;

/// Offset-bearing formats accepted besides strict RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Offset-less formats. These parse, but are never UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Accepted calendar years: the four-digit range of RFC 3339.
///
/// Expansion shifts endpoints by up to [`MAX_EXPANSION_HORIZON_DAYS`], which
/// stays far inside chrono's representable range for these years.
///
/// [`MAX_EXPANSION_HORIZON_DAYS`]: crate::expander::MAX_EXPANSION_HORIZON_DAYS
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Parse an ISO 8601 timestamp that must denote UTC.
///
/// Accepts the `Z` suffix and an explicit `+00:00` offset. Any other offset,
/// or no offset at all, is `NotUtc`. Anything that is not a timestamp, or
/// whose year falls outside [`MIN_YEAR`]..=[`MAX_YEAR`], is `Unparseable`.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::<FixedOffset>::parse_from_str(trimmed, fmt).ok())
    });

    match parsed {
        Some(dt) if !(MIN_YEAR..=MAX_YEAR).contains(&dt.year()) => {
            Err(ValidationError::Unparseable {
                value: raw.to_string(),
            })
        }
        Some(dt) if dt.offset().local_minus_utc() == 0 => Ok(dt.with_timezone(&Utc)),
        Some(_) => Err(ValidationError::NotUtc {
            value: raw.to_string(),
        }),
        None if is_naive_timestamp(trimmed) => Err(ValidationError::NotUtc {
            value: raw.to_string(),
        }),
        None => Err(ValidationError::Unparseable {
            value: raw.to_string(),
        }),
    }
}

fn is_naive_timestamp(raw: &str) -> bool {
    NAIVE_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(raw, fmt).is_ok())
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

/// Validate an interval that is about to be created (insert, reschedule target).
///
/// `start` must be strictly after `now` and strictly before `end`.
pub fn validate_new(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<TimeInterval, ValidationError> {
    if start <= now {
        return Err(ValidationError::NotFuture { start, now });
    }
    TimeInterval::new(start, end)
}

/// Validate an interval used to look up an existing slot (delete, reschedule source).
///
/// No future check: past slots can still be removed.
pub fn validate_lookup(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<TimeInterval, ValidationError> {
    TimeInterval::new(start, end)
}

/// Parse and validate raw bounds for creation.
pub fn new_interval(
    bounds: &SlotBounds,
    now: DateTime<Utc>,
) -> Result<TimeInterval, ValidationError> {
    let (start, end) = parse_bounds(bounds)?;
    validate_new(start, end, now)
}

/// Parse and validate raw bounds for lookup.
pub fn lookup_interval(bounds: &SlotBounds) -> Result<TimeInterval, ValidationError> {
    let (start, end) = parse_bounds(bounds)?;
    validate_lookup(start, end)
}

fn parse_bounds(bounds: &SlotBounds) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let start = parse_utc(&bounds.start_time)?;
    let end = parse_utc(&bounds.end_time)?;
    Ok((start, end))
}
