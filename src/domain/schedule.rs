//! Half-open booking intervals and overlap detection.
//!
//! A session occupies its spot over `[start, start + duration)`. Two intervals
//! that merely touch (one ends exactly when the other starts) do not overlap.

use chrono::{DateTime, TimeDelta, Utc};

/// Effective occupancy interval of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// `None` when `start + duration_secs` is not a representable instant.
    pub fn new(start: DateTime<Utc>, duration_secs: i64) -> Option<Self> {
        let end = TimeDelta::try_seconds(duration_secs)
            .and_then(|delta| start.checked_add_signed(delta))?;
        Some(Self { start, end })
    }

    /// Like [`Interval::new`], but an end past the representable range is
    /// clamped to the furthest instant in that direction.
    pub fn saturating(start: DateTime<Utc>, duration_secs: i64) -> Self {
        Self::new(start, duration_secs).unwrap_or(Self {
            start,
            end: if duration_secs < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            },
        })
    }

    /// `start <= instant < end`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Standard half-open overlap test. Durations are assumed positive.
pub fn overlaps(existing: &Interval, candidate: &Interval) -> bool {
    existing.start < candidate.end && candidate.start < existing.end
}

/// First item of `existing` whose interval overlaps `candidate`.
pub fn first_conflict<'a, T, I, F>(existing: I, candidate: &Interval, interval_of: F) -> Option<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Interval,
{
    existing
        .into_iter()
        .find(|item| overlaps(&interval_of(item), candidate))
}

/// True if `candidate` overlaps any of `existing`.
pub fn has_conflict<'a, I>(existing: I, candidate: &Interval) -> bool
where
    I: IntoIterator<Item = &'a Interval>,
{
    first_conflict(existing, candidate, |e| *e).is_some()
}
