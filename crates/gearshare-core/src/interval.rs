//! Half-open time ranges.
//!
//! Both availability windows and booking periods are [`Interval`]s: the start
//! is included, the end is excluded. Half-open semantics let two bookings
//! share an endpoint without overlapping, so back-to-back rentals are legal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GearshareError, Result};

/// An immutable half-open time range `[start, end)`.
///
/// The constructor enforces `start < end`; empty and inverted ranges cannot
/// be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Wire shape of an interval, used to re-validate on deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawInterval {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = GearshareError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.from, raw.to)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        Self {
            from: interval.start,
            to: interval.end,
        }
    }
}

impl Interval {
    /// Creates an interval covering `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`GearshareError::InvalidInterval`] if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(GearshareError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive start of the range.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the range.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the range. Always positive.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns `true` if `inner` lies entirely within `self`.
    #[inline]
    #[must_use]
    pub fn contains(&self, inner: &Self) -> bool {
        inner.start >= self.start && inner.end <= self.end
    }

    /// Returns `true` if the two ranges share any instant.
    ///
    /// Touching endpoints do not overlap: `[a, b)` and `[b, c)` are disjoint.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(from: &str, to: &str) -> Interval {
        Interval::new(from.parse().unwrap(), to.parse().unwrap()).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let start: DateTime<Utc> = "2025-09-22T15:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2025-09-22T09:00:00Z".parse().unwrap();
        assert!(matches!(
            Interval::new(start, end),
            Err(GearshareError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn rejects_empty_range() {
        let at: DateTime<Utc> = "2025-09-22T09:00:00Z".parse().unwrap();
        assert!(Interval::new(at, at).is_err());
    }

    #[test]
    fn contains_is_inclusive_of_bounds() {
        let outer = interval("2025-09-22T09:00:00Z", "2025-09-26T17:00:00Z");
        let inner = interval("2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z");
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn every_interval_overlaps_itself() {
        let x = interval("2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z");
        assert!(x.overlaps(&x));
    }

    #[test]
    fn overlap_is_symmetric_for_disjoint_pairs() {
        let a = interval("2025-09-22T09:00:00Z", "2025-09-22T12:00:00Z");
        let b = interval("2025-09-22T13:00:00Z", "2025-09-22T15:00:00Z");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a = interval("2025-09-22T09:00:00Z", "2025-09-22T12:00:00Z");
        let b = interval("2025-09-22T12:00:00Z", "2025-09-22T15:00:00Z");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn partial_overlap_is_detected_both_ways() {
        let a = interval("2025-09-22T09:00:00Z", "2025-09-22T13:00:00Z");
        let b = interval("2025-09-22T12:00:00Z", "2025-09-22T15:00:00Z");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn serde_round_trip_uses_from_to_keys() {
        let x = interval("2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z");
        let json = serde_json::to_string(&x).unwrap();
        assert!(json.contains("\"from\""));
        assert!(json.contains("\"to\""));
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn deserializing_an_inverted_range_fails() {
        let json = r#"{"from":"2025-09-22T15:00:00Z","to":"2025-09-22T09:00:00Z"}"#;
        assert!(serde_json::from_str::<Interval>(json).is_err());
    }
}
