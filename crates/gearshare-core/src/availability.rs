//! Owner-declared availability windows.
//!
//! Each vehicle carries an [`Availability`]: an ordered set of
//! non-overlapping half-open windows during which it may be booked. A
//! request is available only when a *single* window covers it in full.
//! Adjacent windows are deliberately never merged; the owner declared them
//! as distinct, so a rental may not span the seam between two of them.

use serde::{Deserialize, Serialize};

use crate::error::{GearshareError, Result};
use crate::interval::Interval;

/// A vehicle's validated set of availability windows.
///
/// Windows are kept sorted by start and pairwise non-overlapping; both
/// properties are enforced at construction and on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct Availability {
    windows: Vec<Interval>,
}

impl TryFrom<Vec<Interval>> for Availability {
    type Error = GearshareError;

    fn try_from(windows: Vec<Interval>) -> Result<Self> {
        Self::new(windows)
    }
}

impl From<Availability> for Vec<Interval> {
    fn from(availability: Availability) -> Self {
        availability.windows
    }
}

impl Availability {
    /// Builds an availability set from owner-declared windows.
    ///
    /// Windows may arrive in any order; they are sorted by start here.
    ///
    /// # Errors
    ///
    /// Returns [`GearshareError::OverlappingWindows`] if any two windows
    /// overlap. Touching windows are allowed but stay distinct.
    pub fn new(mut windows: Vec<Interval>) -> Result<Self> {
        windows.sort_by_key(Interval::start);
        for pair in windows.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(GearshareError::OverlappingWindows);
            }
        }
        Ok(Self { windows })
    }

    /// An availability set with no windows. Nothing can be booked.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    /// Returns `true` iff some single window fully contains `requested`.
    ///
    /// A request covered only by the union of two adjacent windows is not
    /// available.
    #[must_use]
    pub fn covers(&self, requested: &Interval) -> bool {
        self.windows.iter().any(|w| w.contains(requested))
    }

    /// The declared windows, sorted by start.
    #[must_use]
    pub fn windows(&self) -> &[Interval] {
        &self.windows
    }

    /// Returns `true` if no windows are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
