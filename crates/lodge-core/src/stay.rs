//! # Stay Ranges
//!
//! Date-range handling for bookings: nights arithmetic and the half-open
//! overlap rule used for conflict detection.
//!
//! ## The Half-Open Interval Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A stay [check_in, check_out) occupies the nights of check_in up to    │
//! │  but NOT including check_out. Check-out morning frees the room.        │
//! │                                                                         │
//! │  Jan: 1    2    3    4    5                                             │
//! │  A:   [=========)                 Jan 1 → Jan 3                        │
//! │  B:             [=========)       Jan 3 → Jan 5   TOUCHING, no overlap │
//! │  C:        [=========)            Jan 2 → Jan 4   OVERLAPS A and B     │
//! │                                                                         │
//! │  Overlap test: a.check_in < b.check_out AND b.check_in < a.check_out    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conflict detection always re-queries bookings with this rule. The
//! `is_available` flag on rooms is a derived display value only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// An inclusive check-in / exclusive check-out date range.
///
/// Invariant: `check_in < check_out` (strict), enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Creates a stay range, enforcing `check_in < check_out`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use lodge_core::stay::StayRange;
    ///
    /// let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let jan3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    ///
    /// assert!(StayRange::new(jan1, jan3).is_ok());
    /// assert!(StayRange::new(jan3, jan1).is_err()); // reversed
    /// assert!(StayRange::new(jan1, jan1).is_err()); // zero nights
    /// ```
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<Self> {
        if check_in >= check_out {
            return Err(ValidationError::MustBeAfter {
                field: "check_out".to_string(),
                reference: "check_in".to_string(),
            });
        }

        Ok(StayRange {
            check_in,
            check_out,
        })
    }

    /// Rebuilds a range whose ordering was already enforced elsewhere
    /// (booking rows carry a storage-level CHECK on date order).
    #[inline]
    pub(crate) const fn from_parts_unchecked(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        StayRange {
            check_in,
            check_out,
        }
    }

    /// The first occupied night.
    #[inline]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// The morning the room is freed (exclusive).
    #[inline]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights in the stay. Always >= 1 by construction.
    #[inline]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open interval overlap test.
    ///
    /// Touching ranges (one checks out the day the other checks in) do
    /// NOT overlap.
    #[inline]
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Whether the stay still occupies the room after the given date.
    ///
    /// Used for the derived availability flag: a room is available iff no
    /// booking for it `extends_past(today)`.
    #[inline]
    pub fn extends_past(&self, today: NaiveDate) -> bool {
        self.check_out > today
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(a: (i32, u32, u32), b: (i32, u32, u32)) -> StayRange {
        StayRange::new(date(a.0, a.1, a.2), date(b.0, b.1, b.2)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_and_empty_ranges() {
        assert!(StayRange::new(date(2024, 1, 3), date(2024, 1, 1)).is_err());
        assert!(StayRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_nights() {
        assert_eq!(stay((2024, 1, 1), (2024, 1, 3)).nights(), 2);
        assert_eq!(stay((2024, 1, 1), (2024, 1, 2)).nights(), 1);
        assert_eq!(stay((2024, 1, 1), (2024, 2, 1)).nights(), 31);
    }

    #[test]
    fn test_overlap_rule() {
        let a = stay((2024, 1, 1), (2024, 1, 3));
        let inside = stay((2024, 1, 2), (2024, 1, 4));
        let covering = stay((2023, 12, 25), (2024, 2, 1));
        let before = stay((2023, 12, 1), (2023, 12, 20));

        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
        assert!(a.overlaps(&covering));
        assert!(!a.overlaps(&before));
    }

    /// Back-to-back stays share a calendar day but never a night.
    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let first = stay((2024, 1, 1), (2024, 1, 3));
        let second = stay((2024, 1, 3), (2024, 1, 5));

        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_extends_past() {
        let s = stay((2024, 1, 1), (2024, 1, 3));
        assert!(s.extends_past(date(2024, 1, 1)));
        assert!(s.extends_past(date(2024, 1, 2)));
        // Check-out morning: the room is free that day.
        assert!(!s.extends_past(date(2024, 1, 3)));
        assert!(!s.extends_past(date(2024, 6, 1)));
    }
}
