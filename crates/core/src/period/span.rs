//! Date span validation for budgeting periods.
//!
//! A period covers the closed date range `[date_start, date_end]`. Within a
//! single wallet no two period ranges may intersect, not even on a single
//! shared day.

use chrono::NaiveDate;
use sakiewka_shared::types::PeriodId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by period date validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// The start date is not strictly before the end date.
    #[error("start date must be earlier than end date")]
    StartNotBeforeEnd,
}

/// A closed, inclusive date range `[start, end]` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day covered by the span.
    pub start: NaiveDate,
    /// Last day covered by the span (inclusive).
    pub end: NaiveDate,
}

impl DateSpan {
    /// Creates a validated date span.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::StartNotBeforeEnd` unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start >= end {
            return Err(PeriodError::StartNotBeforeEnd);
        }
        Ok(Self { start, end })
    }

    /// Returns true if the two spans share at least one day.
    ///
    /// Both endpoints are inclusive, so spans that merely touch
    /// (one ends the day the other starts) are considered overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns true if `date` falls inside the span (endpoints included).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Finds the first existing period whose span collides with the candidate.
///
/// Callers pass the spans of every other period in the wallet; the candidate
/// itself must be excluded by the caller (relevant on update).
pub fn find_collision<I>(candidate: DateSpan, existing: I) -> Option<PeriodId>
where
    I: IntoIterator<Item = (PeriodId, DateSpan)>,
{
    existing
        .into_iter()
        .find(|(_, span)| candidate.overlaps(span))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_span_requires_ordered_dates() {
        assert!(DateSpan::new(date(2026, 1, 1), date(2026, 1, 31)).is_ok());
        assert_eq!(
            DateSpan::new(date(2026, 1, 31), date(2026, 1, 1)),
            Err(PeriodError::StartNotBeforeEnd)
        );
        assert_eq!(
            DateSpan::new(date(2026, 1, 1), date(2026, 1, 1)),
            Err(PeriodError::StartNotBeforeEnd)
        );
    }

    #[test]
    fn test_disjoint_spans_do_not_overlap() {
        let january = DateSpan::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        let february = DateSpan::new(date(2026, 2, 1), date(2026, 2, 28)).unwrap();
        assert!(!january.overlaps(&february));
        assert!(!february.overlaps(&january));
    }

    #[test]
    fn test_touching_endpoints_overlap() {
        // Closed ranges: sharing a single day is a collision.
        let first = DateSpan::new(date(2026, 1, 1), date(2026, 1, 15)).unwrap();
        let second = DateSpan::new(date(2026, 1, 15), date(2026, 1, 31)).unwrap();
        assert!(first.overlaps(&second));
    }

    #[test]
    fn test_contained_span_overlaps() {
        let outer = DateSpan::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let inner = DateSpan::new(date(2026, 6, 1), date(2026, 6, 30)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_contains() {
        let span = DateSpan::new(date(2026, 3, 1), date(2026, 3, 31)).unwrap();
        assert!(span.contains(date(2026, 3, 1)));
        assert!(span.contains(date(2026, 3, 15)));
        assert!(span.contains(date(2026, 3, 31)));
        assert!(!span.contains(date(2026, 4, 1)));
    }

    #[test]
    fn test_find_collision_reports_first_hit() {
        let candidate = DateSpan::new(date(2026, 2, 10), date(2026, 2, 20)).unwrap();
        let january = PeriodId::new();
        let february = PeriodId::new();
        let others = vec![
            (january, DateSpan::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap()),
            (february, DateSpan::new(date(2026, 2, 15), date(2026, 2, 28)).unwrap()),
        ];
        assert_eq!(find_collision(candidate, others.clone()), Some(february));

        let free = DateSpan::new(date(2026, 3, 1), date(2026, 3, 31)).unwrap();
        assert_eq!(find_collision(free, others), None);
    }

    fn span_strategy() -> impl Strategy<Value = DateSpan> {
        // Days within a few years of an arbitrary epoch; start < end guaranteed.
        (0i64..2000, 1i64..400).prop_map(|(start_off, len)| {
            let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            let start = epoch + chrono::Duration::days(start_off);
            let end = start + chrono::Duration::days(len);
            DateSpan::new(start, end).unwrap()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Overlap is symmetric: a.overlaps(b) == b.overlaps(a).
        #[test]
        fn prop_overlap_is_symmetric(a in span_strategy(), b in span_strategy()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        /// Every span overlaps itself.
        #[test]
        fn prop_overlap_is_reflexive(a in span_strategy()) {
            prop_assert!(a.overlaps(&a));
        }

        /// Overlap holds exactly when some day is contained in both spans.
        #[test]
        fn prop_overlap_matches_shared_day(a in span_strategy(), b in span_strategy()) {
            let shared_day_exists = {
                let lo = a.start.max(b.start);
                let hi = a.end.min(b.end);
                lo <= hi
            };
            prop_assert_eq!(a.overlaps(&b), shared_day_exists);
        }

        /// A span strictly after another never overlaps it.
        #[test]
        fn prop_strictly_after_never_overlaps(a in span_strategy(), gap in 1i64..100, len in 1i64..400) {
            let start = a.end + chrono::Duration::days(gap);
            let b = DateSpan::new(start, start + chrono::Duration::days(len)).unwrap();
            prop_assert!(!a.overlaps(&b));
        }
    }
}
