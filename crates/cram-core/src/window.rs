//! Half-open query windows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use crate::activity::hours_between;

/// A half-open interval `[start, end)` of local time.
///
/// Construction always normalizes so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Window {
    /// Creates a window, swapping the bounds if they are reversed.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Resolves optional bounds into a window.
    ///
    /// With neither bound, the window is `today` from midnight to the next
    /// midnight. With one bound, the other sits 24 hours away from it.
    pub fn resolve(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        today: NaiveDate,
    ) -> Self {
        let day = TimeDelta::days(1);
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (Some(start), None) => Self::new(start, shift(start, day)),
            (None, Some(end)) => Self::new(shift(end, -day), end),
            (None, None) => Self::day(today),
        }
    }

    /// The whole calendar day `date`, midnight to midnight.
    pub fn day(date: NaiveDate) -> Self {
        let start = midnight(date);
        Self::new(start, shift(start, TimeDelta::days(1)))
    }

    /// Midnight of `first` through midnight after `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        Self::new(midnight(first), shift(midnight(last), TimeDelta::days(1)))
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length of the window in hours.
    pub fn duration_hours(&self) -> f64 {
        hours_between(self.start, self.end)
    }

    /// Half-open overlap test: `end > self.start && start < self.end`.
    ///
    /// An interval that ends exactly at the window start, or starts exactly at
    /// the window end, does not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        end > self.start && start < self.end
    }

    /// Start containment test: `self.start <= ts < self.end`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Clips `[start, end)` to the window, or `None` if nothing remains.
    pub fn clip(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let clipped_start = start.max(self.start);
        let clipped_end = end.min(self.end);
        (clipped_end > clipped_start).then_some((clipped_start, clipped_end))
    }
}

/// Midnight at the start of `date`.
pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Adds `delta`, saturating at the representable range.
pub(crate) fn shift(ts: NaiveDateTime, delta: TimeDelta) -> NaiveDateTime {
    ts.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}
