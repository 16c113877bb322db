//! Aggregate hour statistics.
//!
//! Two inputs are supported: raw activities (summing planned hours) and
//! decomposed segments (summing clipped durations). For activities lying
//! entirely inside a decomposition window, both give the same totals.
//!
//! Window selection comes in two flavours that must not be confused:
//! [`filter_in_window`] keeps activities that *start* inside the window (used
//! by weekly dashboards), while decomposition keeps activities that *overlap*
//! it. A multi-day activity starting before Monday overlaps the week but does
//! not start in it.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::activity::Activity;
use crate::activity_type::ActivityType;
use crate::decompose::DayMap;
use crate::window::Window;

/// Total, completed and pending hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub total_hours: f64,
    pub completed_hours: f64,
    pub pending_hours: f64,
}

impl Totals {
    fn add(&mut self, hours: f64, executed: bool) {
        self.total_hours += hours;
        if executed {
            self.completed_hours += hours;
        }
        self.pending_hours = self.total_hours - self.completed_hours;
    }
}

/// Completed hours out of a total, as drawn by progress donuts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Completion {
    pub completed_hours: f64,
    pub total_hours: f64,
}

impl Completion {
    fn add(&mut self, hours: f64, executed: bool) {
        self.total_hours += hours;
        if executed {
            self.completed_hours += hours;
        }
    }

    /// Completed fraction in `[0, 1]`; zero when nothing is planned.
    pub fn ratio(&self) -> f64 {
        if self.total_hours > 0.0 {
            (self.completed_hours / self.total_hours).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Dashboard figures for activities starting in a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub window: Window,
    pub totals: Totals,
    pub activity_count: usize,
    pub by_type: BTreeMap<ActivityType, Completion>,
}

/// Sums planned hours over `activities`.
pub fn totals<'a, I>(activities: I) -> Totals
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut totals = Totals::default();
    for activity in activities {
        totals.add(activity.planned_hours(), activity.executed);
    }
    totals
}

/// Sums planned hours over the activities matching `predicate`.
///
/// Returns `(completed, total)` for the matching subset.
pub fn totals_by_predicate<'a, I, P>(activities: I, mut predicate: P) -> Completion
where
    I: IntoIterator<Item = &'a Activity>,
    P: FnMut(&Activity) -> bool,
{
    let mut completion = Completion::default();
    for activity in activities {
        if predicate(activity) {
            completion.add(activity.planned_hours(), activity.executed);
        }
    }
    completion
}

/// Completion per activity type.
///
/// Built-in types are always present (possibly zero) so dashboards can draw a
/// fixed set of donuts; other types appear only when used.
pub fn totals_by_type<'a, I>(activities: I) -> BTreeMap<ActivityType, Completion>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut by_type: BTreeMap<_, _> = ActivityType::KNOWN
        .into_iter()
        .map(|kind| (kind, Completion::default()))
        .collect();
    for activity in activities {
        by_type
            .entry(activity.activity_type.clone())
            .or_default()
            .add(activity.planned_hours(), activity.executed);
    }
    by_type
}

/// Activities whose start lies in `[window_start, window_end)`.
///
/// Reversed bounds are swapped. Activities without a start are excluded.
pub fn filter_in_window(
    activities: &[Activity],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<&Activity> {
    let window = Window::new(window_start, window_end);
    activities
        .iter()
        .filter(|activity| activity.start.is_some_and(|start| window.contains(start)))
        .collect()
}

/// Sums segment durations across every day of a decomposition.
pub fn segment_totals(days: &DayMap) -> Totals {
    let mut totals = Totals::default();
    for segment in days.values().flatten() {
        totals.add(segment.duration_hours, segment.executed);
    }
    totals
}

/// Sums segment durations per day of a decomposition.
pub fn daily_totals(days: &DayMap) -> BTreeMap<NaiveDate, Totals> {
    days.iter()
        .map(|(day, segments)| {
            let mut totals = Totals::default();
            for segment in segments {
                totals.add(segment.duration_hours, segment.executed);
            }
            (*day, totals)
        })
        .collect()
}

/// Builds the dashboard summary for activities starting in `window`.
pub fn summarize(activities: &[Activity], window: Window) -> Summary {
    let selected = filter_in_window(activities, window.start(), window.end());
    Summary {
        window,
        totals: totals(selected.iter().copied()),
        activity_count: selected.len(),
        by_type: totals_by_type(selected.iter().copied()),
    }
}
