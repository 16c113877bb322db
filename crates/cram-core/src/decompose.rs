//! Day decomposition of activities.
//!
//! Splits every activity that overlaps a query window into per-day segments,
//! so that timelines and dashboards work from one shared view of "what
//! happened on which day".
//!
//! # Algorithm Summary
//!
//! 1. Resolve the window (defaults and normalization, see [`Window::resolve`])
//! 2. Keep activities overlapping the window under the half-open test
//! 3. Clip each to the window, then walk each calendar day the clipped interval
//!    touches and emit the portion that falls inside that day
//! 4. Group segments by day, sorted by clipped start

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::activity::{Activity, hours_between};
use crate::activity_type::ActivityType;
use crate::types::ActivityId;
use crate::window::{Window, midnight, shift};

/// Segments grouped by calendar day. Days without segments are absent.
pub type DayMap = BTreeMap<NaiveDate, Vec<DaySegment>>;

/// The part of one activity that falls within one day and the query window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySegment {
    pub activity_id: ActivityId,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub executed: bool,

    /// Inclusive start, no earlier than the day's midnight.
    pub clipped_start: NaiveDateTime,

    /// Exclusive end, no later than the following midnight.
    pub clipped_end: NaiveDateTime,

    pub duration_hours: f64,

    /// True when the segment covers the whole day, midnight to midnight.
    pub all_day: bool,
}

/// Decomposes activities into per-day segments.
///
/// Missing window bounds are resolved against the local current date; see
/// [`Window::resolve`].
pub fn decompose(
    activities: &[Activity],
    window_start: Option<NaiveDateTime>,
    window_end: Option<NaiveDateTime>,
) -> DayMap {
    let today = Local::now().date_naive();
    decompose_in(activities, Window::resolve(window_start, window_end, today))
}

/// Decomposes activities into per-day segments for an explicit window.
///
/// Activities with a missing bound, or whose clipped span is empty, produce
/// nothing. Within a day, segments are ordered by `clipped_start`; ties keep
/// input order.
pub fn decompose_in(activities: &[Activity], window: Window) -> DayMap {
    let mut days = DayMap::new();

    for activity in activities {
        let Some((start, end)) = activity.span() else {
            continue;
        };
        if !window.overlaps(start, end) {
            continue;
        }
        let Some((clip_start, clip_end)) = window.clip(start, end) else {
            continue;
        };

        for_each_day(clip_start, clip_end, |day, seg_start, seg_end, all_day| {
            days.entry(day).or_default().push(DaySegment {
                activity_id: activity.id.clone(),
                name: activity.name.clone(),
                activity_type: activity.activity_type.clone(),
                executed: activity.executed,
                clipped_start: seg_start,
                clipped_end: seg_end,
                duration_hours: hours_between(seg_start, seg_end),
                all_day,
            });
        });
    }

    for segments in days.values_mut() {
        segments.sort_by_key(|segment| segment.clipped_start);
    }

    tracing::trace!(
        activities = activities.len(),
        days = days.len(),
        start = %window.start(),
        end = %window.end(),
        "decomposed activities"
    );

    days
}

/// Walks the days of a non-empty interval, from the date of `start` through
/// the date of the last instant before `end`.
///
/// An interval ending exactly at midnight does not reach into the next day.
fn for_each_day<F>(start: NaiveDateTime, end: NaiveDateTime, mut emit: F)
where
    F: FnMut(NaiveDate, NaiveDateTime, NaiveDateTime, bool),
{
    let last_day = (end - TimeDelta::nanoseconds(1)).date();
    let mut day = start.date();

    while day <= last_day {
        let day_start = midnight(day);
        let day_end = shift(day_start, TimeDelta::days(1));
        let seg_start = start.max(day_start);
        let seg_end = end.min(day_end);

        if seg_end > seg_start {
            emit(day, seg_start, seg_end, seg_start == day_start && seg_end == day_end);
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parse_timestamp;

    const EPSILON: f64 = 1e-9;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn activity(id: &str, kind: &str, start: &str, end: &str) -> Activity {
        let mut activity = Activity::new(id, ActivityType::from(kind), ts(start), ts(end));
        activity.id = ActivityId::new(id).unwrap();
        activity
    }

    fn window(start: &str, end: &str) -> Window {
        Window::new(ts(start), ts(end))
    }

    fn segments_for<'a>(days: &'a DayMap, id: &str) -> Vec<&'a DaySegment> {
        days.values()
            .flatten()
            .filter(|segment| segment.activity_id.as_str() == id)
            .collect()
    }

    #[test]
    fn overnight_activity_splits_at_midnight() {
        let activities = [activity("a", "work", "2024-01-01T22:00", "2024-01-02T02:00")];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-03T00:00"));

        assert_eq!(days.len(), 2);

        let first = &days[&date("2024-01-01")];
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].clipped_start, ts("2024-01-01T22:00"));
        assert_eq!(first[0].clipped_end, ts("2024-01-02T00:00"));
        assert!((first[0].duration_hours - 2.0).abs() < EPSILON);
        assert!(!first[0].all_day);

        let second = &days[&date("2024-01-02")];
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].clipped_start, ts("2024-01-02T00:00"));
        assert_eq!(second[0].clipped_end, ts("2024-01-02T02:00"));
        assert!((second[0].duration_hours - 2.0).abs() < EPSILON);
        assert!(!second[0].all_day);
    }

    #[test]
    fn exact_day_is_all_day() {
        let activities = [activity("a", "work", "2024-01-01T00:00", "2024-01-02T00:00")];
        let days = decompose_in(&activities, window("2023-12-31T00:00", "2024-01-03T00:00"));

        assert_eq!(days.len(), 1, "midnight end must not spill into Jan 2");
        let segments = &days[&date("2024-01-01")];
        assert_eq!(segments.len(), 1);
        assert!(segments[0].all_day);
        assert!((segments[0].duration_hours - 24.0).abs() < EPSILON);
    }

    #[test]
    fn zero_duration_activity_yields_nothing() {
        let activities = [activity("a", "work", "2024-01-01T10:00", "2024-01-01T10:00")];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-02T00:00"));
        assert!(days.is_empty());
    }

    #[test]
    fn reversed_activity_yields_nothing() {
        let activities = [activity("a", "work", "2024-01-01T12:00", "2024-01-01T10:00")];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-02T00:00"));
        assert!(days.is_empty());
    }

    #[test]
    fn activity_missing_bound_is_skipped() {
        let mut open_ended = activity("a", "work", "2024-01-01T10:00", "2024-01-01T12:00");
        open_ended.end = None;
        let days = decompose_in(&[open_ended], window("2024-01-01T00:00", "2024-01-02T00:00"));
        assert!(days.is_empty());
    }

    #[test]
    fn boundary_touching_activities_are_excluded() {
        let activities = [
            activity("before", "work", "2024-01-01T20:00", "2024-01-02T00:00"),
            activity("after", "work", "2024-01-03T00:00", "2024-01-03T04:00"),
        ];
        let days = decompose_in(&activities, window("2024-01-02T00:00", "2024-01-03T00:00"));
        assert!(days.is_empty());
    }

    #[test]
    fn activity_is_clipped_to_window() {
        let activities = [activity("a", "work", "2024-01-01T06:00", "2024-01-05T18:00")];
        let days = decompose_in(&activities, window("2024-01-02T12:00", "2024-01-04T06:00"));

        let keys: Vec<_> = days.keys().copied().collect();
        assert_eq!(
            keys,
            vec![date("2024-01-02"), date("2024-01-03"), date("2024-01-04")]
        );

        let first = &days[&date("2024-01-02")][0];
        assert_eq!(first.clipped_start, ts("2024-01-02T12:00"));
        assert!(!first.all_day);

        let middle = &days[&date("2024-01-03")][0];
        assert!(middle.all_day);

        let last = &days[&date("2024-01-04")][0];
        assert_eq!(last.clipped_end, ts("2024-01-04T06:00"));
        assert!((last.duration_hours - 6.0).abs() < EPSILON);
    }

    #[test]
    fn segments_tile_clipped_interval() {
        let activities = [
            activity("a", "work", "2024-01-01T07:15", "2024-01-04T03:45"),
            activity("b", "school", "2023-12-30T10:00", "2024-01-02T00:00"),
            activity("c", "hobbies", "2024-01-03T23:59", "2024-01-09T00:01"),
        ];
        let win = window("2024-01-01T00:00", "2024-01-06T00:00");
        let days = decompose_in(&activities, win);

        for source in &activities {
            let (start, end) = source.span().unwrap();
            let (clip_start, clip_end) = win.clip(start, end).unwrap();
            let segments = segments_for(&days, source.id.as_str());

            assert_eq!(segments.first().unwrap().clipped_start, clip_start);
            assert_eq!(segments.last().unwrap().clipped_end, clip_end);
            for pair in segments.windows(2) {
                assert_eq!(pair[0].clipped_end, pair[1].clipped_start, "gap or overlap");
            }

            let summed: f64 = segments.iter().map(|s| s.duration_hours).sum();
            assert!((summed - hours_between(clip_start, clip_end)).abs() < EPSILON);
        }
    }

    #[test]
    fn all_day_flag_matches_bounds() {
        let activities = [
            activity("a", "work", "2024-01-01T00:00", "2024-01-03T12:00"),
            activity("b", "work", "2024-01-01T00:01", "2024-01-02T00:00"),
        ];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-04T00:00"));

        for (day, segments) in &days {
            let day_start = midnight(*day);
            let day_end = shift(day_start, TimeDelta::days(1));
            for segment in segments {
                let expected =
                    segment.clipped_start == day_start && segment.clipped_end == day_end;
                assert_eq!(segment.all_day, expected);
                assert!(segment.clipped_start >= day_start);
                assert!(segment.clipped_end <= day_end);
                assert!(segment.clipped_end > segment.clipped_start);
            }
        }
    }

    #[test]
    fn segments_sorted_by_start_within_day() {
        let activities = [
            activity("late", "work", "2024-01-01T15:00", "2024-01-01T16:00"),
            activity("early", "work", "2024-01-01T08:00", "2024-01-01T09:00"),
            activity("tie", "school", "2024-01-01T15:00", "2024-01-01T15:30"),
        ];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-02T00:00"));
        let order: Vec<_> = days[&date("2024-01-01")]
            .iter()
            .map(|s| s.activity_id.as_str())
            .collect();
        assert_eq!(order, vec!["early", "late", "tie"]);
    }

    #[test]
    fn segment_copies_activity_fields() {
        let mut source = activity("a", "gardening", "2024-01-01T10:00", "2024-01-01T11:00");
        source.executed = true;
        let days = decompose_in(&[source], window("2024-01-01T00:00", "2024-01-02T00:00"));
        let segment = &days[&date("2024-01-01")][0];

        assert_eq!(segment.name, "a");
        assert_eq!(segment.activity_type, ActivityType::Other("gardening".into()));
        assert!(segment.executed);
    }

    #[test]
    fn reversed_window_is_normalized() {
        let activities = [activity("a", "work", "2024-01-01T10:00", "2024-01-01T11:00")];
        let forward = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-02T00:00"));
        let reversed = decompose_in(&activities, window("2024-01-02T00:00", "2024-01-01T00:00"));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn decompose_is_idempotent() {
        let activities = [
            activity("a", "work", "2024-01-01T22:00", "2024-01-02T02:00"),
            activity("b", "school", "2024-01-02T09:00", "2024-01-02T12:00"),
        ];
        let start = Some(ts("2024-01-01T00:00"));
        let end = Some(ts("2024-01-03T00:00"));
        assert_eq!(
            decompose(&activities, start, end),
            decompose(&activities, start, end)
        );
    }

    #[test]
    fn decompose_with_one_bound_spans_a_day() {
        let activities = [
            activity("in", "work", "2024-01-01T20:00", "2024-01-01T21:00"),
            activity("out", "work", "2024-01-02T13:00", "2024-01-02T14:00"),
        ];
        let days = decompose(&activities, Some(ts("2024-01-01T12:00")), None);
        assert_eq!(segments_for(&days, "in").len(), 1);
        assert!(segments_for(&days, "out").is_empty());
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let days = decompose_in(&[], window("2024-01-01T00:00", "2024-01-02T00:00"));
        assert!(days.is_empty());
    }

    #[test]
    fn engine_inputs_and_outputs_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Activity>();
        assert_send_sync::<Window>();
        assert_send_sync::<DayMap>();

        let activities = vec![activity("a", "work", "2024-01-01T22:00", "2024-01-02T02:00")];
        let days = std::thread::spawn(move || {
            decompose_in(&activities, window("2024-01-01T00:00", "2024-01-03T00:00"))
        })
        .join()
        .unwrap();
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn sub_millisecond_segment_keeps_its_duration() {
        let activities = [activity("a", "work", "2024-01-01T10:00:00", "2024-01-01T10:00:00.0005")];
        let days = decompose_in(&activities, window("2024-01-01T00:00", "2024-01-02T00:00"));

        let segments = segments_for(&days, "a");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].duration_hours > 0.0);
    }
}
