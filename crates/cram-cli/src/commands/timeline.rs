//! Timeline command: activities broken down by calendar day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use clap::Args;
use cram_core::{DayMap, DaySegment, Period, Window, daily_totals, decompose_in};
use cram_db::Database;
use serde::Serialize;

use crate::commands::util::{format_hours, parse_datetime};

#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Window start (defaults to today's midnight, or 24h before --end).
    #[arg(long, value_parser = parse_datetime)]
    pub start: Option<NaiveDateTime>,

    /// Window end (defaults to 24h after the start).
    #[arg(long, value_parser = parse_datetime)]
    pub end: Option<NaiveDateTime>,

    /// Show the current Monday-to-Sunday week.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub week: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TimelineJson<'a> {
    window: Window,
    days: &'a DayMap,
}

/// Picks the query window for the given arguments.
pub fn resolve_window(args: &TimelineArgs, today: NaiveDate) -> Window {
    if args.week {
        Period::Week.window(today)
    } else {
        Window::resolve(args.start, args.end, today)
    }
}

/// Renders a segment bound as a wall-clock time on `day`.
///
/// The following midnight prints as "24:00" so a segment reaching the end of
/// its day reads naturally.
fn format_clock(day: NaiveDate, ts: NaiveDateTime) -> String {
    let next_midnight = day.and_time(NaiveTime::MIN) + TimeDelta::days(1);
    if ts == next_midnight {
        "24:00".to_string()
    } else {
        ts.format("%H:%M").to_string()
    }
}

fn format_segment(day: NaiveDate, segment: &DaySegment) -> String {
    let span = if segment.all_day {
        "all day".to_string()
    } else {
        format!(
            "{}-{}",
            format_clock(day, segment.clipped_start),
            format_clock(day, segment.clipped_end)
        )
    };
    let mark = if segment.executed { "[x]" } else { "[ ]" };
    format!(
        "  {span:<11}  {:>6}  {:<8}  {mark} {}",
        format_hours(segment.duration_hours),
        segment.activity_type.as_str(),
        segment.name
    )
}

/// Formats a decomposition as a human-readable day-by-day listing.
pub fn format_timeline(window: Window, days: &DayMap) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "TIMELINE {} to {}",
        window.start().format("%Y-%m-%d %H:%M"),
        window.end().format("%Y-%m-%d %H:%M")
    )
    .unwrap();

    if days.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No activities in this window.").unwrap();
        return output;
    }

    let totals = daily_totals(days);
    for (day, segments) in days {
        let day_totals = totals.get(day).copied().unwrap_or_default();
        writeln!(output).unwrap();
        writeln!(
            output,
            "{}  {} planned, {} done",
            day.format("%a %Y-%m-%d"),
            format_hours(day_totals.total_hours),
            format_hours(day_totals.completed_hours)
        )
        .unwrap();
        for segment in segments {
            writeln!(output, "{}", format_segment(*day, segment)).unwrap();
        }
    }
    output
}

/// Formats a decomposition as JSON.
pub fn format_timeline_json(window: Window, days: &DayMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TimelineJson { window, days })?)
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &TimelineArgs,
    today: NaiveDate,
) -> Result<()> {
    let activities = db.load()?;
    let window = resolve_window(args, today);
    let days = decompose_in(&activities, window);
    tracing::debug!(
        start = %window.start(),
        end = %window.end(),
        days = days.len(),
        "built timeline"
    );

    if args.json {
        writeln!(writer, "{}", format_timeline_json(window, &days)?)?;
    } else {
        write!(writer, "{}", format_timeline(window, &days))?;
    }
    Ok(())
}
