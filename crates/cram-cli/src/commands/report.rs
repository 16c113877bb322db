//! Report command for period dashboards.
//!
//! This module implements `cram report` with day, week, and month periods
//! (optionally the previous one via `--last`) and output formats
//! (human-readable, JSON).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use cram_core::{
    Activity, Period, Summary, Totals, daily_totals, decompose_in, segment_totals, summarize,
};
use cram_db::Database;
use serde::Serialize;

use crate::commands::util::{format_hours, progress_bar};

/// Period length selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Period to report on.
    #[arg(long, value_enum, default_value_t = PeriodArg::Week)]
    pub period: PeriodArg,

    /// Report on the previous period instead of the current one.
    #[arg(long)]
    pub last: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub const fn resolve_period(&self) -> Period {
        match (self.period, self.last) {
            (PeriodArg::Day, false) => Period::Day,
            (PeriodArg::Day, true) => Period::LastDay,
            (PeriodArg::Week, false) => Period::Week,
            (PeriodArg::Week, true) => Period::LastWeek,
            (PeriodArg::Month, false) => Period::Month,
            (PeriodArg::Month, true) => Period::LastMonth,
        }
    }
}

/// Computed report data.
///
/// `summary` counts activities that start inside the period. `in_window`
/// counts the hours that actually fall inside it, so activities straddling a
/// boundary contribute only their clipped part.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub period: Period,
    pub summary: Summary,
    pub in_window: Totals,
    pub daily: BTreeMap<NaiveDate, Totals>,
}

/// Generates report data for `period` around `today`.
pub fn generate_report_data(
    activities: &[Activity],
    period: Period,
    today: NaiveDate,
    generated_at: DateTime<Utc>,
) -> ReportData {
    let window = period.window(today);
    let days = decompose_in(activities, window);
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    ReportData {
        generated_at,
        timezone,
        period,
        summary: summarize(activities, window),
        in_window: segment_totals(&days),
        daily: daily_totals(&days),
    }
}

/// Formats the period description for the report header.
fn format_period_description(data: &ReportData) -> String {
    let start_date = data.summary.window.start().date();
    match data.period {
        Period::Day | Period::LastDay => start_date.format("%A, %b %-d, %Y").to_string(),
        Period::Week | Period::LastWeek => {
            format!("Week of {}", start_date.format("%b %-d, %Y"))
        }
        Period::Month | Period::LastMonth => start_date.format("%B %Y").to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "PLANNER REPORT: {}", format_period_description(data)).unwrap();

    if data.summary.activity_count == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No activities planned this {}.", data.period.unit()).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'cram add' to plan one.").unwrap();
        return output;
    }

    let totals = &data.summary.totals;
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Activities:  {}", data.summary.activity_count).unwrap();
    writeln!(output, "Total:       {}", format_hours(totals.total_hours)).unwrap();
    writeln!(output, "Completed:   {}", format_hours(totals.completed_hours)).unwrap();
    writeln!(output, "Pending:     {}", format_hours(totals.pending_hours)).unwrap();
    writeln!(
        output,
        "In window:   {} ({} done)",
        format_hours(data.in_window.total_hours),
        format_hours(data.in_window.completed_hours)
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "BY TYPE").unwrap();
    writeln!(output, "───────").unwrap();
    for (kind, completion) in &data.summary.by_type {
        let ratio = completion.ratio();
        writeln!(
            output,
            "{:<10}  {:>5} / {:<5}  {}  {:>3}%",
            kind.as_str(),
            format_hours(completion.completed_hours),
            format_hours(completion.total_hours),
            progress_bar(ratio),
            percent(ratio)
        )
        .unwrap();
    }

    output
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ReportArgs,
    today: NaiveDate,
) -> Result<()> {
    let activities = db.load()?;
    let data = generate_report_data(&activities, args.resolve_period(), today, Utc::now());
    tracing::debug!(
        period = ?data.period,
        activities = data.summary.activity_count,
        "generated report"
    );

    if args.json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}
