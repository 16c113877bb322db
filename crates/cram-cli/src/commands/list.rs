//! List command for showing stored activities.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use cram_core::Activity;
use cram_db::{Database, activities_to_json};

use crate::commands::util::{format_hours, short_id};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

fn format_bound(ts: Option<NaiveDateTime>) -> String {
    ts.map_or_else(|| "?".to_string(), |ts| ts.format("%Y-%m-%d %H:%M").to_string())
}

/// Formats activities as an aligned table, one per line.
pub fn format_list(activities: &[Activity]) -> String {
    let mut output = String::new();

    if activities.is_empty() {
        writeln!(output, "No activities recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'cram add' to plan one.").unwrap();
        return output;
    }

    for activity in activities {
        let mark = if activity.executed { "[x]" } else { "[ ]" };
        writeln!(
            output,
            "{:<8}  {:<16}  {:<16}  {:>6}  {:<8}  {mark} {}",
            short_id(&activity.id),
            format_bound(activity.start),
            format_bound(activity.end),
            format_hours(activity.planned_hours()),
            activity.activity_type.as_str(),
            activity.name,
        )
        .unwrap();
    }
    output
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &ListArgs) -> Result<()> {
    let activities = db.load()?;
    if args.json {
        writeln!(writer, "{}", activities_to_json(&activities)?)?;
    } else {
        write!(writer, "{}", format_list(&activities))?;
    }
    Ok(())
}
