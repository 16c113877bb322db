//! Add command for planning a new activity.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use clap::Args;
use cram_core::{Activity, ActivityType};
use cram_db::Database;

use crate::Config;
use crate::commands::util::{format_hours, parse_datetime, short_id};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Activity name.
    pub name: String,

    /// Activity type (work, school, hobbies, or any other tag).
    #[arg(long = "type", short = 't')]
    pub activity_type: Option<String>,

    /// Start time (e.g. 2026-01-15T09:00 or "2 hours ago").
    #[arg(long, value_parser = parse_datetime)]
    pub start: NaiveDateTime,

    /// End time.
    #[arg(long, value_parser = parse_datetime)]
    pub end: NaiveDateTime,

    /// Mark the activity as already completed.
    #[arg(long)]
    pub executed: bool,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &AddArgs,
    config: &Config,
) -> Result<Activity> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("activity name cannot be empty");
    }
    if args.end < args.start {
        bail!("end ({}) is before start ({})", args.end, args.start);
    }

    let activity_type = args
        .activity_type
        .as_deref()
        .map_or_else(|| config.default_type.clone(), ActivityType::from);

    let mut activity = Activity::new(name, activity_type, args.start, args.end);
    activity.executed = args.executed;
    if let Some(category) = &args.category {
        activity.category.clone_from(category);
    }
    if let Some(subcategory) = &args.subcategory {
        activity.subcategory.clone_from(subcategory);
    }

    db.add(&activity)?;
    writeln!(
        writer,
        "Added {} {} ({}, {})",
        short_id(&activity.id),
        activity.name,
        activity.activity_type,
        format_hours(activity.planned_hours())
    )?;
    Ok(activity)
}
