//! Edit command for changing an existing activity.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::Args;
use cram_core::ActivityType;
use cram_db::Database;

use crate::commands::util::{parse_datetime, resolve_id, short_id};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Activity ID or unique prefix.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type", short = 't')]
    pub activity_type: Option<String>,

    #[arg(long, value_parser = parse_datetime)]
    pub start: Option<NaiveDateTime>,

    #[arg(long, value_parser = parse_datetime)]
    pub end: Option<NaiveDateTime>,

    /// Set the completion flag (true/false).
    #[arg(long)]
    pub executed: Option<bool>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, db: &mut Database, args: &EditArgs) -> Result<()> {
    let id = resolve_id(db, &args.id)?;
    let mut activity = db
        .get(id.as_str())?
        .with_context(|| format!("activity not found: {id}"))?;

    if let Some(name) = &args.name {
        let name = name.trim();
        if name.is_empty() {
            bail!("activity name cannot be empty");
        }
        activity.name = name.to_string();
    }
    if let Some(kind) = &args.activity_type {
        activity.activity_type = ActivityType::from(kind.as_str());
    }
    if let Some(start) = args.start {
        activity.start = Some(start);
    }
    if let Some(end) = args.end {
        activity.end = Some(end);
    }
    if let Some(executed) = args.executed {
        activity.executed = executed;
    }
    if let Some(category) = &args.category {
        activity.category.clone_from(category);
    }
    if let Some(subcategory) = &args.subcategory {
        activity.subcategory.clone_from(subcategory);
    }

    if let Some((start, end)) = activity.span() {
        if end < start {
            bail!("end ({end}) is before start ({start})");
        }
    }

    if !db.update(&activity)? {
        bail!("activity not found: {id}");
    }
    writeln!(writer, "Updated {} {}", short_id(&activity.id), activity.name)?;
    Ok(())
}
