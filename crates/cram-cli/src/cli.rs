//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::delete::DeleteArgs;
use crate::commands::edit::EditArgs;
use crate::commands::import::ImportArgs;
use crate::commands::list::ListArgs;
use crate::commands::report::ReportArgs;
use crate::commands::timeline::TimelineArgs;
use crate::commands::toggle::ToggleArgs;

/// Activity planner.
///
/// Plans work, school, and hobby activities, splits them across calendar
/// days, and reports planned versus completed hours.
#[derive(Debug, Parser)]
#[command(name = "cram", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a new activity.
    Add(AddArgs),

    /// Change fields of an existing activity.
    Edit(EditArgs),

    /// Remove an activity.
    Delete(DeleteArgs),

    /// Flip an activity between done and pending.
    Toggle(ToggleArgs),

    /// List all stored activities.
    List(ListArgs),

    /// Show activities split by calendar day.
    Timeline(TimelineArgs),

    /// Summarize planned and completed hours for a period.
    Report(ReportArgs),

    /// Import activities from a JSON file.
    Import(ImportArgs),

    /// Export all activities as JSON to stdout.
    Export,
}
