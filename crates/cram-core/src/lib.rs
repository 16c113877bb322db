//! Core domain logic for the activity planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Activities: the planned units of work and their lenient timestamp handling
//! - Decomposition: splitting activities into per-day segments for a window
//! - Statistics: total/completed/pending hours, grouped by type or predicate
//! - Periods: local day/week/month windows used by dashboards

mod activity;
pub mod activity_type;
mod decompose;
pub mod palette;
pub mod period;
mod stats;
pub mod types;
mod window;

pub use activity::{Activity, DEFAULT_CATEGORY, format_timestamp, parse_timestamp};
pub use activity_type::ActivityType;
pub use decompose::{DayMap, DaySegment, decompose, decompose_in};
pub use period::Period;
pub use stats::{
    Completion, Summary, Totals, daily_totals, filter_in_window, segment_totals, summarize,
    totals, totals_by_predicate, totals_by_type,
};
pub use types::{ActivityId, ValidationError};
pub use window::Window;
