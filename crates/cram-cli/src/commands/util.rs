//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDateTime, TimeDelta};
use cram_core::{ActivityId, parse_timestamp};
use cram_db::Database;
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+(ago|from now)$").unwrap()
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Number of ID characters shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Parse a local datetime argument.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30", "2026-01-15 10:30:00", "2026-01-15"
/// - Relative: "2 hours ago", "30 minutes from now", "1 week ago"
pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    if let Some(ts) = parse_timestamp(s) {
        return Ok(ts);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s.trim()) else {
        bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let offset = TimeDelta::minutes(n * minutes_per_unit);
    let now = Local::now().naive_local();
    Ok(if &caps[3] == "ago" {
        now - offset
    } else {
        now + offset
    })
}

/// Resolves a full ID or a unique ID prefix to a stored activity ID.
pub fn resolve_id(db: &Database, prefix: &str) -> anyhow::Result<ActivityId> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("activity ID cannot be empty");
    }

    if let Some(activity) = db.get(prefix)? {
        return Ok(activity.id);
    }

    let mut matches: Vec<_> = db
        .load()?
        .into_iter()
        .filter(|activity| activity.id.as_str().starts_with(prefix))
        .map(|activity| activity.id)
        .collect();

    match matches.len() {
        0 => bail!("activity not found: {prefix}"),
        1 => Ok(matches.remove(0)),
        n => bail!("ambiguous activity ID {prefix}: matches {n} activities"),
    }
}

/// Shortened ID for display.
pub fn short_id(id: &ActivityId) -> &str {
    let id = id.as_str();
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

/// Formats hours with one decimal, e.g. "2.5h".
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

/// Generates a 10-character progress bar for a ratio in `[0, 1]`.
///
/// Non-zero ratios under 5% still get a single block.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(ratio: f64) -> String {
    let filled = if ratio <= 0.0 || ratio.is_nan() {
        0
    } else if ratio < 0.05 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
