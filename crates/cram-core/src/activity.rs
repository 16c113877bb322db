//! Planned activities.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::activity_type::ActivityType;
use crate::types::ActivityId;

/// Category assigned when a record has none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Timestamp layouts accepted on load, most specific first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A named, timed, categorized unit of planned or completed work.
///
/// Timestamps are local wall-clock times. Either bound may be missing when the
/// stored value was absent or not a timestamp; such an activity has zero
/// planned hours and never shows up in a decomposition.
///
/// Fields this type does not know about are kept in [`Activity::extra`] so a
/// load/save cycle is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Missing, null, or empty IDs are replaced with a fresh one on load.
    #[serde(default = "ActivityId::generate", deserialize_with = "id_or_generate")]
    pub id: ActivityId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,

    #[serde(default, with = "lenient_timestamp")]
    pub start: Option<NaiveDateTime>,

    #[serde(default, with = "lenient_timestamp")]
    pub end: Option<NaiveDateTime>,

    /// Whether the activity was completed.
    #[serde(default)]
    pub executed: bool,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub subcategory: String,

    /// Unrecognized fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn id_or_generate<'de, D>(deserializer: D) -> Result<ActivityId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    Ok(raw
        .and_then(|id| ActivityId::new(id).ok())
        .unwrap_or_else(ActivityId::generate))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Activity {
    /// Creates a pending activity with a fresh ID.
    pub fn new(
        name: impl Into<String>,
        activity_type: ActivityType,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: ActivityId::generate(),
            name: name.into(),
            activity_type,
            start: Some(start),
            end: Some(end),
            executed: false,
            category: default_category(),
            subcategory: String::new(),
            extra: Map::new(),
        }
    }

    /// Returns both bounds when present.
    pub const fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Nominal duration in hours, independent of any window.
    ///
    /// Missing bounds and `end <= start` both yield `0.0`.
    pub fn planned_hours(&self) -> f64 {
        self.span()
            .map_or(0.0, |(start, end)| hours_between(start, end))
    }
}

/// Hours from `start` to `end`, clamped at zero. Keeps nanosecond precision.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    if end <= start {
        return 0.0;
    }
    let delta: TimeDelta = end - start;
    let seconds = delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9;
    seconds / 3600.0
}

/// Parses a stored or user-supplied timestamp.
///
/// Accepts ISO 8601 with `T` or a space separator, with or without seconds,
/// and bare dates (midnight). Values carrying an offset are converted to local
/// time. Anything else yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Formats a timestamp the way it is persisted.
///
/// Sub-second digits are written only when non-zero.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

mod lenient_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format_timestamp(*ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Non-string and unparseable values load as a missing bound.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .and_then(super::parse_timestamp))
    }
}
