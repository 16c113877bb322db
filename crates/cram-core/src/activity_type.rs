//! Activity type tags.
//!
//! The set is open: the planner ships with work/school/hobbies, but any other
//! tag found in stored data is kept verbatim rather than rejected.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category tag of an activity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ActivityType {
    #[default]
    Work,
    School,
    Hobbies,
    /// Any tag outside the built-in set, stored as written.
    Other(String),
}

impl ActivityType {
    /// The built-in tags, in display order.
    pub const KNOWN: [Self; 3] = [Self::Work, Self::School, Self::Hobbies];

    /// Returns the tag string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::School => "school",
            Self::Hobbies => "hobbies",
            Self::Other(tag) => tag,
        }
    }

    /// Returns true for tags outside the built-in set.
    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "work" => Self::Work,
            "school" => Self::School,
            "hobbies" => Self::Hobbies,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for ActivityType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ActivityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}
