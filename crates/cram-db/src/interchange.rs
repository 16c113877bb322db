//! JSON interchange format.
//!
//! A JSON array of activity objects with `id, name, type, start, end,
//! executed, category, subcategory`. Missing fields take their defaults and
//! unknown fields are carried through untouched.

use cram_core::Activity;

use crate::DbError;

/// Parses an activities JSON document.
pub fn activities_from_json(json: &str) -> Result<Vec<Activity>, DbError> {
    Ok(serde_json::from_str(json)?)
}

/// Renders activities as a pretty-printed JSON document.
pub fn activities_to_json(activities: &[Activity]) -> Result<String, DbError> {
    Ok(serde_json::to_string_pretty(activities)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use cram_core::ActivityType;
    use serde_json::{Value, json};

    #[test]
    fn parses_legacy_file() {
        let json = r#"[
            {
                "id": "3f2c",
                "name": "Essay",
                "type": "school",
                "start": "2024-01-01T09:00:00",
                "end": "2024-01-01T12:30:00",
                "executed": false
            },
            {
                "name": "Climbing",
                "type": "hobbies",
                "start": "2024-01-02T18:00:00",
                "end": "2024-01-02T20:00:00",
                "executed": true,
                "category": "sport",
                "subcategory": "bouldering"
            }
        ]"#;

        let activities = activities_from_json(json).unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].id.as_str(), "3f2c");
        assert_eq!(activities[0].category, "general");
        assert_eq!(activities[1].activity_type, ActivityType::Hobbies);
        assert_eq!(activities[1].subcategory, "bouldering");
        assert!(!activities[1].id.as_str().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            activities_from_json(r#"{"id": "x"}"#),
            Err(DbError::Json(_))
        ));
    }

    #[test]
    fn export_keeps_extra_fields() {
        let input = json!([{
            "id": "a1",
            "name": "Piano",
            "type": "music",
            "start": "2024-01-01T18:00:00",
            "end": "2024-01-01T19:00:00",
            "executed": false,
            "category": "general",
            "subcategory": "",
            "reminder": {"minutes": 10}
        }]);

        let activities = activities_from_json(&input.to_string()).unwrap();
        let output: Value = serde_json::from_str(&activities_to_json(&activities).unwrap()).unwrap();
        assert_eq!(output, input);
    }
}
