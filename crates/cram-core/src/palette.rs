//! Colors for activity types.
//!
//! A stateless lookup renderers can use to color blocks and donuts. Planned
//! activities use a soft shade, executed ones a stronger shade of the same hue.
//! Unknown types borrow the work colors.

use crate::activity_type::ActivityType;

/// Planned (soft) color for a type, as `#rrggbb`.
pub fn planned_color(activity_type: &ActivityType) -> &'static str {
    match activity_type {
        ActivityType::School => "#90ee90",
        ActivityType::Hobbies => "#dda0dd",
        ActivityType::Work | ActivityType::Other(_) => "#e8b4a0",
    }
}

/// Executed (strong) color for a type, as `#rrggbb`.
pub fn executed_color(activity_type: &ActivityType) -> &'static str {
    match activity_type {
        ActivityType::School => "#2d5016",
        ActivityType::Hobbies => "#8b008b",
        ActivityType::Work | ActivityType::Other(_) => "#c0503b",
    }
}

/// Color for an activity given its completion state.
pub fn color_for(activity_type: &ActivityType, executed: bool) -> &'static str {
    if executed {
        executed_color(activity_type)
    } else {
        planned_color(activity_type)
    }
}
