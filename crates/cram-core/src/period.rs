//! Calendar periods used by dashboards and reports.

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::Serialize;

use crate::window::Window;

/// Report period relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    LastDay,
    Week,
    LastWeek,
    Month,
    LastMonth,
}

impl Period {
    /// The half-open local window for this period around `today`.
    ///
    /// Weeks run Monday 00:00 to the next Monday 00:00.
    pub fn window(self, today: NaiveDate) -> Window {
        match self {
            Self::Day => Window::day(today),
            Self::LastDay => Window::day(today - TimeDelta::days(1)),
            Self::Week => week_window(week_start(today)),
            Self::LastWeek => week_window(week_start(today) - TimeDelta::days(7)),
            Self::Month => month_window(month_start(today)),
            Self::LastMonth => {
                let first = month_start(today)
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(NaiveDate::MIN);
                month_window(first)
            }
        }
    }

    /// Short label for headers, e.g. "day" or "week".
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Day | Self::LastDay => "day",
            Self::Week | Self::LastWeek => "week",
            Self::Month | Self::LastMonth => "month",
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.day0()))
}

fn week_window(monday: NaiveDate) -> Window {
    Window::days(monday, monday + TimeDelta::days(6))
}

fn month_window(first: NaiveDate) -> Window {
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    Window::days(first, last)
}
