//! Year-at-a-glance activity heatmap data.
//!
//! Rows come from the backend's calendar-grid query, one per practiced day,
//! already tagged with `week_index` (monotonic week number) and `dow`
//! (0 = Sunday … 6 = Saturday).

mod grid;

pub use grid::{build_calendar_grid_fixed, build_month_labels, calendar_day_color, CalendarGrid, Week};

pub use crate::core::datetime::format_date_label;

use serde::{Deserialize, Serialize};

pub const WEEKS: usize = 52;
pub const DAYS_PER_WEEK: usize = 7;

/// One day of aggregated practice as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarStat {
    pub stat_date: String,
    pub dow: i64,
    pub week_index: i64,
    #[serde(default)]
    pub answered: Option<u32>,
    #[serde(default)]
    pub correct: Option<u32>,
    /// 0..=1
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub avg_rt_ms: Option<f64>,
}

/// A grid cell: a real day, or a placeholder where no row exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub stat_date: Option<String>,
    pub accuracy: Option<f64>,
    pub answered: Option<u32>,
    pub correct: Option<u32>,
    pub avg_rt_ms: Option<f64>,
    #[serde(default)]
    pub dow: Option<i64>,
    #[serde(default)]
    pub week_index: Option<i64>,
    #[serde(default, rename = "isDummy")]
    pub is_dummy: bool,
}

impl CalendarDay {
    pub fn dummy() -> Self {
        Self {
            is_dummy: true,
            ..Self::default()
        }
    }
}

impl From<&CalendarStat> for CalendarDay {
    fn from(stat: &CalendarStat) -> Self {
        Self {
            stat_date: Some(stat.stat_date.clone()),
            accuracy: stat.accuracy,
            answered: stat.answered,
            correct: stat.correct,
            avg_rt_ms: stat.avg_rt_ms,
            dow: Some(stat.dow),
            week_index: Some(stat.week_index),
            is_dummy: false,
        }
    }
}
