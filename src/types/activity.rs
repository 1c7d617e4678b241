//! Activity types for the solved-case heatmap

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's count of solved cases, as delivered by the backend.
///
/// Serialized as `{"date": "YYYY-MM-DD", "solvedCount": N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub solved_count: u32,
}

impl ActivityDay {
    pub fn new(date: NaiveDate, solved_count: u32) -> Self {
        Self { date, solved_count }
    }
}

/// A single day in the heatmap grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub date: NaiveDate,
    pub solved_count: u32,
    /// Pads the grid to a full week outside the supplied range.
    /// Never a real zero-activity day.
    pub is_placeholder: bool,
    pub is_today: bool,
}

/// Seven cells, Sunday through Saturday
pub type Week = Vec<GridCell>;

/// Month name shown above the first week of that month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub label: &'static str,
    pub index: usize,
}

/// Progress statistics derived from activity days
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_solved: u64,
    pub active_days: u32,
    pub max_solved: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub best_day: Option<ActivityDay>,
}
