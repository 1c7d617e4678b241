//! Calendar week grid for the solved-case heatmap
//!
//! Turns sparse `(date, solvedCount)` records into Sunday-first weeks padded
//! to week boundaries, plus the month labels drawn above them. All dates are
//! UTC calendar days.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;

use crate::types::{ActivityDay, GridCell, MonthLabel, RadquizError, Result, Week};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Row labels, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Highest intensity tier
pub const MAX_LEVEL: u8 = 4;

/// Current calendar day in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a fixed-format `YYYY-MM-DD` day key
pub fn parse_day_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
        .map_err(|_| RadquizError::InvalidDate(key.to_string()))
}

/// Short month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Build Sunday-first weeks covering every day from the earliest to the
/// latest input date, padded out to whole weeks.
///
/// Input may be unsorted and may contain gaps. Days inside the input range
/// without a record get a count of 0; padding days are placeholders.
pub fn build_weeks(days: &[ActivityDay], today: NaiveDate) -> Vec<Week> {
    let mut sorted = days.to_vec();
    sorted.sort_by_key(|d| d.date);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let start = first.date;
    let end = last.date;

    let counts: HashMap<NaiveDate, u32> =
        sorted.iter().map(|d| (d.date, d.solved_count)).collect();

    let grid_start = start - Duration::days(start.weekday().num_days_from_sunday() as i64);
    let grid_end = end + Duration::days(6 - end.weekday().num_days_from_sunday() as i64);

    let mut weeks = Vec::new();
    let mut week: Week = Vec::with_capacity(7);

    for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
        let within_range = date >= start && date <= end;
        let solved_count = if within_range {
            counts.get(&date).copied().unwrap_or(0)
        } else {
            0
        };

        week.push(GridCell {
            date,
            solved_count,
            is_placeholder: !within_range,
            is_today: date == today,
        });

        if week.len() == 7 {
            weeks.push(std::mem::replace(&mut week, Vec::with_capacity(7)));
        }
    }

    // Unreachable with correct padding, but never drop cells
    if !week.is_empty() {
        weeks.push(week);
    }

    weeks
}

/// Month a week is labelled with: its first real day, or its first cell
/// when the whole week is padding
fn week_month(week: &Week) -> Option<u32> {
    week.iter()
        .find(|c| !c.is_placeholder)
        .or_else(|| week.first())
        .map(|c| c.date.month())
}

/// One label per month change, at the first week showing the new month
pub fn build_month_labels(weeks: &[Week]) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut last_labelled: Option<usize> = None;

    for (index, week) in weeks.iter().enumerate() {
        let Some(month) = week_month(week) else {
            continue;
        };
        let previous = last_labelled.and_then(|i| week_month(&weeks[i]));

        if previous != Some(month) {
            labels.push(MonthLabel {
                label: month_name(month),
                index,
            });
            last_labelled = Some(index);
        }
    }

    labels
}

/// Map a count to a display tier in `0..=4`.
///
/// Uses a ceiling, so any positive count lands in tier 1 or above.
pub fn intensity_level(count: u32, max_solved: u32) -> u8 {
    if max_solved == 0 || count == 0 {
        return 0;
    }
    let level = (count as f64 / max_solved as f64 * MAX_LEVEL as f64).ceil();
    level.min(MAX_LEVEL as f64) as u8
}

/// Largest single-day count in the input (0 when empty)
pub fn max_solved(days: &[ActivityDay]) -> u32 {
    days.iter().map(|d| d.solved_count).max().unwrap_or(0)
}
