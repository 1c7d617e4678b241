//! Progress statistics (totals and streaks) over activity days

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::types::{ActivityDay, ActivityStats};

impl ActivityStats {
    /// Compute statistics as of `today` (UTC).
    pub fn from_days(days: &[ActivityDay], today: NaiveDate) -> Self {
        if days.is_empty() {
            return Self::default();
        }

        let mut sorted = days.to_vec();
        sorted.sort_by_key(|d| d.date);

        let mut total_solved: u64 = 0;
        let mut best_day: Option<ActivityDay> = None;

        for day in &sorted {
            total_solved = total_solved.saturating_add(day.solved_count as u64);

            match &best_day {
                None if day.solved_count > 0 => best_day = Some(*day),
                Some(best) if day.solved_count > best.solved_count => best_day = Some(*day),
                _ => {}
            }
        }

        let active: BTreeSet<NaiveDate> = sorted
            .iter()
            .filter(|d| d.solved_count > 0)
            .map(|d| d.date)
            .collect();

        Self {
            total_solved,
            active_days: active.len() as u32,
            max_solved: best_day.map(|d| d.solved_count).unwrap_or(0),
            current_streak: current_streak(&active, today),
            longest_streak: longest_streak(&active),
            best_day,
        }
    }
}

/// Longest run of consecutive active days
pub fn longest_streak(active: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in active {
        run = match prev {
            Some(p) if p + Duration::days(1) == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}

/// Run of consecutive active days ending today. A streak that ended
/// yesterday is still current until today is over.
pub fn current_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut cursor = if active.contains(&today) {
        today
    } else if active.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while active.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}
