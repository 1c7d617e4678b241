//! Plain-text and JSON output for the `grid` and `stats` commands

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::activity_grid::{intensity_level, WEEKDAY_NAMES};
use crate::types::{ActivityStats, GridCell, MonthLabel, Week};

/// Glyphs by intensity tier, lowest first
const LEVEL_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Columns taken by the weekday label ("Sun ")
const ROW_LABEL_WIDTH: usize = 4;

/// Columns per week: glyph + gap
const WEEK_WIDTH: usize = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellReport<'a> {
    #[serde(flatten)]
    pub cell: &'a GridCell,
    pub level: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridReport<'a> {
    pub today: NaiveDate,
    pub max_solved: u32,
    pub month_labels: &'a [MonthLabel],
    pub weeks: Vec<Vec<CellReport<'a>>>,
}

impl<'a> GridReport<'a> {
    pub fn new(
        weeks: &'a [Week],
        labels: &'a [MonthLabel],
        max_solved: u32,
        today: NaiveDate,
    ) -> Self {
        let weeks = weeks
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| CellReport {
                        cell,
                        level: intensity_level(cell.solved_count, max_solved),
                    })
                    .collect()
            })
            .collect();

        Self {
            today,
            max_solved,
            month_labels: labels,
            weeks,
        }
    }
}

fn glyph(cell: &GridCell, max_solved: u32) -> char {
    if cell.is_placeholder {
        return ' ';
    }
    LEVEL_GLYPHS[intensity_level(cell.solved_count, max_solved) as usize]
}

/// Month label row followed by one row per weekday
pub fn render_grid(weeks: &[Week], labels: &[MonthLabel], max_solved: u32) -> String {
    if weeks.is_empty() {
        return "No activity in range\n".to_string();
    }

    let mut header = vec![' '; ROW_LABEL_WIDTH + weeks.len() * WEEK_WIDTH];
    let mut next_free = 0;
    for label in labels {
        let pos = ROW_LABEL_WIDTH + label.index * WEEK_WIDTH;
        // Skip labels that would overlap the previous one
        if pos < next_free {
            continue;
        }
        for (i, ch) in label.label.chars().enumerate() {
            match header.get_mut(pos + i) {
                Some(slot) => *slot = ch,
                None => header.push(ch),
            }
        }
        next_free = pos + label.label.len() + 1;
    }

    let mut out = String::new();
    out.push_str(header.iter().collect::<String>().trim_end());
    out.push('\n');

    for (day, name) in WEEKDAY_NAMES.iter().enumerate() {
        let mut row = format!("{:<width$}", name, width = ROW_LABEL_WIDTH);
        for week in weeks {
            let ch = week.get(day).map_or(' ', |cell| glyph(cell, max_solved));
            row.push(ch);
            row.push(' ');
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_stats(stats: &ActivityStats) -> String {
    let best_day = match stats.best_day {
        Some(day) => format!("{} ({})", day.date.format("%Y-%m-%d"), day.solved_count),
        None => "-".to_string(),
    };

    let rows = [
        ("Total solved", stats.total_solved.to_string()),
        ("Active days", stats.active_days.to_string()),
        ("Most in a day", stats.max_solved.to_string()),
        ("Current streak", format!("{} days", stats.current_streak)),
        ("Longest streak", format!("{} days", stats.longest_streak)),
        ("Best day", best_day),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<16}{}\n", format!("{}:", label), value))
        .collect()
}
