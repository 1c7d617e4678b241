//! Solved-case heatmap widget: one column per week, Sunday on top

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::activity_grid::{intensity_level, WEEKDAY_NAMES};
use crate::tui::theme::{HeatmapLevel, Theme};
use crate::types::{GridCell, MonthLabel, Week};

/// Cell dimensions for grid layout with borders
pub const CELL_HEIGHT: u16 = 2; // 1 row content + 1 row border
pub const CELL_WIDTH: u16 = 3; // 2 chars content + 1 border
pub const LABEL_WIDTH: u16 = 4; // "Sun " prefix

/// Top border + 7 content/separator pairs + month label row
pub const HEATMAP_HEIGHT: u16 = 1 + 7 * CELL_HEIGHT + 1;

/// Box drawing characters for grid border
const BOX_TOP: [&str; 3] = ["┌", "┬", "┐"];
const BOX_MIDDLE: [&str; 3] = ["├", "┼", "┤"];
const BOX_BOTTOM: [&str; 3] = ["└", "┴", "┘"];
const BOX_HORIZONTAL: &str = "─";
const BOX_VERTICAL: &str = "│";

const FILLED: &str = "██";
const SELECTED: &str = "▐▌";

/// Heatmap widget for ratatui
pub struct Heatmap<'a> {
    weeks: &'a [Week],
    labels: &'a [MonthLabel],
    max_solved: u32,
    first_week: usize,
    selected: Option<(usize, usize)>,
    theme: Theme,
}

impl<'a> Heatmap<'a> {
    pub fn new(weeks: &'a [Week], labels: &'a [MonthLabel], max_solved: u32) -> Self {
        Self {
            weeks,
            labels,
            max_solved,
            first_week: 0,
            selected: None,
            theme: Theme::default(),
        }
    }

    pub fn with_scroll(mut self, first_week: usize) -> Self {
        self.first_week = first_week;
        self
    }

    /// Highlight the cell at (week, day)
    pub fn with_selected(mut self, selected: Option<(usize, usize)>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Number of week columns that fit in `width`
    pub fn weeks_for_width(width: u16) -> usize {
        let available = width.saturating_sub(LABEL_WIDTH + 1);
        (available / CELL_WIDTH) as usize
    }

    /// First visible week that keeps `selected_week` on screen, showing
    /// the most recent weeks when possible
    pub fn scroll_for(total: usize, visible: usize, selected_week: usize) -> usize {
        if visible == 0 || total <= visible {
            return 0;
        }
        let last_start = total - visible;
        if selected_week >= last_start {
            last_start
        } else {
            selected_week.saturating_sub(visible - 1)
        }
    }

    fn visible_weeks(&self, area: Rect) -> usize {
        Self::weeks_for_width(area.width).min(self.weeks.len().saturating_sub(self.first_week))
    }

    /// Calculate x_offset for centering the heatmap
    fn x_offset(&self, area: Rect, visible: usize) -> u16 {
        let heatmap_width = LABEL_WIDTH + 1 + (visible as u16 * CELL_WIDTH);
        area.width.saturating_sub(heatmap_width) / 2
    }

    /// Screen area of a cell's content, if it is visible
    pub fn cell_area(&self, area: Rect, week: usize, day: usize) -> Option<Rect> {
        let visible = self.visible_weeks(area);
        if week < self.first_week || week >= self.first_week + visible || day >= 7 {
            return None;
        }

        let col = (week - self.first_week) as u16;
        let x = area.x + self.x_offset(area, visible) + LABEL_WIDTH + 1 + col * CELL_WIDTH;
        let y = area.y + 1 + day as u16 * CELL_HEIGHT;
        if x + 2 > area.x + area.width || y >= area.y + area.height {
            return None;
        }
        Some(Rect::new(x, y, 2, 1))
    }

    /// Render a horizontal rule: ┌──┬──┐, ├──┼──┤ or └──┴──┘
    fn render_rule(
        &self,
        area: Rect,
        buf: &mut Buffer,
        y: u16,
        visible: usize,
        glyphs: [&str; 3],
    ) {
        let start_x = area.x + self.x_offset(area, visible) + LABEL_WIDTH;
        let max_x = area.x + area.width;
        let border_style = Style::default().fg(self.theme.muted());

        if start_x < max_x {
            buf.set_string(start_x, y, glyphs[0], border_style);
        }

        for col in 0..visible {
            let x = start_x + 1 + (col as u16 * CELL_WIDTH);
            if x + 2 >= max_x {
                break;
            }
            buf.set_string(x, y, BOX_HORIZONTAL, border_style);
            buf.set_string(x + 1, y, BOX_HORIZONTAL, border_style);

            let joint = if col + 1 < visible { glyphs[1] } else { glyphs[2] };
            buf.set_string(x + 2, y, joint, border_style);
        }
    }

    fn cell_style(&self, cell: &GridCell) -> Style {
        let level = intensity_level(cell.solved_count, self.max_solved);
        let color = self.theme.heatmap_color(HeatmapLevel::from_level(level));
        let style = Style::default().fg(color);
        if cell.is_today {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Render one weekday row: Sun │██│██│  │
    fn render_content_row(
        &self,
        area: Rect,
        buf: &mut Buffer,
        y: u16,
        day: usize,
        visible: usize,
    ) {
        let x_offset = self.x_offset(area, visible);
        let start_x = area.x + x_offset + LABEL_WIDTH;
        let max_x = area.x + area.width;
        let border_style = Style::default().fg(self.theme.muted());

        buf.set_string(area.x + x_offset, y, WEEKDAY_NAMES[day], border_style);
        if start_x < max_x {
            buf.set_string(start_x, y, BOX_VERTICAL, border_style);
        }

        for col in 0..visible {
            let week = self.first_week + col;
            let x = start_x + 1 + (col as u16 * CELL_WIDTH);
            if x + 2 >= max_x {
                break;
            }

            if self.selected == Some((week, day)) {
                buf.set_string(x, y, SELECTED, Style::default().fg(self.theme.accent()));
            } else if let Some(cell) = self.weeks[week].get(day) {
                // Padding days stay blank
                if !cell.is_placeholder {
                    buf.set_string(x, y, FILLED, self.cell_style(cell));
                }
            }

            buf.set_string(x + 2, y, BOX_VERTICAL, border_style);
        }
    }

    /// Render month labels below the grid
    fn render_month_labels(&self, area: Rect, buf: &mut Buffer, y: u16, visible: usize) {
        let start_x = area.x + self.x_offset(area, visible) + LABEL_WIDTH + 1;
        let style = Style::default().fg(self.theme.muted());

        for label in self.labels {
            if label.index < self.first_week || label.index >= self.first_week + visible {
                continue;
            }
            let x = start_x + ((label.index - self.first_week) as u16 * CELL_WIDTH);
            if x + 3 > area.x + area.width {
                break;
            }
            buf.set_string(x, y, label.label, style);
        }
    }
}

impl Widget for Heatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.visible_weeks(area);
        if visible == 0 || area.height == 0 {
            return;
        }

        self.render_rule(area, buf, area.y, visible, BOX_TOP);

        for day in 0..7 {
            let content_y = area.y + 1 + (day as u16 * CELL_HEIGHT);
            if content_y >= area.y + area.height {
                break;
            }
            self.render_content_row(area, buf, content_y, day, visible);

            let separator_y = content_y + 1;
            if separator_y < area.y + area.height {
                let glyphs = if day < 6 { BOX_MIDDLE } else { BOX_BOTTOM };
                self.render_rule(area, buf, separator_y, visible, glyphs);
            }
        }

        let month_label_y = area.y + HEATMAP_HEIGHT - 1;
        if month_label_y < area.y + area.height {
            self.render_month_labels(area, buf, month_label_y, visible);
        }
    }
}
