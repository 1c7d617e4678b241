//! Tooltip popup for the selected heatmap cell

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::services::activity_grid::intensity_level;
use crate::services::tooltip::{TooltipOptions, TooltipPlacer};
use crate::tui::theme::{HeatmapLevel, Theme};
use crate::types::{self, GridCell, Placement};

/// Border + one column of padding on each side
const HORIZONTAL_CHROME: u16 = 4;
/// Top and bottom border
const VERTICAL_CHROME: u16 = 2;

/// Terminal cells to tooltip geometry
pub fn to_geometry(area: Rect) -> types::Rect {
    types::Rect::new(
        area.x as f64,
        area.y as f64,
        area.width as f64,
        area.height as f64,
    )
}

pub struct CellTooltip<'a> {
    cell: &'a GridCell,
    max_solved: u32,
    theme: Theme,
}

impl<'a> CellTooltip<'a> {
    pub fn new(cell: &'a GridCell, max_solved: u32) -> Self {
        Self {
            cell,
            max_solved,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn date_line(&self) -> String {
        self.cell.date.format("%a, %b %-d %Y").to_string()
    }

    fn count_line(&self) -> String {
        if self.cell.is_placeholder {
            return "Outside range".to_string();
        }
        match self.cell.solved_count {
            0 => "No cases solved".to_string(),
            1 => "1 case solved".to_string(),
            n => format!("{} cases solved", n),
        }
    }

    /// Measured (width, height) including the border
    pub fn size(&self) -> (u16, u16) {
        let text_width = self
            .date_line()
            .chars()
            .count()
            .max(self.count_line().chars().count()) as u16;
        (text_width + HORIZONTAL_CHROME, 2 + VERTICAL_CHROME)
    }

    /// Place the tooltip next to `anchor` inside `container`, clipped to it
    pub fn area(
        &self,
        anchor: Rect,
        container: Rect,
        options: &TooltipOptions,
    ) -> (Rect, Placement) {
        let (width, height) = self.size();
        let placer = TooltipPlacer::new(to_geometry(container));
        let position = placer.compute_position(
            to_geometry(anchor),
            types::Rect::sized(width as f64, height as f64),
            None,
            options,
        );

        let x = container.x + position.left.max(0.0).round() as u16;
        let y = container.y + position.top.max(0.0).round() as u16;
        let area = Rect::new(x, y, width, height).intersection(container);
        (area, position.placement)
    }
}

impl Widget for CellTooltip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let level = intensity_level(self.cell.solved_count, self.max_solved);
        let swatch = if self.cell.is_placeholder {
            self.theme.muted()
        } else {
            self.theme.heatmap_color(HeatmapLevel::from_level(level))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(swatch));
        let inner = block.inner(area);
        block.render(area, buf);

        let date_style = Style::default().fg(self.theme.date());
        let count_style = if self.cell.is_placeholder {
            Style::default().fg(self.theme.muted())
        } else {
            Style::default().fg(self.theme.text())
        };

        let lines = vec![
            Line::styled(format!(" {}", self.date_line()), date_style),
            Line::styled(format!(" {}", self.count_line()), count_style),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
