//! Application state and event loop

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::services::activity_grid::{build_month_labels, build_weeks};
use crate::services::tooltip::TooltipOptions;
use crate::services::{load_activity, ActivityCacheService, ActivitySource, DayWindow};
use crate::types::{ActivityDay, ActivityStats, GridCell, MonthLabel, Week};

use super::theme::Theme;
use super::widgets::heatmap::{Heatmap, HEATMAP_HEIGHT};
use super::widgets::tooltip::CellTooltip;

/// Application state
pub enum AppState {
    /// Waiting for the activity source
    Loading,
    /// Ready with loaded data
    Ready { data: Box<AppData> },
    /// Error state
    Error { message: String },
}

/// Loaded heatmap data
pub struct AppData {
    pub weeks: Vec<Week>,
    pub labels: Vec<MonthLabel>,
    pub stats: ActivityStats,
}

impl AppData {
    pub fn from_days(days: &[ActivityDay], today: NaiveDate) -> Self {
        let weeks = build_weeks(days, today);
        let labels = build_month_labels(&weeks);
        Self {
            weeks,
            labels,
            stats: ActivityStats::from_days(days, today),
        }
    }

    /// Today's cell, else the most recent real day
    fn home_position(&self) -> (usize, usize) {
        let cells = self
            .weeks
            .iter()
            .enumerate()
            .flat_map(|(w, week)| week.iter().enumerate().map(move |(d, cell)| (w, d, cell)));

        let mut latest = None;
        for (w, d, cell) in cells {
            if cell.is_today {
                return (w, d);
            }
            if !cell.is_placeholder {
                latest = Some((w, d));
            }
        }
        latest.unwrap_or((0, 0))
    }
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    /// (week, day) of the highlighted cell
    selected: (usize, usize),
    show_tooltip: bool,
    theme: Theme,
    tooltip_options: TooltipOptions,
}

impl App {
    /// Create a new app in loading state
    pub fn new(theme: Theme, tooltip_options: TooltipOptions) -> Self {
        Self {
            state: AppState::Loading,
            should_quit: false,
            selected: (0, 0),
            show_tooltip: true,
            theme,
            tooltip_options,
        }
    }

    /// Apply data loading result to app state
    pub fn apply_data_result(&mut self, result: Result<Box<AppData>, String>) {
        match result {
            Ok(data) => {
                self.selected = data.home_position();
                self.state = AppState::Ready { data };
            }
            Err(message) => self.state = AppState::Error { message },
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1, 0),
                    KeyCode::Right | KeyCode::Char('l') => self.move_selection(1, 0),
                    KeyCode::Up | KeyCode::Char('k') => self.move_selection(0, -1),
                    KeyCode::Down | KeyCode::Char('j') => self.move_selection(0, 1),
                    KeyCode::Home => self.move_selection(isize::MIN, 0),
                    KeyCode::End => self.move_selection(isize::MAX, 0),
                    KeyCode::Char('t') => {
                        if let AppState::Ready { data } = &self.state {
                            self.selected = data.home_position();
                        }
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.show_tooltip = !self.show_tooltip;
                    }
                    _ => {}
                }
            }
        }
    }

    fn move_selection(&mut self, weeks: isize, days: isize) {
        let AppState::Ready { data } = &self.state else {
            return;
        };
        let Some(last_week) = data.weeks.len().checked_sub(1) else {
            return;
        };

        let (week, day) = self.selected;
        let week = week.saturating_add_signed(weeks).min(last_week);
        let last_day = data.weeks[week].len().saturating_sub(1);
        let day = day.saturating_add_signed(days).min(last_day);
        self.selected = (week, day);
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected(&self) -> (usize, usize) {
        self.selected
    }

    pub fn selected_cell(&self) -> Option<&GridCell> {
        match &self.state {
            AppState::Ready { data } => data
                .weeks
                .get(self.selected.0)
                .and_then(|week| week.get(self.selected.1)),
            _ => None,
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_header(&self, stats: &ActivityStats, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(self.theme.muted());
        let value = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let streak = Style::default()
            .fg(self.theme.streak())
            .add_modifier(Modifier::BOLD);

        let line = Line::from(vec![
            Span::styled("Solved ", label),
            Span::styled(stats.total_solved.to_string(), value),
            Span::styled("   Active days ", label),
            Span::styled(stats.active_days.to_string(), value),
            Span::styled("   Streak ", label),
            Span::styled(stats.current_streak.to_string(), streak),
            Span::styled(format!(" (best {})", stats.longest_streak), label),
        ]);
        Paragraph::new(line).centered().render(area, buf);
    }

    fn render_hints(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let text = Style::default().fg(self.theme.muted());
        let line = Line::from(vec![
            Span::styled("←→", key),
            Span::styled(" week  ", text),
            Span::styled("↑↓", key),
            Span::styled(" day  ", text),
            Span::styled("enter", key),
            Span::styled(" tooltip  ", text),
            Span::styled("t", key),
            Span::styled(" today  ", text),
            Span::styled("q", key),
            Span::styled(" quit", text),
        ]);
        Paragraph::new(line).centered().render(area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading => {
                let y = area.y + area.height / 2;
                let text = "Loading activity...";
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, text, Style::default().fg(self.theme.muted()));
            }
            AppState::Ready { data } => {
                let chunks = Layout::vertical([
                    Constraint::Length(1),              // [0] Stats
                    Constraint::Length(1),              // [1] Padding
                    Constraint::Length(HEATMAP_HEIGHT), // [2] Heatmap
                    Constraint::Length(1),              // [3] Padding
                    Constraint::Length(1),              // [4] Key hints
                    Constraint::Min(0),                 // Remaining
                ])
                .split(area);

                self.render_header(&data.stats, chunks[0], buf);

                if data.weeks.is_empty() {
                    let text = "No activity yet";
                    let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                    buf.set_string(x, chunks[2].y, text, Style::default().fg(self.theme.muted()));
                    self.render_hints(chunks[4], buf);
                    return;
                }

                let visible = Heatmap::weeks_for_width(chunks[2].width);
                let first_week = Heatmap::scroll_for(data.weeks.len(), visible, self.selected.0);
                let heatmap = Heatmap::new(&data.weeks, &data.labels, data.stats.max_solved)
                    .with_scroll(first_week)
                    .with_selected(Some(self.selected))
                    .with_theme(self.theme);
                let anchor = heatmap.cell_area(chunks[2], self.selected.0, self.selected.1);
                heatmap.render(chunks[2], buf);

                self.render_hints(chunks[4], buf);

                // Tooltip overlay, placed inside the whole frame
                if let (true, Some(anchor), Some(cell)) =
                    (self.show_tooltip, anchor, self.selected_cell())
                {
                    let tooltip =
                        CellTooltip::new(cell, data.stats.max_solved).with_theme(self.theme);
                    let (tooltip_area, _) = tooltip.area(anchor, area, &self.tooltip_options);
                    tooltip.render(tooltip_area, buf);
                }
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));
            }
        }
    }
}

/// Run the TUI application
pub fn run(
    source: Box<dyn ActivitySource>,
    cache: Option<ActivityCacheService>,
    window: DayWindow,
    tooltip_options: TooltipOptions,
) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(
        &mut terminal,
        App::new(theme, tooltip_options),
        source,
        cache,
        window,
    );
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    mut app: App,
    source: Box<dyn ActivitySource>,
    cache: Option<ActivityCacheService>,
    window: DayWindow,
) -> anyhow::Result<()> {
    // Spawn background thread for data loading
    let (data_tx, data_rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_activity(source.as_ref(), cache.as_ref(), window)
            .map(|days| Box::new(AppData::from_days(&days, window.end)))
            .map_err(|e| e.to_string());
        let _ = data_tx.send(result);
    });

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Check for data loading completion (non-blocking)
        if matches!(app.state, AppState::Loading) {
            if let Ok(result) = data_rx.try_recv() {
                app.apply_data_result(result);
            }
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Jan 1..=20 2024 (three full weeks from Sun Dec 31), today Wed Jan 17
    fn make_ready_app() -> App {
        let days: Vec<ActivityDay> = (1..=20)
            .map(|d| ActivityDay::new(date(2024, 1, d), d % 5 + 1))
            .collect();
        let data = AppData::from_days(&days, date(2024, 1, 17));

        let mut app = App::new(Theme::Dark, TooltipOptions::default().with_offset(0.0));
        app.apply_data_result(Ok(Box::new(data)));
        app
    }

    fn render_text(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_app_initial_state() {
        let app = App::new(Theme::Dark, TooltipOptions::default());
        assert!(matches!(app.state, AppState::Loading));
        assert!(!app.should_quit());
        assert!(render_text(&app).contains("Loading activity..."));
    }

    #[test]
    fn test_app_selects_today_on_load() {
        let app = make_ready_app();
        assert_eq!(app.selected(), (2, 3));
        assert_eq!(app.selected_cell().unwrap().date, date(2024, 1, 17));
    }

    #[test]
    fn test_home_position_without_today_is_latest_day() {
        let days = vec![ActivityDay::new(date(2024, 1, 3), 1)];
        let data = AppData::from_days(&days, date(2025, 1, 1));
        assert_eq!(data.home_position(), (0, 3));
    }

    #[test]
    fn test_app_quit_on_q() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut app = make_ready_app();

        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.selected(), (2, 3)); // already on last week

        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.selected(), (1, 3));

        app.handle_event(key(KeyCode::Char('k')));
        assert_eq!(app.selected(), (1, 2));

        for _ in 0..10 {
            app.handle_event(key(KeyCode::Up));
        }
        assert_eq!(app.selected(), (1, 0));

        for _ in 0..10 {
            app.handle_event(key(KeyCode::Char('j')));
        }
        assert_eq!(app.selected(), (1, 6));
    }

    #[test]
    fn test_home_end_and_today_keys() {
        let mut app = make_ready_app();

        app.handle_event(key(KeyCode::Home));
        assert_eq!(app.selected(), (0, 3));

        app.handle_event(key(KeyCode::End));
        assert_eq!(app.selected(), (2, 3));

        app.handle_event(key(KeyCode::Home));
        app.handle_event(key(KeyCode::Char('t')));
        assert_eq!(app.selected(), (2, 3));
    }

    #[test]
    fn test_movement_ignored_while_loading() {
        let mut app = App::new(Theme::Dark, TooltipOptions::default());
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.selected(), (0, 0));
    }

    #[test]
    fn test_render_shows_stats_and_tooltip() {
        let app = make_ready_app();
        let text = render_text(&app);

        assert!(text.contains("Solved"));
        assert!(text.contains("Wed, Jan 17 2024"));
        // 17 % 5 + 1
        assert!(text.contains("3 cases solved"));
    }

    #[test]
    fn test_enter_toggles_tooltip() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Enter));

        let text = render_text(&app);
        assert!(!text.contains("cases solved"));
    }

    #[test]
    fn test_render_error_state() {
        let mut app = App::new(Theme::Dark, TooltipOptions::default());
        app.apply_data_result(Err("fetch error: offline".to_string()));
        assert!(render_text(&app).contains("Error: fetch error: offline"));
    }

    #[test]
    fn test_render_empty_activity() {
        let mut app = App::new(Theme::Dark, TooltipOptions::default());
        app.apply_data_result(Ok(Box::new(AppData::from_days(&[], date(2024, 1, 1)))));
        assert!(render_text(&app).contains("No activity yet"));
    }
}
