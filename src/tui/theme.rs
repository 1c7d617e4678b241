//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Heatmap intensity tier for theme-aware coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapLevel {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl HeatmapLevel {
    /// Map an intensity level (0..=4) to a tier
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Max,
        }
    }
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Selection and key hints
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Borders, labels, hints
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Streak counters
    pub fn streak(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(208), // orange (ANSI 256)
            Self::Light => Color::Indexed(166), // dark orange (ANSI 256)
        }
    }

    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Heatmap intensity color
    pub fn heatmap_color(self, level: HeatmapLevel) -> Color {
        match self {
            Self::Dark => match level {
                HeatmapLevel::None => Color::Indexed(236),
                HeatmapLevel::Low => Color::Indexed(22),
                HeatmapLevel::Medium => Color::Indexed(28),
                HeatmapLevel::High => Color::Indexed(34),
                HeatmapLevel::Max => Color::Indexed(40),
            },
            Self::Light => match level {
                HeatmapLevel::None => Color::Indexed(254),
                HeatmapLevel::Low => Color::Indexed(194),
                HeatmapLevel::Medium => Color::Indexed(157),
                HeatmapLevel::High => Color::Indexed(71),
                HeatmapLevel::Max => Color::Indexed(28),
            },
        }
    }
}
