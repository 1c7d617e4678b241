//! Services: heatmap grid, tooltip placement, statistics and data access

pub mod activity_grid;
pub mod activity_source;
pub mod cache;
pub mod config;
pub mod stats;
pub mod tooltip;

pub use activity_grid::{build_month_labels, build_weeks, intensity_level};
pub use activity_source::{
    load_activity, ActivitySource, DayWindow, FileActivitySource, HttpActivitySource,
};
pub use cache::ActivityCacheService;
pub use config::Config;
pub use tooltip::{compute_position, TooltipOptions, TooltipPlacer};
