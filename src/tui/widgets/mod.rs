//! TUI widgets

pub mod heatmap;
pub mod tooltip;
