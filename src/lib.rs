//! radquiz: solved-case activity heatmap and tooltip placement

pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
