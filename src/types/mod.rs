//! Type definitions for radquiz

mod activity;
mod error;
mod geometry;

pub use activity::*;
pub use error::*;
pub use geometry::*;

/// Cache loading warning types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWarning {
    /// Failed to open or read cache file
    LoadFailed(String),
    /// Cache file was corrupted (invalid JSON)
    Corrupted(String),
}

impl std::fmt::Display for CacheWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(msg) | Self::Corrupted(msg) => f.write_str(msg),
        }
    }
}
