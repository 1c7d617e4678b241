//! Geometry types for tooltip placement

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. Anchor, tooltip and container share one
/// coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect at the origin with the given size (a measured tooltip)
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Quadrant relative to the anchor that the tooltip occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Placement {
    /// Default evaluation order when the caller has no preference
    pub const DEFAULT_ORDER: [Placement; 4] = [
        Placement::BottomRight,
        Placement::TopRight,
        Placement::BottomLeft,
        Placement::TopLeft,
    ];
}

/// Computed tooltip position, relative to the container origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
    pub placement: Placement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_serde_kebab_case() {
        let json = serde_json::to_string(&Placement::TopLeft).unwrap();
        assert_eq!(json, "\"top-left\"");
        let p: Placement = serde_json::from_str("\"bottom-right\"").unwrap();
        assert_eq!(p, Placement::BottomRight);
    }

    #[test]
    fn test_rect_sized() {
        let r = Rect::sized(100.0, 50.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 50.0));
    }
}
