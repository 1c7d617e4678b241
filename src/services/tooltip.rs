//! Tooltip placement around an anchor rectangle
//!
//! Tries the four quadrants around the anchor in priority order and takes
//! the first one whose tooltip rectangle lies entirely inside the container.
//! When none fit, the first candidate is clamped to the container edges.

use crate::types::{Placement, Rect, TooltipPosition};

/// Gap between the anchor and the tooltip
pub const DEFAULT_OFFSET: f64 = 10.0;

/// Placement tuning supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipOptions {
    pub offset: f64,
    /// Tried first, ahead of the rest of [`Placement::DEFAULT_ORDER`]
    pub preferred_order: Vec<Placement>,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            preferred_order: Vec::new(),
        }
    }
}

impl TooltipOptions {
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order(mut self, order: impl IntoIterator<Item = Placement>) -> Self {
        self.preferred_order = order.into_iter().collect();
        self
    }
}

/// Places tooltips inside a viewport sampled by the UI layer.
///
/// The viewport is only used when a call supplies no container.
#[derive(Debug, Clone, Copy)]
pub struct TooltipPlacer {
    viewport: Rect,
}

impl TooltipPlacer {
    pub fn new(viewport: Rect) -> Self {
        Self { viewport }
    }

    pub fn compute_position(
        &self,
        anchor: Rect,
        tooltip: Rect,
        container: Option<Rect>,
        options: &TooltipOptions,
    ) -> TooltipPosition {
        compute_position(anchor, tooltip, container.unwrap_or(self.viewport), options)
    }
}

/// Candidate order: the caller's preference first, then the remaining
/// default quadrants. Always all four, without duplicates.
pub fn evaluation_order(preferred: &[Placement]) -> Vec<Placement> {
    let mut order = Vec::with_capacity(Placement::DEFAULT_ORDER.len());
    for &placement in preferred.iter().chain(Placement::DEFAULT_ORDER.iter()) {
        if !order.contains(&placement) {
            order.push(placement);
        }
    }
    order
}

/// Top-left corner of the tooltip for one quadrant, relative to the
/// container origin
fn candidate(
    placement: Placement,
    anchor: Rect,
    tooltip: Rect,
    container: Rect,
    offset: f64,
) -> (f64, f64) {
    let right = anchor.left - container.left + anchor.width + offset;
    let left = anchor.left - container.left - tooltip.width - offset;
    let below = anchor.top - container.top + anchor.height + offset;
    let above = anchor.top - container.top - tooltip.height - offset;

    match placement {
        Placement::BottomRight => (right, below),
        Placement::BottomLeft => (left, below),
        Placement::TopRight => (right, above),
        Placement::TopLeft => (left, above),
    }
}

fn fits(left: f64, top: f64, tooltip: Rect, container: Rect) -> bool {
    left >= 0.0
        && left + tooltip.width <= container.width
        && top >= 0.0
        && top + tooltip.height <= container.height
}

/// Pull `value` into `[0, extent - size]`. The zero bound wins when the
/// tooltip is larger than the container.
fn clamp_axis(value: f64, extent: f64, size: f64) -> f64 {
    value.min(extent - size).max(0.0)
}

/// Best position for `tooltip` next to `anchor` inside `container`.
///
/// Only the tooltip's size is read. Never fails: degenerate geometry ends
/// up clamped, possibly partially off-screen.
pub fn compute_position(
    anchor: Rect,
    tooltip: Rect,
    container: Rect,
    options: &TooltipOptions,
) -> TooltipPosition {
    let order = evaluation_order(&options.preferred_order);

    for &placement in &order {
        let (left, top) = candidate(placement, anchor, tooltip, container, options.offset);
        if fits(left, top, tooltip, container) {
            return TooltipPosition {
                left,
                top,
                placement,
            };
        }
    }

    let placement = order.first().copied().unwrap_or(Placement::BottomRight);
    let (left, top) = candidate(placement, anchor, tooltip, container, options.offset);

    TooltipPosition {
        left: clamp_axis(left, container.width, tooltip.width),
        top: clamp_axis(top, container.height, tooltip.height),
        placement,
    }
}
