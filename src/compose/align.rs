//! Canvas alignment snapping for preview drags.
//!
//! While an element is dragged on the preview canvas, its box snaps to the
//! canvas edges and center lines whenever it comes within a fixed pixel
//! tolerance. The snap is exact (the committed coordinate equals the
//! candidate) and each snapped direction contributes a full-span guide line.

/// Snap tolerance in canvas pixels.
pub const ALIGN_TOLERANCE_PX: f64 = 20.0;

/// A direction the dragged box snapped in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignDirection {
    /// Top edge on the canvas top.
    Top,
    /// Left edge on the canvas left.
    Left,
    /// Right edge on the canvas right.
    Right,
    /// Bottom edge on the canvas bottom.
    Bottom,
    /// Horizontal center on the canvas vertical center line.
    Vertical,
    /// Vertical center on the canvas horizontal center line.
    Horizontal,
}

/// Result of an alignment check: the snapped position plus the directions
/// that matched.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignHit {
    /// Snapped left edge.
    pub x: f64,
    /// Snapped top edge.
    pub y: f64,
    /// Matched directions, in check order.
    pub directions: Vec<AlignDirection>,
}

/// Check a dragged box against the canvas alignment candidates.
///
/// Returns `None` when nothing is within tolerance. Later matches on the
/// same axis override earlier ones, mirroring the check order top, left,
/// right, bottom, vertical-center, horizontal-center.
pub fn align_to_canvas(x: f64, y: f64, w: f64, h: f64, canvas_w: f64, canvas_h: f64) -> Option<AlignHit> {
    let padding = ALIGN_TOLERANCE_PX;
    let near = |value: f64, target: f64| value < target + padding && value > target - padding;

    let mut nx = x;
    let mut ny = y;
    let mut directions = Vec::new();

    if near(y, 0.0) {
        ny = 0.0;
        directions.push(AlignDirection::Top);
    }
    if near(x, 0.0) {
        nx = 0.0;
        directions.push(AlignDirection::Left);
    }
    if near(x + w, canvas_w) {
        nx = canvas_w - w;
        directions.push(AlignDirection::Right);
    }
    if near(y + h, canvas_h) {
        ny = canvas_h - h;
        directions.push(AlignDirection::Bottom);
    }
    if near(x + w / 2.0, canvas_w / 2.0) {
        nx = canvas_w / 2.0 - w / 2.0;
        directions.push(AlignDirection::Vertical);
    }
    if near(y + h / 2.0, canvas_h / 2.0) {
        ny = canvas_h / 2.0 - h / 2.0;
        directions.push(AlignDirection::Horizontal);
    }

    if directions.is_empty() {
        None
    } else {
        Some(AlignHit {
            x: nx,
            y: ny,
            directions,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/align.rs"]
mod tests;
