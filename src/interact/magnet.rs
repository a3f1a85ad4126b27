//! Magnetic edge snapping for timeline drags.
//!
//! While a single element is dragged, its bar edges are checked against the
//! edges of every other element. An edge pair within the snap tolerance
//! rewrites the dragged element's start time so the edges align exactly in
//! pixel space (trim-compensated for dynamic elements). Later matches
//! override earlier ones, matching the original scan order.

use crate::{
    foundation::time::{ms_to_px, px_to_ms},
    timeline::model::{Element, ElementId, Timeline},
};

/// Snap tolerance in timeline pixels.
pub const SNAP_TOLERANCE_PX: i64 = 10;

/// The result of a magnet pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagnetOutcome {
    /// Start time after snapping (unchanged when nothing matched).
    pub start_time: i64,
    /// Whether any edge pair snapped.
    pub snapped: bool,
}

/// Pixel positions of an element's bar edges.
///
/// Static bars span `[start, start + duration]`; dynamic bars span the
/// trim-adjusted `[start + trim.start, start + trim.end]`.
fn bar_edges(element: &Element, range: f64) -> (i64, i64) {
    match element.trim() {
        Some(trim) => (
            ms_to_px(element.start_time + trim.start, range),
            ms_to_px(element.start_time + trim.end, range),
        ),
        None => (
            ms_to_px(element.start_time, range),
            ms_to_px(element.start_time + element.duration, range),
        ),
    }
}

/// Offset subtracted from an aligned pixel position to recover the start
/// time when the dragged element's start edge snapped.
fn start_edge_offset_px(target: &Element, range: f64) -> i64 {
    match target.trim() {
        Some(trim) => ms_to_px(trim.start, range),
        None => 0,
    }
}

/// Offset for the end edge: the bar length in pixels.
fn end_edge_offset_px(target: &Element, range: f64) -> i64 {
    match target.trim() {
        Some(trim) => ms_to_px(trim.end, range),
        None => ms_to_px(target.duration, range),
    }
}

/// Snap a dragged element against every other element's edges.
pub fn magnet(timeline: &Timeline, target_id: &ElementId, range: f64) -> Option<MagnetOutcome> {
    let target = timeline.get(target_id)?;
    let (bar_start, bar_end) = bar_edges(target, range);
    let near = |a: i64, b: i64| a > b - SNAP_TOLERANCE_PX && a < b + SNAP_TOLERANCE_PX;

    let mut outcome = MagnetOutcome {
        start_time: target.start_time,
        snapped: false,
    };
    for (id, element) in timeline.iter() {
        if id == target_id {
            continue;
        }
        let (other_start, other_end) = bar_edges(element, range);

        for other_edge in [other_start, other_end] {
            if near(bar_start, other_edge) {
                outcome.start_time = px_to_ms(other_edge - start_edge_offset_px(target, range), range);
                outcome.snapped = true;
            }
            if near(bar_end, other_edge) {
                outcome.start_time = px_to_ms(other_edge - end_edge_offset_px(target, range), range);
                outcome.snapped = true;
            }
        }
    }
    Some(outcome)
}

#[cfg(test)]
#[path = "../../tests/unit/interact/magnet.rs"]
mod tests;
