//! Selection and guide overlays drawn on top of the composited frame.

use kurbo::Point;

use crate::{
    compose::align::AlignDirection,
    compose::plan::DrawOp,
    foundation::pixel::Rgba8,
};

/// Outline stroke width.
pub const OUTLINE_WIDTH: f64 = 3.0;
/// Corner handle inset; handles are squares of twice this size.
pub const HANDLE_PADDING: f64 = 10.0;
/// Distance of the rotation affordance above the box's top edge.
pub const ROTATION_HANDLE_OFFSET: f64 = 50.0;
/// Rotation affordance radius.
pub const ROTATION_HANDLE_RADIUS: f64 = 15.0;

/// Selection overlay for one element box: white outline, four corner
/// handles and the rotation affordance above the top edge.
pub fn selection_ops(x: f64, y: f64, w: f64, h: f64, ops: &mut Vec<DrawOp>) {
    ops.push(DrawOp::StrokeRect {
        origin: Point::new(x, y),
        size: (w, h),
        color: Rgba8::WHITE,
        line_width: OUTLINE_WIDTH,
    });

    let handle = HANDLE_PADDING * 2.0;
    for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
        ops.push(DrawOp::FillRect {
            origin: Point::new(cx - HANDLE_PADDING, cy - HANDLE_PADDING),
            size: (handle, handle),
            color: Rgba8::WHITE,
            alpha: 1.0,
        });
    }

    ops.push(DrawOp::FillCircle {
        center: Point::new(x + w / 2.0, y - ROTATION_HANDLE_OFFSET),
        radius: ROTATION_HANDLE_RADIUS,
        color: Rgba8::WHITE,
    });
}

/// Full-span guide lines for the directions an alignment check matched.
pub fn guide_ops(directions: &[AlignDirection], canvas_w: f64, canvas_h: f64, ops: &mut Vec<DrawOp>) {
    for direction in directions {
        let (origin, size) = match direction {
            AlignDirection::Top => (Point::new(0.0, 0.0), (canvas_w, OUTLINE_WIDTH)),
            AlignDirection::Bottom => (
                Point::new(0.0, canvas_h - OUTLINE_WIDTH),
                (canvas_w, OUTLINE_WIDTH),
            ),
            AlignDirection::Left => (Point::new(0.0, 0.0), (OUTLINE_WIDTH, canvas_h)),
            AlignDirection::Right => (
                Point::new(canvas_w - OUTLINE_WIDTH, 0.0),
                (OUTLINE_WIDTH, canvas_h),
            ),
            AlignDirection::Vertical => (
                Point::new((canvas_w - OUTLINE_WIDTH) / 2.0, 0.0),
                (OUTLINE_WIDTH, canvas_h),
            ),
            AlignDirection::Horizontal => (
                Point::new(0.0, (canvas_h - OUTLINE_WIDTH) / 2.0),
                (canvas_w, OUTLINE_WIDTH),
            ),
        };
        ops.push(DrawOp::FillRect {
            origin,
            size,
            color: Rgba8::WHITE,
            alpha: 1.0,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;
