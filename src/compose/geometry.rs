//! Animated placement resolution.

use crate::{
    animation::sampler::{sample_position, sample_scalar},
    compose::plan::Placement,
    timeline::model::Element,
};

/// Base value the scale track samples against; a sampled 10 means 1.0x.
pub const SCALE_TRACK_BASE: f64 = 10.0;

/// Resolve an element's on-canvas placement at the cursor, applying any
/// active animation tracks over its static geometry.
pub fn resolve_placement(element: &Element, effective_start: i64, cursor: i64) -> Placement {
    let (x, y) = sample_position(
        &element.animation.position,
        (element.location.x, element.location.y),
        effective_start,
        cursor,
    );
    let opacity = sample_scalar(
        &element.animation.opacity,
        element.opacity,
        effective_start,
        cursor,
    );
    let scale = sample_scalar(
        &element.animation.scale,
        SCALE_TRACK_BASE,
        effective_start,
        cursor,
    ) / SCALE_TRACK_BASE;
    let rotation = sample_scalar(
        &element.animation.rotation,
        element.rotation,
        effective_start,
        cursor,
    );
    Placement {
        x,
        y,
        width: element.width,
        height: element.height,
        rotation_deg: rotation,
        scale,
        alpha: (opacity / 100.0).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/geometry.rs"]
mod tests;
