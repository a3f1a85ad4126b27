//! Nearest-sample keyframe lookup.
//!
//! Sampling never interpolates: the value of the flat point whose time is
//! closest to the element-relative cursor wins. Every failure mode (empty
//! channel, cursor before the element, inactive track) falls back to the
//! element's static base value, so sampling can never fail a frame.

use crate::animation::track::{Channel, PositionTrack, ScalarTrack};

/// Playhead ticks advance in 16 ms steps while keyframe indices are spaced
/// 20 ms apart; the guard below converts between the two grids.
const TICK_MS: f64 = 16.0;
const KEYFRAME_STEP_MS: f64 = 20.0;

/// Value of the flat sample nearest to `rel_time`, or `None` for an empty
/// channel. Exact distance ties keep the first-seen point (strict `<`).
pub fn nearest_value(points: &[(f64, f64)], rel_time: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &(t, v) in points {
        let d = (t - rel_time).abs();
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, v));
        }
    }
    best.map(|(_, v)| v)
}

/// Sample one channel at the timeline cursor, falling back to `base`.
///
/// The cursor is first quantized to the tick grid and re-expressed in
/// keyframe steps; a negative step index means the cursor sits before the
/// element start and the base value is returned untouched.
pub fn sample_channel(channel: &Channel, base: f64, element_start: i64, cursor: i64) -> f64 {
    let index = (cursor as f64 / TICK_MS).round();
    let index_ms = index * KEYFRAME_STEP_MS;
    let index_point = ((index_ms - element_start as f64) / KEYFRAME_STEP_MS).round();
    if index_point < 0.0 {
        return base;
    }
    nearest_value(&channel.points, (cursor - element_start) as f64).unwrap_or(base)
}

/// Sample a scalar track, honoring its activation flag.
pub fn sample_scalar(track: &ScalarTrack, base: f64, element_start: i64, cursor: i64) -> f64 {
    if !track.is_active {
        return base;
    }
    sample_channel(&track.channel, base, element_start, cursor)
}

/// Sample a position track, honoring its activation flag.
pub fn sample_position(
    track: &PositionTrack,
    base: (f64, f64),
    element_start: i64,
    cursor: i64,
) -> (f64, f64) {
    if !track.is_active {
        return base;
    }
    (
        sample_channel(&track.x, base.0, element_start, cursor),
        sample_channel(&track.y, base.1, element_start, cursor),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sampler.rs"]
mod tests;
