//! Keyframe track data model.
//!
//! Tracks carry two parallel representations: the authored cubic descriptors
//! (point plus control handles, kept for editing round trips) and a flat
//! `(time, value)` lookup array that the sampler actually reads. Hosts that
//! author curves densely may populate the lookup directly; otherwise
//! [`Channel::rebuild_lookup`] derives it from the descriptors.

/// A single authored keyframe: its point and the surrounding control handles.
///
/// Control handles are serialized and preserved but never evaluated; sampling
/// is nearest-point only.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeDescriptor {
    /// Keyframe point as `(time_ms, value)`, relative to the element start.
    pub p: (f64, f64),
    /// Incoming control handle.
    pub cs: (f64, f64),
    /// Outgoing control handle.
    pub ce: (f64, f64),
}

impl KeyframeDescriptor {
    /// A keyframe with both control handles collapsed onto the point.
    pub fn flat(time_ms: f64, value: f64) -> Self {
        Self {
            p: (time_ms, value),
            cs: (time_ms, value),
            ce: (time_ms, value),
        }
    }
}

/// One animated channel: authored descriptors plus the sampler lookup array.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Channel {
    /// Authored keyframes, ordered by time.
    #[serde(default)]
    pub keyframes: Vec<KeyframeDescriptor>,
    /// Flat `(time_ms, value)` samples read by the sampler.
    #[serde(default)]
    pub points: Vec<(f64, f64)>,
}

impl Channel {
    /// A channel holding only the given flat samples.
    pub fn from_points(points: Vec<(f64, f64)>) -> Self {
        Self {
            keyframes: Vec::new(),
            points,
        }
    }

    /// Regenerate the lookup array from the authored keyframe points.
    pub fn rebuild_lookup(&mut self) {
        self.points = self.keyframes.iter().map(|k| k.p).collect();
    }

    /// Whether the channel has any samples to read.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Animated 2D position override (independent x and y channels).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PositionTrack {
    /// Whether the track participates in sampling.
    #[serde(default)]
    pub is_active: bool,
    /// Horizontal channel.
    #[serde(default)]
    pub x: Channel,
    /// Vertical channel.
    #[serde(default)]
    pub y: Channel,
}

/// Animated scalar override (opacity, scale or rotation).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScalarTrack {
    /// Whether the track participates in sampling.
    #[serde(default)]
    pub is_active: bool,
    /// Value channel.
    #[serde(default)]
    pub channel: Channel,
}

/// The full set of animatable parameters on an element.
///
/// Inactive tracks always resolve to the element's static value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSet {
    /// Position override in canvas pixels.
    #[serde(default)]
    pub position: PositionTrack,
    /// Opacity override, sampled in the element's 0-100 range.
    #[serde(default)]
    pub opacity: ScalarTrack,
    /// Scale override, sampled against a base value of 10 (10 = 1.0x).
    #[serde(default)]
    pub scale: ScalarTrack,
    /// Rotation override in degrees.
    #[serde(default)]
    pub rotation: ScalarTrack,
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
