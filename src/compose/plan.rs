//! Backend-agnostic frame plan.
//!
//! The compositor turns timeline state into an ordered list of draw ops; a
//! rasterizer (or any other backend) executes them in order. Ops reference
//! cached pixels by shared handle so building a plan never copies media.

use std::sync::Arc;

use kurbo::Point;

use crate::{
    assets::decode::GifFrames,
    compose::align::AlignHit,
    foundation::pixel::{Bitmap, Rgba8},
    timeline::model::TextProps,
};

/// Resolved on-canvas placement of one element at one frame.
///
/// Rotation and scale apply about the center of the `width`/`height` box at
/// `(x, y)`; `alpha` is the resolved opacity in 0-1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Unscaled box width.
    pub width: f64,
    /// Unscaled box height.
    pub height: f64,
    /// Rotation about the box center, degrees.
    pub rotation_deg: f64,
    /// Uniform scale about the box center.
    pub scale: f64,
    /// Opacity in 0-1.
    pub alpha: f64,
}

impl Placement {
    /// Whether the placement needs a transformed (rotated/scaled) blit.
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation_deg == 0.0 && self.scale == 1.0
    }
}

/// Pixel source referenced by a bitmap draw.
#[derive(Clone)]
pub enum PixelSource {
    /// A whole cached bitmap.
    Cached(Arc<Bitmap>),
    /// One frame of a cached GIF.
    GifFrame(Arc<GifFrames>, usize),
    /// Pixels produced for this frame only (video frames, filter output).
    Owned(Arc<Bitmap>),
}

impl PixelSource {
    /// The referenced pixels, or `None` for a frameless GIF.
    pub fn bitmap(&self) -> Option<&Bitmap> {
        match self {
            PixelSource::Cached(b) | PixelSource::Owned(b) => Some(b),
            PixelSource::GifFrame(frames, index) => {
                let len = frames.frames.len();
                (len > 0).then(|| &frames.frames[*index % len])
            }
        }
    }
}

/// A measured, wrapped text line ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Line content.
    pub text: String,
    /// Measured advance width in pixels.
    pub width: f64,
    /// Ascent above the baseline.
    pub ascent: f64,
    /// Descent below the baseline.
    pub descent: f64,
}

/// One draw instruction. Ops execute in plan order, back to front.
pub enum DrawOp {
    /// Blit a bitmap under a placement.
    Bitmap {
        /// Pixels to draw.
        source: PixelSource,
        /// Where and how to draw them.
        placement: Placement,
    },
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Left/top corner.
        origin: Point,
        /// Rectangle size.
        size: (f64, f64),
        /// Fill color.
        color: Rgba8,
        /// Extra opacity in 0-1.
        alpha: f64,
    },
    /// Stroke an axis-aligned rectangle.
    StrokeRect {
        /// Left/top corner.
        origin: Point,
        /// Rectangle size.
        size: (f64, f64),
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in pixels.
        line_width: f64,
    },
    /// Fill a circle.
    FillCircle {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Fill a closed polygon (even-odd rule), vertices in canvas space.
    FillPolygon {
        /// Polygon vertices.
        points: Vec<Point>,
        /// Fill color.
        color: Rgba8,
        /// Extra opacity in 0-1.
        alpha: f64,
    },
    /// Draw a block of wrapped text under a placement.
    Text {
        /// Parsed font shared from the asset cache.
        font: Arc<fontdue::Font>,
        /// Text styling.
        props: TextProps,
        /// Measured lines in draw order.
        lines: Vec<TextLine>,
        /// Where and how to draw the block.
        placement: Placement,
    },
}

/// The full set of draw ops for one frame.
pub struct FramePlan {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Canvas background color.
    pub background: Rgba8,
    /// Ordered draw ops, back to front.
    pub ops: Vec<DrawOp>,
    /// Canvas alignment applied to the dragged element this frame. The
    /// dragged op is already drawn at the snapped position; hosts commit
    /// the snap into the element on drop (see `Editor::commit_alignment`).
    pub align: Option<AlignHit>,
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
