//! Timeline element data model.
//!
//! A [`Timeline`] is a pure data model: an ordered collection of elements the
//! host mutates through a store and the engine reads every frame. Decoded
//! media never lives here; it sits in the compositor's side caches keyed by
//! element id.

use std::fmt;

use kurbo::Point;

use crate::{
    animation::track::AnimationSet,
    foundation::error::{MontageError, MontageResult},
    foundation::pixel::Rgba8,
    foundation::time::TimeWindow,
};

/// Stable, opaque element identifier.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Element category, derived from the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Still bitmap.
    Image,
    /// Trimmed video clip.
    Video,
    /// Trimmed audio clip.
    Audio,
    /// Styled text block.
    Text,
    /// Animated GIF loop.
    Gif,
    /// Filled polygon shape.
    Shape,
}

/// How an element occupies timeline time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalKind {
    /// Fully described by `start_time` and `duration`.
    Static,
    /// Also carries a source trim window and playback speed.
    Dynamic,
}

/// Source trim window for dynamic elements, in source-relative milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Trim {
    /// Trim-in point.
    pub start: i64,
    /// Trim-out point.
    pub end: i64,
}

/// Pixel-processing filter kinds applied to video frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterName {
    /// Color-distance keying to transparency.
    #[serde(rename = "chromakey")]
    ChromaKey,
    /// 3x3 box blur with a spread factor.
    #[serde(rename = "blur")]
    Blur,
    /// Rotational blur around the frame center.
    #[serde(rename = "radialblur")]
    RadialBlur,
}

/// One filter invocation: a kind plus its `key=value:`-encoded parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterInstance {
    /// Which kernel to run.
    pub name: FilterName,
    /// Parameter string, e.g. `r=0:g=255:b=0:f=0.3`.
    pub value: String,
}

/// Ordered filter chain attached to a video element.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterChain {
    /// Master enable; when false the chain is bypassed entirely.
    #[serde(default)]
    pub enable: bool,
    /// Kernels in application order.
    #[serde(default)]
    pub list: Vec<FilterInstance>,
}

/// Horizontal alignment of wrapped text lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAlign {
    /// Lines start at the element's left edge.
    #[default]
    Left,
    /// Lines center within the element width.
    Center,
    /// Lines end at the element's right edge.
    Right,
}

/// Per-line background fill behind text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextBackground {
    /// Whether the background is drawn.
    pub enable: bool,
    /// Background fill color.
    pub color: Rgba8,
}

impl Default for TextBackground {
    fn default() -> Self {
        Self {
            enable: false,
            color: Rgba8::BLACK,
        }
    }
}

/// Stroke drawn beneath the text fill.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOutline {
    /// Whether the outline is drawn.
    pub enable: bool,
    /// Stroke width in pixels.
    pub size: f64,
    /// Stroke color.
    pub color: Rgba8,
}

impl Default for TextOutline {
    fn default() -> Self {
        Self {
            enable: false,
            size: 1.0,
            color: Rgba8::BLACK,
        }
    }
}

/// Optional anchoring of a text element to another element's start time.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextParent {
    /// The element's own `start_time` is authoritative.
    #[default]
    Standalone,
    /// Effective start time follows the referenced element.
    Element(ElementId),
}

/// Payload for still images.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageProps {
    /// Source file path handed to the asset loader.
    pub path: String,
}

/// Payload for animated GIFs.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GifProps {
    /// Source file path handed to the asset loader.
    pub path: String,
}

/// Payload for video clips.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoProps {
    /// Source file path handed to the asset loader.
    pub path: String,
    /// Source trim window.
    pub trim: Trim,
    /// Playback speed multiplier, strictly positive.
    pub speed: f64,
    /// Pixel filter chain.
    #[serde(default)]
    pub filter: FilterChain,
    /// Whether the source carries an audio stream.
    #[serde(default)]
    pub audio_exists: bool,
}

/// Payload for audio clips.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioProps {
    /// Source file path handed to the asset loader.
    pub path: String,
    /// Source trim window.
    pub trim: Trim,
    /// Playback speed multiplier, strictly positive.
    pub speed: f64,
}

/// Payload for styled text blocks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextProps {
    /// Text content; wrapped to the element width at draw time.
    pub content: String,
    /// Fill color.
    pub color: Rgba8,
    /// Font size in pixels.
    pub font_px: f64,
    /// Font file path handed to the asset loader.
    pub font_path: String,
    /// Line alignment inside the element box.
    #[serde(default)]
    pub align: TextAlign,
    /// Bold synthesis flag.
    #[serde(default)]
    pub bold: bool,
    /// Italic synthesis flag.
    #[serde(default)]
    pub italic: bool,
    /// Extra advance between glyphs, in pixels.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Per-line background fill.
    #[serde(default)]
    pub background: TextBackground,
    /// Stroke beneath the fill.
    #[serde(default)]
    pub outline: TextOutline,
    /// Optional start-time anchor.
    #[serde(default)]
    pub parent: TextParent,
}

/// Payload for filled polygon shapes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeProps {
    /// Closed polyline vertices in the shape's authoring space.
    pub points: Vec<(f64, f64)>,
    /// Authoring-space size the points are expressed in.
    pub original_size: (f64, f64),
    /// Solid fill color.
    pub fill_color: Rgba8,
}

/// Category payload carried by an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ElementKind {
    /// Still bitmap.
    Image(ImageProps),
    /// Trimmed video clip.
    Video(VideoProps),
    /// Trimmed audio clip.
    Audio(AudioProps),
    /// Styled text block.
    Text(TextProps),
    /// Animated GIF loop.
    Gif(GifProps),
    /// Filled polygon shape.
    Shape(ShapeProps),
}

/// One timeline element: placement, visual geometry, animation tracks and a
/// category payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    /// Draw-order key; lower priorities render first (furthest back).
    pub priority: i64,
    /// Timeline start in milliseconds.
    pub start_time: i64,
    /// Timeline duration in milliseconds.
    pub duration: i64,
    /// Top-left corner on the canvas, in pixels.
    pub location: Point,
    /// Width in canvas pixels.
    pub width: f64,
    /// Height in canvas pixels.
    pub height: f64,
    /// Rotation about the element center, in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in the 0-100 range.
    pub opacity: f64,
    /// Keyframe overrides for position/opacity/scale/rotation.
    #[serde(default)]
    pub animation: AnimationSet,
    /// Category payload.
    pub kind: ElementKind,
}

impl Element {
    /// The element's category.
    pub fn category(&self) -> Category {
        match &self.kind {
            ElementKind::Image(_) => Category::Image,
            ElementKind::Video(_) => Category::Video,
            ElementKind::Audio(_) => Category::Audio,
            ElementKind::Text(_) => Category::Text,
            ElementKind::Gif(_) => Category::Gif,
            ElementKind::Shape(_) => Category::Shape,
        }
    }

    /// Whether the element is static or dynamic.
    pub fn temporal_kind(&self) -> TemporalKind {
        match &self.kind {
            ElementKind::Video(_) | ElementKind::Audio(_) => TemporalKind::Dynamic,
            _ => TemporalKind::Static,
        }
    }

    /// The trim window, for dynamic elements.
    pub fn trim(&self) -> Option<Trim> {
        match &self.kind {
            ElementKind::Video(v) => Some(v.trim),
            ElementKind::Audio(a) => Some(a.trim),
            _ => None,
        }
    }

    /// The playback speed, for dynamic elements.
    pub fn speed(&self) -> Option<f64> {
        match &self.kind {
            ElementKind::Video(v) => Some(v.speed),
            ElementKind::Audio(a) => Some(a.speed),
            _ => None,
        }
    }

    /// The visibility window given an effective start time.
    ///
    /// Static elements are visible over `[start, start + duration)`; dynamic
    /// elements over `[start + trim.start, start + trim.end)`.
    pub fn visible_window(&self, effective_start: i64) -> TimeWindow {
        match self.trim() {
            Some(trim) => TimeWindow {
                start: effective_start + trim.start,
                end: effective_start + trim.end,
            },
            None => TimeWindow {
                start: effective_start,
                end: effective_start + self.duration,
            },
        }
    }

    /// Validate element-local invariants.
    pub fn validate(&self) -> MontageResult<()> {
        if self.duration <= 0 {
            return Err(MontageError::validation("element duration must be positive"));
        }
        if !(0.0..=100.0).contains(&self.opacity) {
            return Err(MontageError::validation(
                "element opacity must be in the 0-100 range",
            ));
        }
        if !(self.width.is_finite() && self.height.is_finite()) || self.width < 0.0 || self.height < 0.0 {
            return Err(MontageError::validation(
                "element size must be finite and non-negative",
            ));
        }
        if let (Some(trim), Some(speed)) = (self.trim(), self.speed()) {
            if !(speed > 0.0 && speed.is_finite()) {
                return Err(MontageError::validation("playback speed must be positive"));
            }
            let max_end = (self.duration as f64 / speed) as i64;
            if trim.start < 0 || trim.start > trim.end || trim.end > max_end {
                return Err(MontageError::validation(format!(
                    "trim window {}..{} violates 0 <= start <= end <= duration/speed ({max_end})",
                    trim.start, trim.end
                )));
            }
        }
        Ok(())
    }
}

/// The ordered element collection.
///
/// Iteration order of [`Timeline::sorted`] is ascending `(priority, id)`; the
/// id comparison makes equal priorities deterministic.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    elements: Vec<(ElementId, Element)>,
}

impl Timeline {
    /// An empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the timeline holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by id.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|(i, _)| i == id).map(|(_, e)| e)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|(i, _)| i == id)
            .map(|(_, e)| e)
    }

    /// Insert an element, replacing any existing element with the same id.
    pub fn insert(&mut self, id: ElementId, element: Element) {
        if let Some(existing) = self.get_mut(&id) {
            *existing = element;
        } else {
            self.elements.push((id, element));
        }
    }

    /// Remove an element, returning it if present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let at = self.elements.iter().position(|(i, _)| i == id)?;
        Some(self.elements.remove(at).1)
    }

    /// Iterate elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter().map(|(i, e)| (i, e))
    }

    /// Elements sorted ascending by `(priority, id)`.
    pub fn sorted(&self) -> Vec<(&ElementId, &Element)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|(ai, ae), (bi, be)| ae.priority.cmp(&be.priority).then_with(|| ai.cmp(bi)));
        out
    }

    /// Highest priority in use, or 0 for an empty timeline.
    pub fn max_priority(&self) -> i64 {
        self.elements.iter().map(|(_, e)| e.priority).max().unwrap_or(0)
    }

    /// Priority a newly added element should take (max + 1, or 1 when empty).
    pub fn next_priority(&self) -> i64 {
        if self.is_empty() { 1 } else { self.max_priority() + 1 }
    }

    /// Effective start time of an element, following text parent anchors.
    ///
    /// A parented text element starts at its own start time offset by the
    /// parent's; a missing parent contributes nothing.
    pub fn effective_start(&self, id: &ElementId) -> Option<i64> {
        let element = self.get(id)?;
        if let ElementKind::Text(text) = &element.kind
            && let TextParent::Element(parent_id) = &text.parent
            && let Some(parent) = self.get(parent_id)
        {
            return Some(element.start_time + parent.start_time);
        }
        Some(element.start_time)
    }

    /// Whether any text element is anchored to `id`.
    pub fn has_children(&self, id: &ElementId) -> bool {
        self.iter().any(|(_, e)| {
            matches!(
                &e.kind,
                ElementKind::Text(t) if t.parent == TextParent::Element(id.clone())
            )
        })
    }

    /// Validate every element plus cross-element invariants.
    pub fn validate(&self) -> MontageResult<()> {
        for (id, element) in self.iter() {
            element
                .validate()
                .map_err(|e| MontageError::validation(format!("element {id}: {e}")))?;
            if let ElementKind::Text(text) = &element.kind
                && let TextParent::Element(parent_id) = &text.parent
            {
                match self.get(parent_id) {
                    None => {
                        return Err(MontageError::validation(format!(
                            "element {id}: parent {parent_id} does not exist"
                        )));
                    }
                    Some(parent) if parent.category() == Category::Text => {
                        return Err(MontageError::validation(format!(
                            "element {id}: parent {parent_id} must not be a text element"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
