//! Montage is a timeline compositing and interaction engine for non-linear
//! video editing.
//!
//! The crate turns an editable timeline of media elements (video, audio,
//! images, animated GIFs, text, vector shapes) into pixels, and turns
//! pointer input over the timeline canvas back into edits.
//!
//! # Pipeline overview
//!
//! 1. **Model**: a [`Timeline`] of [`Element`]s, drawn in `(priority, id)`
//!    order, each with keyframe [`AnimationSet`] tracks sampled by nearest
//!    keyframe at the playhead
//! 2. **Compose**: `Timeline + cursor -> FramePlan` (a backend-agnostic list
//!    of draw ops, including filter-processed video frames and selection
//!    overlays)
//! 3. **Rasterize**: `FramePlan -> Bitmap` (premultiplied RGBA8, CPU)
//! 4. **Interact**: pointer input over the row layout drives selection,
//!    drag-move with magnetic snapping, edge stretch/trim, split and the
//!    clipboard commands, all checkpointed for undo
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: composing the same timeline state twice
//!   yields the same frame.
//! - **No IO in the engine**: media decoding is front-loaded through the
//!   [`AssetLoader`] seam into the [`AssetCache`].
//! - **Premultiplied RGBA8** end-to-end in the rasterizer; filter kernels
//!   and the public [`Rgba8`] color type are straight-alpha.
//!
//! Time is integer milliseconds throughout; the timeline viewport maps it to
//! pixels through a single zoom scalar (see [`ms_to_px`] / [`px_to_ms`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod compose;
mod editor;
mod filter;
mod foundation;
mod interact;
mod render;
mod schedule;
mod timeline;

pub use animation::sampler::{
    nearest_value, sample_channel, sample_position, sample_scalar,
};
pub use animation::track::{
    AnimationSet, Channel, KeyframeDescriptor, PositionTrack, ScalarTrack,
};
pub use assets::cache::{AssetCache, AssetLoader, DecodedAsset, VideoHandle};
pub use assets::decode::{
    GifFrames, decode_font, decode_gif, decode_image, placeholder_bitmap,
};
pub use compose::align::{ALIGN_TOLERANCE_PX, AlignDirection, AlignHit, align_to_canvas};
pub use compose::frame::{ComposeOptions, FrameCompositor};
pub use compose::geometry::{SCALE_TRACK_BASE, resolve_placement};
pub use compose::overlay::{
    HANDLE_PADDING, OUTLINE_WIDTH, ROTATION_HANDLE_OFFSET, ROTATION_HANDLE_RADIUS, guide_ops,
    selection_ops,
};
pub use compose::plan::{DrawOp, FramePlan, Placement, PixelSource, TextLine};
pub use compose::text::{FontMeasurer, LineExtents, TextMeasurer, wrap_lines};
pub use editor::Editor;
pub use filter::kernels::{box_blur, chroma_key, flip_vertical, radial_blur};
pub use filter::params::{BlurParams, ChromaKeyParams, parse_blur, parse_chroma_key};
pub use filter::pipeline::apply_filters;
pub use foundation::error::{MontageError, MontageResult};
pub use foundation::pixel::{Bitmap, Rgba8};
pub use foundation::time::{DEFAULT_ZOOM_RANGE, TimeWindow, ms_to_px, px_to_ms};
pub use interact::engine::{
    HitKind, HitResult, InteractionEngine, MIN_DURATION_MS, NoopOptionsPanel, OptionsPanel,
    ROW_HEIGHT, ROW_TOP_PADDING, STRETCH_AREA_PX, TimelineView,
};
pub use interact::magnet::{MagnetOutcome, SNAP_TOLERANCE_PX, magnet};
pub use render::raster::rasterize;
pub use schedule::{DebounceTimer, RedrawScheduler};
pub use timeline::model::{
    AudioProps, Category, Element, ElementId, ElementKind, FilterChain, FilterInstance,
    FilterName, GifProps, ImageProps, ShapeProps, TemporalKind, TextAlign, TextBackground,
    TextOutline, TextParent, TextProps, Timeline, Trim, VideoProps,
};
pub use timeline::store::{
    HISTORY_CAP, MemoryTimelineStore, TimelineListener, TimelineStore,
};
