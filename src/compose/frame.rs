//! The frame compositor.
//!
//! Walks the timeline in ascending `(priority, id)` order and emits a
//! [`FramePlan`] for the playhead position. Per-element failures are
//! isolated: a bad element is logged and skipped, never failing the frame.

use std::sync::Arc;

use kurbo::Point;

use crate::{
    assets::cache::AssetCache,
    compose::align::{AlignHit, align_to_canvas},
    compose::geometry::resolve_placement,
    compose::overlay::{guide_ops, selection_ops},
    compose::plan::{DrawOp, FramePlan, Placement, PixelSource},
    compose::text::{FontMeasurer, wrap_lines},
    filter::pipeline::apply_filters,
    foundation::error::{MontageError, MontageResult},
    foundation::pixel::Rgba8,
    timeline::model::{Element, ElementId, ElementKind, Timeline},
};

/// Radius of the vertex handles shown while authoring a shape.
const SHAPE_HANDLE_RADIUS: f64 = 6.0;

/// Per-frame view state the compositor folds into the plan: which elements
/// are selected, which one is being dragged on the preview canvas, and
/// which shape (if any) is in authoring mode.
#[derive(Clone, Debug, Default)]
pub struct ComposeOptions {
    /// Selected element ids, drawn with the selection overlay.
    pub selection: Vec<ElementId>,
    /// Element currently dragged on the preview canvas; its alignment
    /// guides are added to the plan.
    pub dragging: Option<ElementId>,
    /// Shape whose vertex handles should be drawn.
    pub authoring_shape: Option<ElementId>,
}

/// Stateless frame compositor.
///
/// Holds only the canvas background color; all per-frame inputs arrive as
/// arguments so composing the same state twice yields the same plan.
pub struct FrameCompositor {
    /// Canvas background color.
    pub background: Rgba8,
}

impl FrameCompositor {
    /// A compositor with the given canvas background.
    pub fn new(background: Rgba8) -> Self {
        Self { background }
    }

    /// Compose the frame at `cursor` into a draw plan.
    ///
    /// The cache is mutable because video elements pull frames from their
    /// decode handles and toggle mute when the cursor leaves their trim
    /// window; persisted element fields are never written.
    #[tracing::instrument(skip_all, fields(cursor, elements = timeline.len()))]
    pub fn compose(
        &self,
        timeline: &Timeline,
        cursor: i64,
        canvas: (u32, u32),
        cache: &mut AssetCache,
        opts: &ComposeOptions,
    ) -> FramePlan {
        let mut plan = FramePlan {
            width: canvas.0,
            height: canvas.1,
            background: self.background,
            ops: Vec::new(),
            align: drag_alignment(timeline, cursor, canvas, opts),
        };

        let order: Vec<ElementId> = timeline
            .sorted()
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect();
        for id in &order {
            let snap = (opts.dragging.as_ref() == Some(id))
                .then_some(plan.align.as_ref())
                .flatten();
            if let Err(err) = self.compose_element(timeline, id, cursor, cache, snap, &mut plan.ops)
            {
                tracing::warn!(element = %id, error = %err, "element skipped for this frame");
            }
        }

        self.compose_overlays(timeline, cursor, canvas, opts, plan.align.as_ref(), &mut plan.ops);
        plan
    }

    fn compose_element(
        &self,
        timeline: &Timeline,
        id: &ElementId,
        cursor: i64,
        cache: &mut AssetCache,
        snap: Option<&AlignHit>,
        ops: &mut Vec<DrawOp>,
    ) -> MontageResult<()> {
        let element = timeline
            .get(id)
            .ok_or_else(|| MontageError::evaluation(format!("element {id} disappeared")))?;
        let effective_start = timeline.effective_start(id).unwrap_or(element.start_time);
        let window = element.visible_window(effective_start);
        let mut placement = resolve_placement(element, effective_start, cursor);
        if let Some(hit) = snap {
            placement.x = hit.x;
            placement.y = hit.y;
        }

        match &element.kind {
            // Audio has no visual; playback is the host's concern.
            ElementKind::Audio(_) => {}
            ElementKind::Video(props) => {
                let Some(handle) = cache.video_mut(id) else {
                    return Ok(());
                };
                if !window.contains(cursor) {
                    handle.set_muted(true);
                    return Ok(());
                }
                handle.set_muted(false);
                let source_ms = ((cursor - effective_start) as f64 * props.speed) as i64;
                let Some(frame) = handle.frame_at(source_ms) else {
                    return Ok(());
                };
                let filtered = apply_filters(&frame, &props.filter)?;
                ops.push(DrawOp::Bitmap {
                    source: PixelSource::Owned(Arc::new(filtered)),
                    placement,
                });
            }
            ElementKind::Image(_) => {
                if !window.contains(cursor) {
                    return Ok(());
                }
                let Some(bitmap) = cache.image(id) else {
                    return Ok(());
                };
                ops.push(DrawOp::Bitmap {
                    source: PixelSource::Cached(bitmap.clone()),
                    placement,
                });
            }
            ElementKind::Gif(_) => {
                if !window.contains(cursor) {
                    return Ok(());
                }
                let Some(frames) = cache.gif(id) else {
                    return Ok(());
                };
                let index = frames.frame_index_at(cursor);
                ops.push(DrawOp::Bitmap {
                    source: PixelSource::GifFrame(frames.clone(), index),
                    placement,
                });
            }
            ElementKind::Text(props) => {
                if !window.contains(cursor) {
                    return Ok(());
                }
                let Some(font) = cache.font(&props.font_path) else {
                    return Ok(());
                };
                let measurer = FontMeasurer::new(font);
                let lines = wrap_lines(
                    &measurer,
                    &props.content,
                    element.width,
                    props.font_px as f32,
                    props.letter_spacing,
                );
                ops.push(DrawOp::Text {
                    font: font.clone(),
                    props: props.clone(),
                    lines,
                    placement,
                });
            }
            ElementKind::Shape(props) => {
                if !window.contains(cursor) {
                    return Ok(());
                }
                let points = shape_canvas_points(props.points.as_slice(), props.original_size, &placement);
                ops.push(DrawOp::FillPolygon {
                    points,
                    color: props.fill_color,
                    alpha: placement.alpha,
                });
            }
        }
        Ok(())
    }

    fn compose_overlays(
        &self,
        timeline: &Timeline,
        cursor: i64,
        canvas: (u32, u32),
        opts: &ComposeOptions,
        align: Option<&AlignHit>,
        ops: &mut Vec<DrawOp>,
    ) {
        let visible = |id: &ElementId, element: &Element| {
            let start = timeline.effective_start(id).unwrap_or(element.start_time);
            (start, element.visible_window(start).contains(cursor))
        };

        for id in &opts.selection {
            let Some(element) = timeline.get(id) else {
                continue;
            };
            let (start, is_visible) = visible(id, element);
            if !is_visible {
                continue;
            }
            let mut p = resolve_placement(element, start, cursor);
            if opts.dragging.as_ref() == Some(id)
                && let Some(hit) = align
            {
                p.x = hit.x;
                p.y = hit.y;
            }
            selection_ops(p.x, p.y, p.width, p.height, ops);

            if opts.authoring_shape.as_ref() == Some(id)
                && let ElementKind::Shape(props) = &element.kind
            {
                for point in shape_canvas_points(props.points.as_slice(), props.original_size, &p) {
                    ops.push(DrawOp::FillCircle {
                        center: point,
                        radius: SHAPE_HANDLE_RADIUS,
                        color: Rgba8::WHITE,
                    });
                }
            }
        }

        if let Some(hit) = align {
            guide_ops(&hit.directions, canvas.0 as f64, canvas.1 as f64, ops);
        }
    }
}

/// Alignment of the dragged element against the canvas, if one is being
/// dragged, visible, and within snap tolerance.
fn drag_alignment(
    timeline: &Timeline,
    cursor: i64,
    canvas: (u32, u32),
    opts: &ComposeOptions,
) -> Option<AlignHit> {
    let id = opts.dragging.as_ref()?;
    let element = timeline.get(id)?;
    let start = timeline.effective_start(id).unwrap_or(element.start_time);
    if !element.visible_window(start).contains(cursor) {
        return None;
    }
    let p = resolve_placement(element, start, cursor);
    align_to_canvas(p.x, p.y, p.width, p.height, canvas.0 as f64, canvas.1 as f64)
}

/// Map shape vertices from authoring space through the element placement
/// into canvas space.
fn shape_canvas_points(
    points: &[(f64, f64)],
    original_size: (f64, f64),
    placement: &Placement,
) -> Vec<Point> {
    let sx = if original_size.0 > 0.0 {
        placement.width / original_size.0
    } else {
        1.0
    };
    let sy = if original_size.1 > 0.0 {
        placement.height / original_size.1
    } else {
        1.0
    };
    let (cx, cy) = (placement.width / 2.0, placement.height / 2.0);
    let angle = placement.rotation_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|&(px, py)| {
            let lx = (px * sx - cx) * placement.scale;
            let ly = (py * sy - cy) * placement.scale;
            Point::new(
                placement.x + cx + lx * cos - ly * sin,
                placement.y + cy + lx * sin + ly * cos,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
