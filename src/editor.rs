//! Top-level editor facade.
//!
//! Wires the timeline store, asset cache, frame compositor and interaction
//! engine into one object a host embeds. The host pushes pointer and command
//! input in, polls the redraw scheduler from its frame loop, and pulls
//! rasterized frames out.

use crate::{
    assets::cache::{AssetCache, AssetLoader, DecodedAsset},
    compose::align::AlignHit,
    compose::frame::{ComposeOptions, FrameCompositor},
    compose::geometry::resolve_placement,
    foundation::{
        error::MontageResult,
        pixel::{Bitmap, Rgba8},
    },
    interact::engine::{HitResult, InteractionEngine, NoopOptionsPanel, OptionsPanel, TimelineView},
    render::raster::rasterize,
    schedule::RedrawScheduler,
    timeline::model::{Element, ElementId, ElementKind},
    timeline::store::{MemoryTimelineStore, TimelineStore},
};

/// An embeddable timeline editor instance.
pub struct Editor {
    store: MemoryTimelineStore,
    cache: AssetCache,
    compositor: FrameCompositor,
    interact: InteractionEngine,
    redraw: RedrawScheduler,
    canvas: (u32, u32),
}

impl Editor {
    /// A fresh editor with an empty timeline.
    pub fn new(canvas: (u32, u32), background: Rgba8) -> Self {
        Self {
            store: MemoryTimelineStore::new(),
            cache: AssetCache::new(),
            compositor: FrameCompositor::new(background),
            interact: InteractionEngine::new(),
            redraw: RedrawScheduler::new(),
            canvas: (canvas.0.max(1), canvas.1.max(1)),
        }
    }

    /// The backing timeline store.
    pub fn store(&self) -> &MemoryTimelineStore {
        &self.store
    }

    /// Mutable access to the backing store; any external mutation should be
    /// followed by [`Self::request_redraw`].
    pub fn store_mut(&mut self) -> &mut MemoryTimelineStore {
        &mut self.store
    }

    /// The interaction engine (selection, drag state, clipboard).
    pub fn interaction(&mut self) -> &mut InteractionEngine {
        &mut self.interact
    }

    /// The decoded-asset cache.
    pub fn cache_mut(&mut self) -> &mut AssetCache {
        &mut self.cache
    }

    /// Mark the current frame stale.
    pub fn request_redraw(&mut self) {
        self.redraw.request();
    }

    /// Drain the redraw flag; the host calls this once per frame and
    /// re-renders when it returns true.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    /// Add an element and decode its media through `loader`.
    ///
    /// Image decode failures degrade to a placeholder bitmap instead of
    /// rejecting the element; other media propagate the error.
    #[tracing::instrument(skip(self, element, loader), fields(element = %id))]
    pub fn add_element(
        &mut self,
        id: ElementId,
        element: Element,
        loader: &mut dyn AssetLoader,
    ) -> MontageResult<()> {
        element.validate()?;
        if !self.cache.contains(&id, &element) {
            match loader.load(&id, &element) {
                Ok(asset) => self.cache.store(&id, &element, asset)?,
                Err(err) if matches!(element.kind, ElementKind::Image(_)) => {
                    tracing::warn!(element = %id, error = %err, "image decode failed, using placeholder");
                    self.cache.store_image_placeholder(&id, &element);
                }
                Err(err) => return Err(err),
            }
        }
        self.store.add_element(id, element);
        self.store.checkpoint();
        self.redraw.request();
        Ok(())
    }

    /// Deliver a late decode result (for hosts that load off-thread).
    pub fn deliver_asset(
        &mut self,
        id: &ElementId,
        asset: DecodedAsset,
    ) -> MontageResult<()> {
        if let Some(element) = self.store.timeline().get(id).cloned() {
            self.cache.store(id, &element, asset)?;
            self.redraw.request();
        }
        Ok(())
    }

    /// Move the playhead.
    pub fn seek(&mut self, cursor_ms: i64) {
        self.store.set_cursor(cursor_ms);
        self.redraw.request();
    }

    /// Classify the pointer position without mutating anything.
    pub fn hit_test(&self, view: &TimelineView, x: f64, y: f64) -> HitResult {
        self.interact.hit_test(&self.store, view, x, y)
    }

    /// Forward a pointer press to the interaction engine.
    pub fn pointer_down(&mut self, view: &TimelineView, x: f64, y: f64, shift: bool) {
        let mut panel = NoopOptionsPanel;
        self.pointer_down_with_panel(&mut panel, view, x, y, shift);
    }

    /// Pointer press variant that notifies a host-side options panel.
    pub fn pointer_down_with_panel(
        &mut self,
        panel: &mut dyn OptionsPanel,
        view: &TimelineView,
        x: f64,
        y: f64,
        shift: bool,
    ) {
        self.interact.pointer_down(&mut self.store, panel, view, x, y, shift);
        self.redraw.request();
    }

    /// Forward pointer motion to the interaction engine.
    pub fn pointer_move(&mut self, view: &TimelineView, x: f64) {
        self.interact.pointer_move(&mut self.store, view, x);
        self.redraw.request();
    }

    /// Forward a pointer release to the interaction engine.
    pub fn pointer_up(&mut self) {
        self.interact.pointer_up(&mut self.store);
        self.redraw.request();
    }

    /// Commit a canvas alignment snap into the dragged element's position.
    ///
    /// `hit` is the alignment the last composed frame reported in
    /// [`FramePlan::align`](crate::FramePlan); the host calls this when the
    /// preview drag ends so the element lands where it was drawn.
    pub fn commit_alignment(&mut self, id: &ElementId, hit: &AlignHit) {
        let cursor = self.store.cursor();
        let timeline = self.store.timeline();
        let Some(element) = timeline.get(id) else {
            return;
        };
        let start = timeline.effective_start(id).unwrap_or(element.start_time);
        let p = resolve_placement(element, start, cursor);
        let (dx, dy) = (hit.x - p.x, hit.y - p.y);
        if self.store.update_element(id, &mut |element| {
            element.location.x += dx;
            element.location.y += dy;
        }) {
            self.store.checkpoint();
            self.redraw.request();
        }
    }

    /// Split the selected element at the playhead.
    pub fn split_at_cursor(&mut self) {
        self.interact.split_at_cursor(&mut self.store);
        self.redraw.request();
    }

    /// Delete selected elements (anchored parents are kept).
    pub fn delete_selected(&mut self) {
        self.interact.delete_selected(&mut self.store);
        self.redraw.request();
    }

    /// Copy the selected element to the clipboard.
    pub fn copy_selected(&mut self) {
        self.interact.copy_selected(&mut self.store);
    }

    /// Copy the selected element to the clipboard and delete it.
    pub fn cut_selected(&mut self) {
        self.interact.cut_selected(&mut self.store);
        self.redraw.request();
    }

    /// Insert the clipboard element on top of the draw order.
    pub fn paste(&mut self) {
        self.interact.paste(&mut self.store);
        self.redraw.request();
    }

    /// Clone the selected element on top of the draw order.
    pub fn duplicate_selected(&mut self) {
        self.interact.duplicate_selected(&mut self.store);
        self.redraw.request();
    }

    /// Swap the selected element's priority with its sorted neighbor.
    pub fn exchange_priority(&mut self, delta: i64) {
        self.interact.exchange_priority(&mut self.store, delta);
        self.redraw.request();
    }

    /// Undo one checkpoint.
    pub fn undo(&mut self) -> bool {
        let moved = self.interact.undo(&mut self.store);
        if moved {
            self.redraw.request();
        }
        moved
    }

    /// Redo one checkpoint.
    pub fn redo(&mut self) -> bool {
        let moved = self.interact.redo(&mut self.store);
        if moved {
            self.redraw.request();
        }
        moved
    }

    /// Render the frame at the current playhead.
    pub fn render_frame(&mut self, opts: &ComposeOptions) -> Bitmap {
        let cursor = self.store.cursor();
        let plan = self.compositor.compose(
            self.store.timeline(),
            cursor,
            self.canvas,
            &mut self.cache,
            opts,
        );
        rasterize(&plan)
    }

    /// Render with the interaction engine's own selection as the overlay
    /// state.
    pub fn render_frame_with_selection(&mut self) -> Bitmap {
        let opts = ComposeOptions {
            selection: self.interact.selection().to_vec(),
            ..ComposeOptions::default()
        };
        self.render_frame(&opts)
    }
}

#[cfg(test)]
#[path = "../tests/unit/editor.rs"]
mod tests;
