//! Timeline interaction engine.
//!
//! A state machine over pointer input: hit-testing against the row layout,
//! selection, drag-move with magnetic snapping, edge stretching (resize for
//! static elements, trim for dynamic ones) and the clipboard-style edit
//! commands. Every mutation flows through the [`TimelineStore`], and every
//! completed command captures an undo checkpoint.

use std::collections::HashMap;

use crate::{
    foundation::time::{ms_to_px, px_to_ms},
    interact::magnet::magnet,
    timeline::model::{Category, Element, ElementId, ElementKind, TemporalKind, TextParent, Trim},
    timeline::store::TimelineStore,
};

/// Height of one element row in the timeline canvas.
pub const ROW_HEIGHT: f64 = 60.0;
/// Vertical padding above the first row.
pub const ROW_TOP_PADDING: f64 = 20.0;
/// Half-width of the stretch handle zone at each bar edge.
pub const STRETCH_AREA_PX: f64 = 10.0;
/// Smallest duration a static element can be stretched to, in ms.
pub const MIN_DURATION_MS: i64 = 10;

/// Scroll and zoom state of the timeline viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineView {
    /// Zoom scalar.
    pub range: f64,
    /// Horizontal scroll in pixels.
    pub scroll_px: i64,
    /// Vertical scroll in pixels.
    pub vertical_scroll_px: i64,
}

/// What a pointer position lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    /// Empty canvas.
    None,
    /// Bar body; dragging moves the element.
    Move,
    /// Start-edge handle.
    StretchStart,
    /// End-edge handle.
    StretchEnd,
}

/// Hit-test result: the element under the pointer, if any, and how a drag
/// would act on it.
#[derive(Clone, Debug, PartialEq)]
pub struct HitResult {
    /// Element under the pointer.
    pub target: Option<ElementId>,
    /// Drag classification.
    pub kind: HitKind,
}

/// Active drag mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DragMode {
    #[default]
    Idle,
    Move,
    /// Multi-selection move; magnetic snapping is disabled.
    MoveNoSnap,
    StretchStart,
    StretchEnd,
}

/// Pre-drag geometry captured on pointer down.
#[derive(Clone, Copy, Debug)]
struct DragOrigin {
    start_time: i64,
    duration: i64,
    trim: Option<Trim>,
}

/// Side-panel notification surface.
///
/// The host shows per-category option panels when the selection changes.
pub trait OptionsPanel {
    /// Called after every selection change with the primary selection's
    /// category (when any) and the full selected set.
    fn show_options_for(&mut self, category: Option<Category>, ids: &[ElementId]);
}

/// [`OptionsPanel`] that ignores every notification.
#[derive(Default)]
pub struct NoopOptionsPanel;

impl OptionsPanel for NoopOptionsPanel {
    fn show_options_for(&mut self, _category: Option<Category>, _ids: &[ElementId]) {}
}

/// The interaction state machine.
#[derive(Default)]
pub struct InteractionEngine {
    selection: Vec<ElementId>,
    mode: DragMode,
    dragging: bool,
    drag_changed: bool,
    first_click_x: f64,
    origins: HashMap<ElementId, DragOrigin>,
    clipboard: Option<(ElementId, Element)>,
}

impl InteractionEngine {
    /// An idle engine with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected element ids, in selection order.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Replace the selection programmatically (deduplicated, order kept).
    pub fn set_selection(&mut self, ids: Vec<ElementId>) {
        self.selection.clear();
        for id in ids {
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Classify a pointer position against the row layout.
    ///
    /// Rows follow `(priority, id)` order, one element per row. Video bars
    /// are drawn at their trimmed width; dynamic stretch handles sit at the
    /// trim-adjusted edges.
    pub fn hit_test(&self, store: &dyn TimelineStore, view: &TimelineView, x: f64, y: f64) -> HitResult {
        let timeline = store.timeline();
        for (row, (id, element)) in timeline.sorted().into_iter().enumerate() {
            let start_y = row as f64 * ROW_HEIGHT + ROW_TOP_PADDING - view.vertical_scroll_px as f64;
            let end_y = start_y + ROW_HEIGHT;

            let bar_width = match &element.kind {
                ElementKind::Video(props) => ms_to_px(props.trim.end - props.trim.start, view.range),
                _ => ms_to_px(element.duration, view.range),
            } as f64;

            let mut additional_left = 0.0;
            if let ElementKind::Text(text) = &element.kind
                && let TextParent::Element(parent_id) = &text.parent
                && let Some(parent) = timeline.get(parent_id)
            {
                additional_left = ms_to_px(parent.start_time, view.range) as f64;
            }

            let start_x =
                ms_to_px(element.start_time, view.range) as f64 - view.scroll_px as f64 + additional_left;
            let end_x = start_x + bar_width;

            if !(x > start_x - STRETCH_AREA_PX
                && x < end_x + STRETCH_AREA_PX
                && y > start_y
                && y < end_y)
            {
                continue;
            }

            let kind = match element.trim() {
                None => {
                    if x > start_x - STRETCH_AREA_PX && x < start_x + STRETCH_AREA_PX {
                        HitKind::StretchStart
                    } else if x > end_x - STRETCH_AREA_PX && x < end_x + STRETCH_AREA_PX {
                        HitKind::StretchEnd
                    } else {
                        HitKind::Move
                    }
                }
                Some(trim) => {
                    let trim_start_x = start_x + ms_to_px(trim.start, view.range) as f64;
                    let trim_end_x = start_x + ms_to_px(trim.end, view.range) as f64;
                    if x > trim_start_x - STRETCH_AREA_PX && x < trim_start_x + STRETCH_AREA_PX {
                        HitKind::StretchStart
                    } else if x > trim_end_x - STRETCH_AREA_PX && x < trim_end_x + STRETCH_AREA_PX {
                        HitKind::StretchEnd
                    } else {
                        HitKind::Move
                    }
                }
            };
            return HitResult {
                target: Some(id.clone()),
                kind,
            };
        }
        HitResult {
            target: None,
            kind: HitKind::None,
        }
    }

    /// Begin an interaction at a pointer position.
    ///
    /// Shift-click adds to the selection; clicking an already-selected
    /// element keeps the set (so a group can be dragged without shift);
    /// anything else replaces or clears it. Multi-selection moves disable
    /// snapping.
    pub fn pointer_down(
        &mut self,
        store: &mut dyn TimelineStore,
        panel: &mut dyn OptionsPanel,
        view: &TimelineView,
        x: f64,
        y: f64,
        shift: bool,
    ) {
        let hit = self.hit_test(store, view, x, y);

        match (&hit.target, shift) {
            (Some(target), true) => {
                if !self.selection.contains(target) {
                    self.selection.push(target.clone());
                }
                self.mode = drag_mode_for(hit.kind, self.selection.len());
            }
            (Some(target), false) if self.selection.contains(target) => {
                self.mode = drag_mode_for(hit.kind, self.selection.len());
            }
            (Some(target), false) => {
                self.selection = vec![target.clone()];
                self.mode = drag_mode_for(hit.kind, 1);
            }
            (None, _) => {
                self.selection.clear();
                self.mode = DragMode::Idle;
            }
        }

        let category = self
            .selection
            .first()
            .and_then(|id| store.timeline().get(id))
            .map(|e| e.category());
        panel.show_options_for(category, &self.selection);

        self.first_click_x = x;
        self.origins.clear();
        for id in &self.selection {
            if let Some(element) = store.timeline().get(id) {
                self.origins.insert(
                    id.clone(),
                    DragOrigin {
                        start_time: element.start_time,
                        duration: element.duration,
                        trim: element.trim(),
                    },
                );
            }
        }

        self.dragging = true;
        self.drag_changed = false;
    }

    /// Continue an active drag at a new pointer position.
    pub fn pointer_move(&mut self, store: &mut dyn TimelineStore, view: &TimelineView, x: f64) {
        if !self.dragging || self.mode == DragMode::Idle {
            return;
        }
        let dx = px_to_ms((x - self.first_click_x).round() as i64, view.range);

        for id in self.selection.clone() {
            let Some(origin) = self.origins.get(&id).copied() else {
                continue;
            };
            match self.mode {
                DragMode::Move | DragMode::MoveNoSnap => {
                    self.drag_changed |= store.update_element(&id, &mut |element| {
                        element.start_time = origin.start_time + dx;
                    });
                    if self.mode == DragMode::Move
                        && let Some(outcome) = magnet(store.timeline(), &id, view.range)
                        && outcome.snapped
                    {
                        store.update_element(&id, &mut |element| {
                            element.start_time = outcome.start_time;
                        });
                    }
                }
                DragMode::StretchStart => {
                    self.drag_changed |= stretch_start(store, &id, &origin, dx);
                }
                DragMode::StretchEnd => {
                    self.drag_changed |= stretch_end(store, &id, &origin, dx);
                }
                DragMode::Idle => {}
            }
        }
    }

    /// Finish the active interaction, checkpointing if anything changed.
    pub fn pointer_up(&mut self, store: &mut dyn TimelineStore) {
        if self.dragging && self.drag_changed {
            store.checkpoint();
        }
        self.dragging = false;
        self.drag_changed = false;
        self.mode = DragMode::Idle;
        self.origins.clear();
    }

    /// Delete every selected element that has no anchored children.
    pub fn delete_selected(&mut self, store: &mut dyn TimelineStore) {
        let mut removed_any = false;
        for id in self.selection.clone() {
            if store.timeline().has_children(&id) {
                continue;
            }
            if store.remove_element(&id) {
                self.selection.retain(|s| s != &id);
                removed_any = true;
            }
        }
        if removed_any {
            store.checkpoint();
        }
    }

    /// Step back one undo checkpoint.
    pub fn undo(&mut self, store: &mut dyn TimelineStore) -> bool {
        store.rollback(-1)
    }

    /// Step forward one undo checkpoint.
    pub fn redo(&mut self, store: &mut dyn TimelineStore) -> bool {
        store.rollback(1)
    }

    /// Copy the single selected element into the clipboard under a fresh id.
    pub fn copy_selected(&mut self, store: &mut dyn TimelineStore) {
        let [id] = self.selection.as_slice() else {
            return;
        };
        if let Some(element) = store.timeline().get(id).cloned() {
            let fresh = store.next_id();
            self.clipboard = Some((fresh, element));
        }
    }

    /// Copy the single selected element, then delete it (child guard applies).
    pub fn cut_selected(&mut self, store: &mut dyn TimelineStore) {
        self.copy_selected(store);
        self.delete_selected(store);
    }

    /// Insert the clipboard element on top of the draw order.
    pub fn paste(&mut self, store: &mut dyn TimelineStore) {
        let Some((id, element)) = self.clipboard.clone() else {
            return;
        };
        let mut element = element;
        element.priority = store.timeline().next_priority();
        store.add_element(id, element);
        store.checkpoint();
    }

    /// Clone the single selected element onto the top of the draw order
    /// without touching the clipboard.
    pub fn duplicate_selected(&mut self, store: &mut dyn TimelineStore) {
        let [id] = self.selection.as_slice() else {
            return;
        };
        let Some(mut clone) = store.timeline().get(id).cloned() else {
            return;
        };
        clone.priority = store.timeline().next_priority();
        let fresh = store.next_id();
        store.add_element(fresh, clone);
        store.checkpoint();
    }

    /// Split the single selected element at the playhead.
    ///
    /// Dynamic elements split by trim: the right half advances its trim-in
    /// point to the cursor and the original's trim-out closes down to it,
    /// conserving total trimmed time. Static elements split duration. The
    /// right half is inserted on top of the draw order; a cursor outside the
    /// splittable span is a no-op.
    pub fn split_at_cursor(&mut self, store: &mut dyn TimelineStore) {
        let [id] = self.selection.as_slice() else {
            return;
        };
        let id = id.clone();
        let cursor = store.cursor();
        let Some(original) = store.timeline().get(&id).cloned() else {
            return;
        };
        let mut clone = original.clone();

        match original.temporal_kind() {
            TemporalKind::Dynamic => {
                let Some(trim) = original.trim() else {
                    return;
                };
                let cut = cursor - (trim.start + original.start_time);
                let new_trim_start = trim.start + cut;
                if new_trim_start <= trim.start || new_trim_start >= trim.end {
                    return;
                }
                set_trim(&mut clone, |t| t.start = new_trim_start);
                store.update_element(&id, &mut |element| {
                    set_trim(element, |t| t.end = new_trim_start);
                });
            }
            TemporalKind::Static => {
                let cut = cursor - original.start_time;
                if cut <= 0 || cut >= original.duration {
                    return;
                }
                clone.start_time += cut;
                clone.duration -= cut;
                store.update_element(&id, &mut |element| {
                    element.duration -= clone.duration;
                });
            }
        }

        clone.priority = store.timeline().next_priority();
        let fresh = store.next_id();
        store.add_element(fresh, clone);
        store.checkpoint();
    }

    /// Swap the single selected element's priority with its sorted neighbor
    /// (`delta` of -1 moves it back, +1 forward). Out-of-range moves are
    /// no-ops.
    pub fn exchange_priority(&mut self, store: &mut dyn TimelineStore, delta: i64) {
        let [id] = self.selection.as_slice() else {
            return;
        };
        let id = id.clone();
        let order: Vec<(ElementId, i64)> = store
            .timeline()
            .sorted()
            .into_iter()
            .map(|(i, e)| (i.clone(), e.priority))
            .collect();
        let Some(at) = order.iter().position(|(i, _)| i == &id) else {
            return;
        };
        let neighbor_at = at as i64 + delta;
        if neighbor_at < 0 || neighbor_at >= order.len() as i64 {
            return;
        }
        let (neighbor_id, neighbor_priority) = order[neighbor_at as usize].clone();
        let own_priority = order[at].1;

        store.update_element(&id, &mut |element| element.priority = neighbor_priority);
        store.update_element(&neighbor_id, &mut |element| element.priority = own_priority);
        store.checkpoint();
    }
}

fn drag_mode_for(kind: HitKind, selection_len: usize) -> DragMode {
    match kind {
        HitKind::Move if selection_len > 1 => DragMode::MoveNoSnap,
        HitKind::Move => DragMode::Move,
        HitKind::StretchStart => DragMode::StretchStart,
        HitKind::StretchEnd => DragMode::StretchEnd,
        HitKind::None => DragMode::Idle,
    }
}

fn set_trim(element: &mut Element, edit: impl FnOnce(&mut Trim)) {
    match &mut element.kind {
        ElementKind::Video(props) => edit(&mut props.trim),
        ElementKind::Audio(props) => edit(&mut props.trim),
        _ => {}
    }
}

/// Start-edge stretch: static elements shift their start and shrink their
/// duration against a floor; dynamic elements advance trim-in while the
/// start time is reset to its captured pre-drag value on every update.
fn stretch_start(store: &mut dyn TimelineStore, id: &ElementId, origin: &DragOrigin, dx: i64) -> bool {
    match origin.trim {
        None => {
            if origin.duration - dx <= MIN_DURATION_MS {
                return false;
            }
            store.update_element(id, &mut |element| {
                element.start_time = origin.start_time + dx;
                element.duration = origin.duration - dx;
            })
        }
        Some(trim) => {
            if trim.start + dx <= 0 {
                return false;
            }
            store.update_element(id, &mut |element| {
                element.start_time = origin.start_time;
                set_trim(element, |t| t.start = trim.start + dx);
            })
        }
    }
}

/// End-edge stretch: static elements grow or shrink duration against the
/// floor; dynamic elements move trim-out within the source length.
fn stretch_end(store: &mut dyn TimelineStore, id: &ElementId, origin: &DragOrigin, dx: i64) -> bool {
    match origin.trim {
        None => {
            if origin.duration + dx <= MIN_DURATION_MS {
                return false;
            }
            store.update_element(id, &mut |element| {
                element.start_time = origin.start_time;
                element.duration = origin.duration + dx;
            })
        }
        Some(trim) => {
            let Some(speed) = store.timeline().get(id).and_then(|e| e.speed()) else {
                return false;
            };
            if (trim.end + dx) as f64 >= origin.duration as f64 / speed {
                return false;
            }
            store.update_element(id, &mut |element| {
                element.start_time = origin.start_time;
                set_trim(element, |t| t.end = trim.end + dx);
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/engine.rs"]
mod tests;
