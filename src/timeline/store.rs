//! Timeline state store.
//!
//! The store is the single mutation surface for timeline state: elements,
//! playhead cursor, zoom range and horizontal scroll. Edits made through it
//! notify subscribed listeners, and explicit checkpoints capture whole-model
//! snapshots for undo/redo.

use crate::{
    foundation::error::{MontageError, MontageResult},
    foundation::time::{DEFAULT_ZOOM_RANGE, ms_to_px},
    timeline::model::{Element, ElementId, Timeline},
};

/// Maximum number of retained undo snapshots; the oldest is dropped first.
pub const HISTORY_CAP: usize = 10;

/// Change listener invoked after every timeline mutation.
pub type TimelineListener = Box<dyn Fn(&Timeline)>;

/// Mutation surface for timeline state.
///
/// The interaction engine and host UI talk to the timeline exclusively
/// through this trait, keeping the engine testable against fakes.
pub trait TimelineStore {
    /// Current timeline contents.
    fn timeline(&self) -> &Timeline;

    /// Insert or replace an element.
    fn add_element(&mut self, id: ElementId, element: Element);

    /// Remove an element; returns false when the id is unknown.
    fn remove_element(&mut self, id: &ElementId) -> bool;

    /// Replace the whole timeline at once.
    fn replace(&mut self, timeline: Timeline);

    /// Apply an in-place edit to one element; returns false when the id is
    /// unknown.
    fn update_element(&mut self, id: &ElementId, edit: &mut dyn FnMut(&mut Element)) -> bool;

    /// Register a change listener.
    fn subscribe(&mut self, listener: TimelineListener);

    /// Mint a fresh element id.
    fn next_id(&mut self) -> ElementId;

    /// Capture an undo snapshot of the current timeline.
    fn checkpoint(&mut self);

    /// Move through the snapshot history by `delta` steps; returns false when
    /// the move would run past either end.
    fn rollback(&mut self, delta: i32) -> bool;

    /// Playhead position in milliseconds.
    fn cursor(&self) -> i64;

    /// Move the playhead.
    fn set_cursor(&mut self, cursor_ms: i64);

    /// Current zoom scalar.
    fn zoom_range(&self) -> f64;

    /// Change the zoom scalar, keeping the cursor at the same viewport x.
    fn set_zoom_range(&mut self, range: f64) -> MontageResult<()>;

    /// Horizontal timeline scroll in pixels.
    fn scroll_px(&self) -> i64;

    /// Set the horizontal timeline scroll.
    fn set_scroll_px(&mut self, scroll_px: i64);
}

/// In-memory reference implementation of [`TimelineStore`].
pub struct MemoryTimelineStore {
    timeline: Timeline,
    listeners: Vec<TimelineListener>,
    history: Vec<Timeline>,
    history_now: usize,
    id_counter: u64,
    cursor_ms: i64,
    range: f64,
    scroll_px: i64,
}

impl Default for MemoryTimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTimelineStore {
    /// A store holding an empty timeline, with the empty state already
    /// captured as the first undo snapshot.
    pub fn new() -> Self {
        let timeline = Timeline::new();
        Self {
            history: vec![timeline.clone()],
            timeline,
            listeners: Vec::new(),
            history_now: 0,
            id_counter: 0,
            cursor_ms: 0,
            range: DEFAULT_ZOOM_RANGE,
            scroll_px: 0,
        }
    }

    /// Number of retained undo snapshots.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.timeline);
        }
    }
}

impl TimelineStore for MemoryTimelineStore {
    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn add_element(&mut self, id: ElementId, element: Element) {
        self.timeline.insert(id, element);
        self.notify();
    }

    fn remove_element(&mut self, id: &ElementId) -> bool {
        let removed = self.timeline.remove(id).is_some();
        if removed {
            self.notify();
        }
        removed
    }

    fn replace(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.notify();
    }

    fn update_element(&mut self, id: &ElementId, edit: &mut dyn FnMut(&mut Element)) -> bool {
        let Some(element) = self.timeline.get_mut(id) else {
            return false;
        };
        edit(element);
        self.notify();
        true
    }

    fn subscribe(&mut self, listener: TimelineListener) {
        self.listeners.push(listener);
    }

    fn next_id(&mut self) -> ElementId {
        self.id_counter += 1;
        ElementId::new(format!("element-{:04}", self.id_counter))
    }

    fn checkpoint(&mut self) {
        self.history.push(self.timeline.clone());
        if self.history.len() > HISTORY_CAP {
            self.history.remove(0);
        }
        self.history_now = self.history.len() - 1;
    }

    fn rollback(&mut self, delta: i32) -> bool {
        let target = self.history_now as i64 + delta as i64;
        if target < 0 || target >= self.history.len() as i64 {
            return false;
        }
        self.history_now = target as usize;
        self.timeline = self.history[self.history_now].clone();
        self.notify();
        true
    }

    fn cursor(&self) -> i64 {
        self.cursor_ms
    }

    fn set_cursor(&mut self, cursor_ms: i64) {
        self.cursor_ms = cursor_ms.max(0);
    }

    fn zoom_range(&self) -> f64 {
        self.range
    }

    fn set_zoom_range(&mut self, range: f64) -> MontageResult<()> {
        if !(range.is_finite() && range > 0.0) {
            return Err(MontageError::validation(
                "zoom range must be a positive finite number",
            ));
        }
        let cursor_view_x = ms_to_px(self.cursor_ms, self.range) - self.scroll_px;
        self.range = range;
        self.scroll_px = (ms_to_px(self.cursor_ms, self.range) - cursor_view_x).max(0);
        Ok(())
    }

    fn scroll_px(&self) -> i64 {
        self.scroll_px
    }

    fn set_scroll_px(&mut self, scroll_px: i64) {
        self.scroll_px = scroll_px.max(0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/store.rs"]
mod tests;
