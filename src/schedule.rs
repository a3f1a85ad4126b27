//! Redraw coalescing and debounce timing.
//!
//! Hosts drive rendering from their own frame loop; mutations anywhere in
//! the engine request a redraw through [`RedrawScheduler`] and the loop
//! drains at most one request per frame. [`DebounceTimer`] defers work (like
//! persisting project state) until input has gone quiet.

use std::time::{Duration, Instant};

/// Coalesces any number of redraw requests into a single pending flag.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    /// A scheduler with no pending redraw.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a redraw as needed. Idempotent until [`Self::take`] drains it.
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Drain the pending flag; returns whether a redraw was requested since
    /// the last take.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Whether a redraw is pending without draining it.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// A restartable one-shot timer.
///
/// Arming while armed restarts the countdown, so a burst of events fires
/// once, after the burst ends.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// A disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the timer to fire after `delay`.
    pub fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the timer is armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the deadline has passed, disarm and return true.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/schedule.rs"]
mod tests;
