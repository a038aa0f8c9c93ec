//! Drag tracking for press-move-release sequences.
//!
//! A [`DragTracker`] follows exactly one pointer from press to release and
//! reports the cumulative horizontal displacement since the press, which is
//! what a draggable handle needs to move relative to where it started.

use crate::event::PointerKey;
use crate::geometry::Point;

/// An in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    /// Pointer that owns the drag.
    pub pointer: PointerKey,
    /// Where the press happened.
    pub start: Point,
    /// Most recent position seen.
    pub current: Point,
}

impl ActiveDrag {
    /// Horizontal displacement since the press.
    #[must_use]
    pub fn dx(&self) -> f32 {
        self.current.x - self.start.x
    }

    /// Total displacement since the press.
    #[must_use]
    pub fn delta(&self) -> Point {
        self.current - self.start
    }
}

/// Tracks one pointer through a drag.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<ActiveDrag>,
}

impl DragTracker {
    /// Create an idle tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Start tracking `pointer`, replacing any previous drag.
    pub fn begin(&mut self, pointer: PointerKey, start: Point) {
        self.active = Some(ActiveDrag {
            pointer,
            start,
            current: start,
        });
    }

    /// Record movement. Returns the cumulative dx, or `None` if `pointer`
    /// does not own the drag.
    pub fn update(&mut self, pointer: PointerKey, position: Point) -> Option<f32> {
        let drag = self.active.as_mut().filter(|d| d.pointer == pointer)?;
        drag.current = position;
        Some(drag.dx())
    }

    /// Finish the drag at `position`. Returns the total dx.
    pub fn end(&mut self, pointer: PointerKey, position: Point) -> Option<f32> {
        self.update(pointer, position)?;
        self.active.take().map(|d| d.dx())
    }

    /// Abort the drag, keeping the last known position. Returns the dx
    /// reached before the cancel.
    pub fn cancel(&mut self, pointer: PointerKey) -> Option<f32> {
        if self.owned_by(pointer) {
            self.active.take().map(|d| d.dx())
        } else {
            None
        }
    }

    /// Whether `pointer` is the one being tracked.
    #[must_use]
    pub fn owned_by(&self, pointer: PointerKey) -> bool {
        self.active.is_some_and(|d| d.pointer == pointer)
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The in-flight drag, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Forget the drag without reporting anything.
    pub fn reset(&mut self) {
        self.active = None;
    }
}
