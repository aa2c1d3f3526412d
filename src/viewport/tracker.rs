use crate::foundation::core::{SurfaceSize, ViewportSize};

/// Notification produced when the viewport actually changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportChange {
    pub previous: ViewportSize,
    pub current: ViewportSize,
}

impl ViewportChange {
    pub fn backing_size(&self) -> SurfaceSize {
        self.current.backing_size()
    }

    pub fn backing_size_changed(&self) -> bool {
        self.previous.backing_size() != self.current.backing_size()
    }
}

/// Owns the current viewport size. It is mutated only through resize notifications.
#[derive(Clone, Copy, Debug)]
pub struct ViewportTracker {
    current: ViewportSize,
}

impl ViewportTracker {
    pub fn new(initial: ViewportSize) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> ViewportSize {
        self.current
    }

    pub fn backing_size(&self) -> SurfaceSize {
        self.current.backing_size()
    }

    /// Record a resize. Returns `None` when nothing changed.
    pub fn update(&mut self, next: ViewportSize) -> Option<ViewportChange> {
        if next == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next);
        Some(ViewportChange {
            previous,
            current: next,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/tracker.rs"]
mod tests;
