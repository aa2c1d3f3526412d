use crate::foundation::core::FrameIndex;

/// Single-slot paint request. Posting while a request is pending overwrites it; nothing
/// queues.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaintMailbox {
    pending: Option<FrameIndex>,
}

impl PaintMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `index` as the pending paint. Returns `true` when the slot was empty, meaning
    /// the caller must request a display-refresh callback.
    pub fn post(&mut self, index: FrameIndex) -> bool {
        self.pending.replace(index).is_none()
    }

    pub fn take(&mut self) -> Option<FrameIndex> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<FrameIndex> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/mailbox.rs"]
mod tests;
