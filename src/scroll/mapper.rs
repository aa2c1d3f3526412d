use crate::foundation::core::FrameIndex;

/// Map scroll progress `t` to a frame in a sequence of `frame_count` frames.
///
/// Computes `clamp(round(t * (n - 1)), 0, n - 1)`. Half-frame ties round away from zero
/// before clamping. Non-finite progress and empty sequences yield frame 0.
pub fn frame_index_for_progress(progress: f64, frame_count: usize) -> FrameIndex {
    if frame_count == 0 || !progress.is_finite() {
        return FrameIndex(0);
    }
    let last = frame_count - 1;
    let raw = (progress * last as f64).round();
    if raw <= 0.0 {
        return FrameIndex(0);
    }
    FrameIndex((raw as usize).min(last))
}

/// [`frame_index_for_progress`] bound to a fixed frame count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollMapper {
    frame_count: usize,
}

impl ScrollMapper {
    pub fn new(frame_count: usize) -> Self {
        Self { frame_count }
    }

    pub fn frame_count(self) -> usize {
        self.frame_count
    }

    pub fn map(self, progress: f64) -> FrameIndex {
        frame_index_for_progress(progress, self.frame_count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
