use crate::{
    assets::store::FrameSet,
    foundation::core::{DrawRect, FrameIndex, Size},
    render::surface::Surface,
};

/// Cover-fit `image` into `canvas`: fill it completely, keep the aspect ratio, and centre
/// the overflow on the cropped axis.
///
/// Returns `None` when either size is empty or non-finite.
pub fn cover_fit(image: Size, canvas: Size) -> Option<DrawRect> {
    let dims = [image.width, image.height, canvas.width, canvas.height];
    if dims.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }

    let image_ratio = image.width / image.height;
    let canvas_ratio = canvas.width / canvas.height;

    let rect = if image_ratio > canvas_ratio {
        let width = canvas.height * image_ratio;
        DrawRect {
            x: (canvas.width - width) / 2.0,
            y: 0.0,
            width,
            height: canvas.height,
        }
    } else {
        let height = canvas.width / image_ratio;
        DrawRect {
            x: 0.0,
            y: (canvas.height - height) / 2.0,
            width: canvas.width,
            height,
        }
    };
    Some(rect)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Surface cleared and the frame drawn at this rectangle.
    Painted(DrawRect),
    /// Same frame as the last paint.
    SkippedUnchanged,
    /// Slot pending, broken, or out of range. Previous pixels stay.
    SkippedUnrenderable,
    /// No surface attached, no drawing context, or zero-sized backing store.
    SkippedNoSurface,
}

impl RenderOutcome {
    pub fn painted(self) -> bool {
        matches!(self, Self::Painted(_))
    }
}

/// Paints frames onto a surface and suppresses repaints of an unchanged frame.
#[derive(Clone, Debug, Default)]
pub struct FrameRenderer {
    last_painted: Option<FrameIndex>,
    paint_count: u64,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_painted(&self) -> Option<FrameIndex> {
        self.last_painted
    }

    /// Total paints performed over this renderer's lifetime.
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }

    /// Forget the last painted frame so the next render always paints.
    pub fn invalidate(&mut self) {
        self.last_painted = None;
    }

    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: Option<&mut S>,
        frames: &FrameSet,
        index: FrameIndex,
    ) -> RenderOutcome {
        let Some(surface) = surface else {
            return RenderOutcome::SkippedNoSurface;
        };
        if !surface.has_context() {
            return RenderOutcome::SkippedNoSurface;
        }
        if self.last_painted == Some(index) {
            tracing::trace!(frame = index.0, "frame unchanged; skipping paint");
            return RenderOutcome::SkippedUnchanged;
        }
        let Some(image) = frames.renderable(index) else {
            tracing::trace!(frame = index.0, "frame not renderable; keeping previous pixels");
            return RenderOutcome::SkippedUnrenderable;
        };
        let Some(rect) = cover_fit(image.size(), surface.pixel_size().to_kurbo()) else {
            return RenderOutcome::SkippedNoSurface;
        };

        surface.clear();
        surface.draw_image(image, rect);
        self.last_painted = Some(index);
        self.paint_count += 1;
        tracing::trace!(frame = index.0, ?rect, "painted frame");
        RenderOutcome::Painted(rect)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
