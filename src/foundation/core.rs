pub use kurbo::{Affine, Rect, Size, Vec2};

/// Zero-based position of a frame in a loaded sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

/// Logical viewport dimensions plus the display's device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl ViewportSize {
    /// Build a viewport size, falling back to a ratio of `1.0` when `device_pixel_ratio` is
    /// not a positive finite number.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: non_negative(width),
            height: non_negative(height),
            device_pixel_ratio,
        }
    }

    /// Backing-store size in physical pixels: `trunc(logical * dpr)` per axis.
    pub fn backing_size(self) -> SurfaceSize {
        SurfaceSize {
            width: physical_px(self.width, self.device_pixel_ratio),
            height: physical_px(self.height, self.device_pixel_ratio),
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn physical_px(logical: f64, dpr: f64) -> u32 {
    (logical * dpr).trunc().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Pixel dimensions of a drawable surface's backing store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_kurbo(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Destination rectangle for one paint, in surface pixels. May extend past the surface on
/// the cropped axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    pub fn to_kurbo(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Transform mapping image space `(0,0)..(image_w,image_h)` onto this rectangle.
    pub fn placement(self, image: Size) -> Affine {
        let sx = if image.width > 0.0 { self.width / image.width } else { 1.0 };
        let sy = if image.height > 0.0 { self.height / image.height } else { 1.0 };
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::scale_non_uniform(sx, sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
