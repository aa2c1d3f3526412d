use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Affine, DrawRect, SurfaceSize},
};

/// Host-owned drawable. The engine sizes and paints it but never creates or destroys it.
pub trait Surface {
    fn pixel_size(&self) -> SurfaceSize;

    fn set_pixel_size(&mut self, size: SurfaceSize);

    /// Whether a drawing context is currently obtainable.
    fn has_context(&self) -> bool {
        true
    }

    /// Clear the full backing store.
    fn clear(&mut self);

    /// Draw `image` scaled into `rect` (surface pixels, may overhang the edges).
    fn draw_image(&mut self, image: &PreparedImage, rect: DrawRect);
}

/// In-memory premultiplied RGBA8 surface rasterized with `vello_cpu`.
///
/// Frames are rasterized into a scratch pixmap and composited source-over onto the backing
/// store, so whatever [`Surface::clear`] left behind shows through uncovered or translucent
/// pixels. The render context and scratch pixmap are reused until the size changes.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    clear_premul: [u8; 4],
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clear_premul", &self.clear_premul)
            .finish()
    }
}

impl CpuSurface {
    pub fn new(size: SurfaceSize) -> Self {
        let (width, height) = clamp_dims(size);
        Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            scratch: None,
            ctx: None,
            clear_premul: [0, 0, 0, 0],
        }
    }

    /// Straight-alpha color used by [`Surface::clear`].
    pub fn with_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        self.clear_premul = premul_rgba8(r, g, b, a);
        self
    }

    /// Row-major premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    fn take_ctx(&mut self) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx
    }

    fn take_scratch(&mut self) -> vello_cpu::Pixmap {
        match self.scratch.take() {
            Some(mut pm) if pm.width() == self.width && pm.height() == self.height => {
                pm.data_as_u8_slice_mut().fill(0);
                pm
            }
            _ => vello_cpu::Pixmap::new(self.width, self.height),
        }
    }
}

impl Surface for CpuSurface {
    fn pixel_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    fn set_pixel_size(&mut self, size: SurfaceSize) {
        let (width, height) = clamp_dims(size);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        self.scratch = None;
        self.ctx = None;
    }

    fn has_context(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn clear(&mut self) {
        let rgba = self.clear_premul;
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn draw_image(&mut self, image: &PreparedImage, rect: DrawRect) {
        if !self.has_context() || image.is_empty() {
            return;
        }

        let mut ctx = self.take_ctx();
        let mut scratch = self.take_scratch();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(rect.placement(image.size())));
        ctx.set_paint(image.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
        ctx.flush();
        // `render_to_pixmap` replaces the whole target, so render aside and composite.
        ctx.render_to_pixmap(&mut scratch);
        premul_over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            scratch.data_as_u8_slice(),
        );

        self.ctx = Some(ctx);
        self.scratch = Some(scratch);
    }
}

fn clamp_dims(size: SurfaceSize) -> (u16, u16) {
    let w = size.width.min(u32::from(u16::MAX)) as u16;
    let h = size.height.min(u32::from(u16::MAX)) as u16;
    (w, h)
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(a) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn mul_div255(v: u16, a: u16) -> u16 {
    (v * a + 127) / 255
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - sa;
        for c in 0..4 {
            let out = u16::from(s[c]) + mul_div255(u16::from(d[c]), inv);
            d[c] = out.min(255) as u8;
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
