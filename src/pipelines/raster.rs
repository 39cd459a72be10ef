// SPDX-License-Identifier: GPL-3.0-only

//! Anti-aliased vector drawing onto stills
//!
//! Shapes and glyph runs are recorded into a `vello_cpu` context sized to the
//! target, rasterized into a transparent premultiplied pixmap, then blended
//! source-over onto the straight-alpha target.

use crate::errors::CompositeError;
use image::RgbaImage;
use kurbo::{PathEl, Shape};
use vello_cpu::peniko::{Color, FontData};

/// Curve flattening tolerance in pixels
const TOLERANCE: f64 = 0.1;

/// Recording surface handed to [`paint`] callbacks
pub struct VectorLayer {
    ctx: vello_cpu::RenderContext,
}

impl VectorLayer {
    pub fn fill_shape(&mut self, shape: &impl Shape, rgba: [u8; 4]) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color(rgba));
        self.ctx.fill_path(&to_cpu_path(shape));
    }

    /// Fill a glyph run whose positions are relative to `origin`
    pub fn fill_glyphs(
        &mut self,
        font: &FontData,
        font_size: f32,
        origin: (f64, f64),
        rgba: [u8; 4],
        glyphs: impl Iterator<Item = vello_cpu::Glyph>,
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate(origin));
        self.ctx.set_paint(color(rgba));
        self.ctx
            .glyph_run(font)
            .font_size(font_size)
            .fill_glyphs(glyphs);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

/// Draw vector content over `target`
///
/// Everything `draw` records is rasterized in one pass and then blended over
/// the existing pixels. Empty targets are left alone.
pub fn paint(
    target: &mut RgbaImage,
    draw: impl FnOnce(&mut VectorLayer),
) -> Result<(), CompositeError> {
    let (width, height) = target.dimensions();
    let too_large = || CompositeError::CanvasTooLarge { width, height };
    let w: u16 = width.try_into().map_err(|_| too_large())?;
    let h: u16 = height.try_into().map_err(|_| too_large())?;
    if w == 0 || h == 0 {
        return Ok(());
    }

    let mut layer = VectorLayer {
        ctx: vello_cpu::RenderContext::new(w, h),
    };
    draw(&mut layer);

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    layer.ctx.flush();
    layer.ctx.render_to_pixmap(&mut pixmap);
    blend_premul_over(target, pixmap.data_as_u8_slice());
    Ok(())
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn to_cpu_path(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let point = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point(p)),
            PathEl::LineTo(p) => out.line_to(point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point(p1), point(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(point(p1), point(p2), point(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[inline]
fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}

/// Source-over of premultiplied `src` onto straight-alpha `dst`
fn blend_premul_over(dst: &mut RgbaImage, src: &[u8]) {
    for (d, s) in dst.pixels_mut().zip(src.chunks_exact(4)) {
        let sa = u32::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        let da = u32::from(d[3]);
        let out_a = sa + mul_div255(da, inv);
        for c in 0..3 {
            // Premultiplied result scaled by 255, then back to straight alpha
            let scaled = u32::from(s[c]) * 255 + mul_div255(u32::from(d[c]), da) * inv;
            d[c] = ((scaled + out_a / 2) / out_a).min(255) as u8;
        }
        d[3] = out_a as u8;
    }
}
