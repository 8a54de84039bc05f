use std::sync::Arc;

use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{FaceError, FaceResult};
use crate::render::frame::TextItem;
use crate::render::surface::Surface;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Shapes text with one registered font.
struct TextRaster {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextRaster {
    fn new(font_bytes: Vec<u8>) -> FaceResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            FaceError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FaceError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Raster surface backed by a `vello_cpu` pixmap.
///
/// Text is drawn only when a font was supplied; without one, text draws are skipped so the icon
/// and background still render. `vello_cpu` always anti-aliases, so the anti-alias hint is only
/// recorded.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    anti_alias: bool,
    text: Option<TextRaster>,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> FaceResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| FaceError::validation("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| FaceError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(FaceError::validation("surface must be non-empty"));
        }
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: vello_cpu::RenderContext::new(width, height),
            anti_alias: true,
            text: None,
        })
    }

    /// Same as [`CpuSurface::new`] but able to draw text with the given TTF/OTF bytes.
    pub fn with_font(width: u32, height: u32, font_bytes: Vec<u8>) -> FaceResult<Self> {
        let mut surface = Self::new(width, height)?;
        surface.text = Some(TextRaster::new(font_bytes)?);
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Premultiplied RGBA8 contents, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied RGBA8 at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = ((y * self.width() + x) as usize) * 4;
        let px = self.data().get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn reset_ctx(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
    }
}

impl Surface for CpuSurface {
    /// Starts a new pass. The background goes through the render context like every other draw,
    /// since `finish` replaces the whole pixmap with the context output.
    fn clear(&mut self, color: Rgba8) -> FaceResult<()> {
        self.reset_ctx();
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        Ok(())
    }

    fn set_anti_alias(&mut self, enabled: bool) {
        self.anti_alias = enabled;
    }

    fn draw_text(&mut self, item: &TextItem) -> FaceResult<()> {
        let Some(raster) = self.text.as_mut() else {
            tracing::trace!(role = ?item.role, "no font configured; skipping text");
            return Ok(());
        };
        let brush = TextBrushRgba8 {
            r: item.color.r,
            g: item.color.g,
            b: item.color.b,
            a: item.color.a,
        };
        let layout = raster.layout(&item.text, item.size_px, brush);

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((
                item.origin.x,
                item.origin.y,
            )));
        for line in layout.lines() {
            for run_item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = run_item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&raster.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) -> FaceResult<()> {
        let pixmap = bitmap_to_pixmap(bitmap)?;
        let (w, h) = (f64::from(bitmap.width()), f64::from(bitmap.height()));
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }

    fn finish(&mut self) -> FaceResult<()> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.reset_ctx();
        Ok(())
    }
}

fn bitmap_to_pixmap(bitmap: &Bitmap) -> FaceResult<vello_cpu::Pixmap> {
    let w: u16 = bitmap
        .width()
        .try_into()
        .map_err(|_| FaceError::validation("bitmap width exceeds u16"))?;
    let h: u16 = bitmap
        .height()
        .try_into()
        .map_err(|_| FaceError::validation("bitmap height exceeds u16"))?;

    let premul = bitmap.to_premul_rgba8();
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(premul.len() / 4);
    for px in premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
