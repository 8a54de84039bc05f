use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::FaceResult;
use crate::render::frame::TextItem;

/// Canvas-like drawing target handed to each render pass.
///
/// A pass always starts with `clear`, so implementations never need to keep content between
/// passes.
pub trait Surface {
    /// Fill the entire surface with `color`. Render bounds are expected to cover the surface;
    /// nothing outside them is preserved.
    fn clear(&mut self, color: Rgba8) -> FaceResult<()>;

    /// Hint for subsequent draws; surfaces that cannot switch anti-aliasing ignore it.
    fn set_anti_alias(&mut self, _enabled: bool) {}

    fn draw_text(&mut self, text: &TextItem) -> FaceResult<()>;

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) -> FaceResult<()>;

    /// Called once after the last draw of a pass.
    fn finish(&mut self) -> FaceResult<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Clear(Rgba8),
    AntiAlias(bool),
    Text(TextItem),
    Bitmap { bitmap: Bitmap, origin: Point },
    Finish,
}

/// Surface that records draw calls, for tests and for hosts that translate them into native
/// widgets.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Ops of the most recent pass (from its `Clear` on).
    pub fn last_pass(&self) -> &[SurfaceOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Clear(_)))
            .unwrap_or(0);
        &self.ops[start..]
    }

    pub fn last_bitmap(&self) -> Option<&Bitmap> {
        self.last_pass().iter().rev().find_map(|op| match op {
            SurfaceOp::Bitmap { bitmap, .. } => Some(bitmap),
            _ => None,
        })
    }

    pub fn pass_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Clear(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgba8) -> FaceResult<()> {
        self.ops.push(SurfaceOp::Clear(color));
        Ok(())
    }

    fn set_anti_alias(&mut self, enabled: bool) {
        self.ops.push(SurfaceOp::AntiAlias(enabled));
    }

    fn draw_text(&mut self, text: &TextItem) -> FaceResult<()> {
        self.ops.push(SurfaceOp::Text(text.clone()));
        Ok(())
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) -> FaceResult<()> {
        self.ops.push(SurfaceOp::Bitmap {
            bitmap: bitmap.clone(),
            origin,
        });
        Ok(())
    }

    fn finish(&mut self) -> FaceResult<()> {
        self.ops.push(SurfaceOp::Finish);
        Ok(())
    }
}
