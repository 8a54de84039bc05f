use image::imageops::{self, FilterType};

use crate::assets::bitmap::Bitmap;
use crate::foundation::error::{FaceError, FaceResult};

// Zero-saturation color matrix luminance weights (0.213, 0.715, 0.072) in Q16. They sum to
// exactly 1 << 16, which keeps already-gray pixels fixed.
const LUMA_R_Q16: u32 = 13_959;
const LUMA_G_Q16: u32 = 46_858;
const LUMA_B_Q16: u32 = 4_719;

/// How a decoded icon is fitted into the display icon box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Scale each axis independently to fill the box exactly.
    #[default]
    Independent,
    /// Keep the aspect ratio, fit inside the box and center on transparent padding.
    Uniform,
}

/// Rescale `src` to exactly `width x height` without touching `src`.
///
/// Sampling is nearest-neighbour (unfiltered), matching how the icon is scaled on the device.
pub fn rescale(src: &Bitmap, width: u32, height: u32, mode: ScaleMode) -> FaceResult<Bitmap> {
    if width == 0 || height == 0 {
        return Err(FaceError::validation("rescale target must be non-zero"));
    }
    if src.width() == 0 || src.height() == 0 {
        return Err(FaceError::validation("cannot rescale an empty bitmap"));
    }

    let out = match mode {
        ScaleMode::Independent => {
            imageops::resize(src.as_image(), width, height, FilterType::Nearest)
        }
        ScaleMode::Uniform => {
            let (fit_w, fit_h) = fit_inside(src.width(), src.height(), width, height);
            let scaled = imageops::resize(src.as_image(), fit_w, fit_h, FilterType::Nearest);
            let mut canvas = image::RgbaImage::new(width, height);
            let x = i64::from((width - fit_w) / 2);
            let y = i64::from((height - fit_h) / 2);
            imageops::overlay(&mut canvas, &scaled, x, y);
            canvas
        }
    };
    Ok(Bitmap::from_rgba(out))
}

fn fit_inside(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let scale = (f64::from(box_w) / f64::from(src_w)).min(f64::from(box_h) / f64::from(src_h));
    let w = (f64::from(src_w) * scale).round().clamp(1.0, f64::from(box_w)) as u32;
    let h = (f64::from(src_h) * scale).round().clamp(1.0, f64::from(box_h)) as u32;
    (w, h)
}

/// Full desaturation with luminance-preserving weights. Alpha is kept as is.
pub fn desaturate(src: &Bitmap) -> Bitmap {
    let mut out = src.as_image().clone();
    for px in out.pixels_mut() {
        let l = luma_q16(px[0], px[1], px[2]);
        px[0] = l;
        px[1] = l;
        px[2] = l;
    }
    Bitmap::from_rgba(out)
}

fn luma_q16(r: u8, g: u8, b: u8) -> u8 {
    let acc = LUMA_R_Q16 * u32::from(r) + LUMA_G_Q16 * u32::from(g) + LUMA_B_Q16 * u32::from(b);
    ((acc + 32_768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/assets/transform.rs"]
mod tests;
