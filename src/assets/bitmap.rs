use crate::foundation::core::PixelSize;

/// Owned straight-alpha RGBA8 image.
///
/// Every decode and transform produces a fresh `Bitmap`; none of them share pixel storage, so
/// dropping one never affects another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pixels: image::RgbaImage,
}

impl Bitmap {
    pub(crate) fn from_rgba(pixels: image::RgbaImage) -> Self {
        Self { pixels }
    }

    /// Solid-color bitmap, mostly useful for hosts that need a placeholder.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Straight RGBA8 at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Row-major straight RGBA8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub(crate) fn as_image(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Premultiplied copy of the pixels for raster backends.
    pub fn to_premul_rgba8(&self) -> Vec<u8> {
        let mut out = self.pixels.as_raw().clone();
        premultiply_rgba8_in_place(&mut out);
        out
    }

    /// True when every pixel has `r == g == b`.
    pub fn is_grayscale(&self) -> bool {
        self.pixels.pixels().all(|p| p[0] == p[1] && p[1] == p[2])
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
