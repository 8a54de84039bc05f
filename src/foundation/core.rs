use crate::foundation::error::{FaceError, FaceResult};

pub use kurbo::{Point, Rect, Vec2};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the face background.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque mid gray, used for ambient-mode seconds.
    pub const GRAY: Self = Self::rgb(0x88, 0x88, 0x88);

    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiplied channel bytes, ready for a premultiplied pixmap.
    pub fn to_premul(self) -> [u8; 4] {
        let af = u16::from(self.a) + 1;
        let premul = |c: u8| -> u8 { ((u16::from(c) * af) >> 8) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Physical shape of the display. Fixed once known; only affects presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayShape {
    /// Circular display.
    Round,
    /// Rectangular display.
    Square,
}

/// Kind of tap gesture reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TapType {
    /// The user started touching the screen.
    Touch,
    /// The touch turned into another gesture or was cancelled.
    TouchCancel,
    /// The user completed a tap.
    Tap,
}

/// Pixel dimensions of an icon or surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Create a validated, non-empty size.
    pub fn new(width: u32, height: u32) -> FaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(FaceError::validation("pixel size must be non-zero"));
        }
        Ok(Self { width, height })
    }
}
