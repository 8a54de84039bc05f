use crate::foundation::core::{DisplayShape, Point, Rect, Rgba8};

/// Position and text size of one face element, relative to the render bounds.
///
/// `x`/`y` are fractions of the bounds width/height; `size` is a fraction of the bounds height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Slot {
    const fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    pub fn origin(&self, bounds: Rect) -> Point {
        Point::new(
            bounds.x0 + self.x * bounds.width(),
            bounds.y0 + self.y * bounds.height(),
        )
    }

    pub fn size_px(&self, bounds: Rect) -> f32 {
        (self.size * bounds.height()).max(1.0) as f32
    }
}

/// Element placement for one display shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceLayout {
    pub shape: DisplayShape,
    pub hour: Slot,
    pub minute: Slot,
    pub second: Slot,
    pub date: Slot,
    /// Only `x`/`y` are used; the icon is drawn at its rescaled size.
    pub icon: Slot,
    pub high: Slot,
    pub low: Slot,
    pub description: Slot,
    /// Interactive-mode seconds color.
    pub seconds_color: Rgba8,
}

impl FaceLayout {
    pub fn for_shape(shape: DisplayShape) -> Self {
        match shape {
            DisplayShape::Round => Self {
                shape,
                hour: Slot::new(0.20, 0.24, 0.16),
                minute: Slot::new(0.44, 0.24, 0.16),
                second: Slot::new(0.68, 0.30, 0.08),
                date: Slot::new(0.28, 0.42, 0.06),
                icon: Slot::new(0.18, 0.52, 0.0),
                high: Slot::new(0.48, 0.56, 0.08),
                low: Slot::new(0.66, 0.56, 0.08),
                description: Slot::new(0.30, 0.78, 0.06),
                seconds_color: Rgba8::rgb(0xFF, 0xB7, 0x4D),
            },
            DisplayShape::Square => Self {
                shape,
                hour: Slot::new(0.10, 0.14, 0.18),
                minute: Slot::new(0.38, 0.14, 0.18),
                second: Slot::new(0.66, 0.22, 0.09),
                date: Slot::new(0.10, 0.38, 0.07),
                icon: Slot::new(0.10, 0.50, 0.0),
                high: Slot::new(0.45, 0.54, 0.09),
                low: Slot::new(0.66, 0.54, 0.09),
                description: Slot::new(0.10, 0.82, 0.07),
                seconds_color: Rgba8::rgb(0xB3, 0xE5, 0xFC),
            },
        }
    }
}
