use chrono::{DateTime, FixedOffset};

use crate::assets::bitmap::Bitmap;
use crate::engine::state::{CurrentWeather, IconChoice};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::FaceResult;
use crate::render::layout::{FaceLayout, Slot};
use crate::render::surface::Surface;

/// Role of a text element; hosts with their own widgets key on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    Hour,
    Minute,
    Second,
    Date,
    HighTemp,
    LowTemp,
    Description,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub role: TextRole,
    pub text: String,
    /// Top-left of the text box in surface pixels.
    pub origin: Point,
    pub size_px: f32,
    pub color: Rgba8,
}

/// Everything one render pass draws, in paint order after the background.
#[derive(Clone, Debug)]
pub struct FaceFrame<'a> {
    pub background: Rgba8,
    pub anti_alias: bool,
    pub ambient: bool,
    pub texts: Vec<TextItem>,
    pub icon: Option<(&'a Bitmap, Point)>,
    pub icon_choice: IconChoice,
}

impl FaceFrame<'_> {
    pub fn text(&self, role: TextRole) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.role == role)
            .map(|t| t.text.as_str())
    }
}

/// Colors that do not depend on the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba8,
    pub foreground: Rgba8,
    pub ambient_seconds: Rgba8,
}

pub struct FrameInput<'a> {
    pub now: DateTime<FixedOffset>,
    pub ambient: bool,
    pub anti_alias: bool,
    pub weather: Option<&'a CurrentWeather>,
    pub layout: &'a FaceLayout,
    pub palette: Palette,
    pub bounds: Rect,
}

pub fn format_temp(t: i32) -> String {
    format!("{t}\u{00B0}")
}

/// `Tue, Mar 4`
pub fn format_date(now: &DateTime<FixedOffset>) -> String {
    now.format("%a, %b %-d").to_string()
}

/// Project engine state onto a frame. Weather fields are left out until a snapshot exists.
pub fn compose_frame(input: FrameInput<'_>) -> FaceFrame<'_> {
    let FrameInput {
        now,
        ambient,
        anti_alias,
        weather,
        layout,
        palette,
        bounds,
    } = input;

    let fg = palette.foreground;
    let text = |role: TextRole, text: String, slot: &Slot, color: Rgba8| TextItem {
        role,
        text,
        origin: slot.origin(bounds),
        size_px: slot.size_px(bounds),
        color,
    };

    let seconds_color = if ambient {
        palette.ambient_seconds
    } else {
        layout.seconds_color
    };

    let mut texts = vec![
        text(TextRole::Hour, now.format("%H").to_string(), &layout.hour, fg),
        text(TextRole::Minute, now.format("%M").to_string(), &layout.minute, fg),
        text(
            TextRole::Second,
            now.format("%S").to_string(),
            &layout.second,
            seconds_color,
        ),
        text(TextRole::Date, format_date(&now), &layout.date, fg),
    ];

    let mut icon = None;
    let mut icon_choice = IconChoice::None;
    if let Some(w) = weather {
        let s = &w.snapshot;
        texts.push(text(TextRole::HighTemp, format_temp(s.high_temp), &layout.high, fg));
        texts.push(text(TextRole::LowTemp, format_temp(s.low_temp), &layout.low, fg));
        texts.push(text(
            TextRole::Description,
            s.short_description.clone(),
            &layout.description,
            fg,
        ));
        let (bmp, choice) = w.icon.for_mode(ambient);
        icon = Some((bmp, layout.icon.origin(bounds)));
        icon_choice = choice;
    }

    FaceFrame {
        background: palette.background,
        anti_alias,
        ambient,
        texts,
        icon,
        icon_choice,
    }
}

/// Full repaint of a frame onto a surface: clear, then every element.
pub fn paint_frame(frame: &FaceFrame<'_>, surface: &mut dyn Surface) -> FaceResult<()> {
    surface.clear(frame.background)?;
    surface.set_anti_alias(frame.anti_alias);
    for t in &frame.texts {
        surface.draw_text(t)?;
    }
    if let Some((bmp, origin)) = frame.icon {
        surface.draw_bitmap(bmp, origin)?;
    }
    surface.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
