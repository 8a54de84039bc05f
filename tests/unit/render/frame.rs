use chrono::TimeZone;

use super::*;
use crate::engine::state::DecodedIcon;
use crate::foundation::core::DisplayShape;
use crate::render::surface::{RecordingSurface, SurfaceOp};
use crate::sync::message::WeatherSnapshot;

fn palette() -> Palette {
    Palette {
        background: Rgba8::BLACK,
        foreground: Rgba8::WHITE,
        ambient_seconds: Rgba8::GRAY,
    }
}

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 4, 7, 5, 9)
        .unwrap()
}

fn weather() -> CurrentWeather {
    CurrentWeather {
        snapshot: WeatherSnapshot {
            weather_id: 800,
            high_temp: 75,
            low_temp: -3,
            short_description: "Clear".to_string(),
            icon_asset: None,
        },
        icon: DecodedIcon::new(Bitmap::filled(4, 4, [0, 128, 255, 255])),
    }
}

fn input<'a>(
    layout: &'a FaceLayout,
    weather: Option<&'a CurrentWeather>,
    ambient: bool,
) -> FrameInput<'a> {
    FrameInput {
        now: now(),
        ambient,
        anti_alias: true,
        weather,
        layout,
        palette: palette(),
        bounds: Rect::new(0.0, 0.0, 320.0, 320.0),
    }
}

#[test]
fn clock_strings_are_zero_padded() {
    let layout = FaceLayout::for_shape(DisplayShape::Round);
    let frame = compose_frame(input(&layout, None, false));
    assert_eq!(frame.text(TextRole::Hour), Some("07"));
    assert_eq!(frame.text(TextRole::Minute), Some("05"));
    assert_eq!(frame.text(TextRole::Second), Some("09"));
    assert_eq!(frame.text(TextRole::Date), Some("Tue, Mar 4"));
}

#[test]
fn weather_fields_absent_before_first_snapshot() {
    let layout = FaceLayout::for_shape(DisplayShape::Square);
    let frame = compose_frame(input(&layout, None, false));
    assert!(frame.text(TextRole::HighTemp).is_none());
    assert!(frame.text(TextRole::Description).is_none());
    assert!(frame.icon.is_none());
    assert_eq!(frame.icon_choice, IconChoice::None);
}

#[test]
fn temperatures_get_degree_sign() {
    let layout = FaceLayout::for_shape(DisplayShape::Round);
    let w = weather();
    let frame = compose_frame(input(&layout, Some(&w), false));
    assert_eq!(frame.text(TextRole::HighTemp), Some("75°"));
    assert_eq!(frame.text(TextRole::LowTemp), Some("-3°"));
    assert_eq!(frame.text(TextRole::Description), Some("Clear"));
    assert_eq!(frame.icon_choice, IconChoice::Interactive);
}

#[test]
fn ambient_seconds_are_gray_and_shape_styles_differ() {
    let round = FaceLayout::for_shape(DisplayShape::Round);
    let square = FaceLayout::for_shape(DisplayShape::Square);
    assert_ne!(round.seconds_color, square.seconds_color);

    let seconds_color = |frame: &FaceFrame<'_>| {
        frame
            .texts
            .iter()
            .find(|t| t.role == TextRole::Second)
            .map(|t| t.color)
    };
    assert_eq!(
        seconds_color(&compose_frame(input(&round, None, false))),
        Some(round.seconds_color)
    );
    assert_eq!(
        seconds_color(&compose_frame(input(&round, None, true))),
        Some(Rgba8::GRAY)
    );
}

#[test]
fn ambient_without_cached_icon_uses_interactive() {
    let layout = FaceLayout::for_shape(DisplayShape::Round);
    let w = weather();
    let frame = compose_frame(input(&layout, Some(&w), true));
    assert_eq!(frame.icon_choice, IconChoice::InteractiveFallback);
    assert_eq!(frame.icon.map(|(b, _)| b), Some(w.icon.interactive()));
}

#[test]
fn paint_clears_first_and_draws_everything() {
    let layout = FaceLayout::for_shape(DisplayShape::Round);
    let w = weather();
    let frame = compose_frame(input(&layout, Some(&w), false));
    let mut surface = RecordingSurface::new();
    paint_frame(&frame, &mut surface).unwrap();

    let ops = surface.ops();
    assert_eq!(ops.first(), Some(&SurfaceOp::Clear(Rgba8::BLACK)));
    assert_eq!(ops.last(), Some(&SurfaceOp::Finish));
    let texts = ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::Text(_)))
        .count();
    assert_eq!(texts, 7);
    assert_eq!(surface.last_bitmap(), Some(w.icon.interactive()));
}

#[test]
fn slots_scale_with_bounds() {
    let slot = FaceLayout::for_shape(DisplayShape::Square).hour;
    let small = slot.origin(Rect::new(0.0, 0.0, 100.0, 100.0));
    let big = slot.origin(Rect::new(0.0, 0.0, 400.0, 400.0));
    assert!((big.x - small.x * 4.0).abs() < 1e-9);
    assert!(slot.size_px(Rect::new(0.0, 0.0, 400.0, 400.0)) > 1.0);
}
