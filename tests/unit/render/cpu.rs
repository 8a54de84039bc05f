use super::*;

#[test]
fn rejects_empty_and_oversized_surfaces() {
    assert!(CpuSurface::new(0, 10).is_err());
    assert!(CpuSurface::new(10, 70_000).is_err());
}

#[test]
fn clear_fills_every_pixel() {
    let mut s = CpuSurface::new(8, 6).unwrap();
    s.clear(Rgba8::rgb(10, 20, 30)).unwrap();
    s.finish().unwrap();
    assert_eq!(s.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(s.pixel(7, 5), Some([10, 20, 30, 255]));
    assert_eq!(s.pixel(8, 0), None);
}

#[test]
fn bitmap_lands_at_origin() {
    let mut s = CpuSurface::new(16, 16).unwrap();
    s.clear(Rgba8::BLACK).unwrap();
    let icon = Bitmap::filled(4, 4, [255, 255, 255, 255]);
    s.draw_bitmap(&icon, Point::new(8.0, 8.0)).unwrap();
    s.finish().unwrap();

    assert_eq!(s.pixel(9, 9), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn text_without_font_is_skipped() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear(Rgba8::BLACK).unwrap();
    let item = TextItem {
        role: crate::render::frame::TextRole::Hour,
        text: "12".to_string(),
        origin: Point::new(0.0, 0.0),
        size_px: 6.0,
        color: Rgba8::WHITE,
    };
    s.draw_text(&item).unwrap();
    s.finish().unwrap();
    assert!(s.data().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn anti_alias_hint_is_recorded() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    assert!(s.anti_alias());
    s.set_anti_alias(false);
    assert!(!s.anti_alias());
}

#[test]
fn transparent_icon_pixels_keep_the_background() {
    let mut s = CpuSurface::new(12, 12).unwrap();
    s.clear(Rgba8::rgb(0, 0, 80)).unwrap();
    s.draw_bitmap(&Bitmap::filled(4, 4, [255, 0, 0, 0]), Point::new(4.0, 4.0))
        .unwrap();
    s.finish().unwrap();

    assert_eq!(s.pixel(5, 5), Some([0, 0, 80, 255]));
    assert_eq!(s.pixel(11, 11), Some([0, 0, 80, 255]));
}

#[test]
fn every_pass_repaints_the_background() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear(Rgba8::WHITE).unwrap();
    s.finish().unwrap();
    s.clear(Rgba8::BLACK).unwrap();
    s.draw_bitmap(&Bitmap::filled(2, 2, [0, 255, 0, 255]), Point::new(0.0, 0.0))
        .unwrap();
    s.finish().unwrap();

    assert_eq!(s.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(7, 7), Some([0, 0, 0, 255]));
}
