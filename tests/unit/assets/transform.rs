use super::*;

fn checker(w: u32, h: u32) -> Bitmap {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([220, 40, 10, 255])
        } else {
            image::Rgba([10, 90, 240, 200])
        }
    });
    Bitmap::from_rgba(img)
}

#[test]
fn luma_weights_sum_to_one() {
    assert_eq!(LUMA_R_Q16 + LUMA_G_Q16 + LUMA_B_Q16, 1 << 16);
}

#[test]
fn rescale_hits_exact_dimensions_in_both_modes() {
    let src = checker(7, 3);
    for (w, h) in [(1, 1), (64, 64), (10, 40), (3, 7), (100, 2)] {
        for mode in [ScaleMode::Independent, ScaleMode::Uniform] {
            let out = rescale(&src, w, h, mode).unwrap();
            assert_eq!((out.width(), out.height()), (w, h), "{mode:?} {w}x{h}");
        }
    }
}

#[test]
fn rescale_leaves_input_untouched() {
    let src = checker(4, 4);
    let before = src.clone();
    let _ = rescale(&src, 9, 2, ScaleMode::Independent).unwrap();
    assert_eq!(src, before);
}

#[test]
fn rescale_rejects_zero_target() {
    let src = checker(2, 2);
    assert!(matches!(
        rescale(&src, 0, 5, ScaleMode::Independent),
        Err(FaceError::Validation(_))
    ));
}

#[test]
fn uniform_pads_with_transparency() {
    let src = Bitmap::filled(4, 2, [255, 0, 0, 255]);
    let out = rescale(&src, 8, 8, ScaleMode::Uniform).unwrap();
    // 4x2 fits as 8x4, centered vertically: rows 0..2 and 6..8 are padding.
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(7, 7), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(4, 4), Some([255, 0, 0, 255]));
}

#[test]
fn desaturate_is_gray_and_keeps_alpha() {
    let src = checker(3, 3);
    let out = desaturate(&src);
    assert!(out.is_grayscale());
    assert_eq!(out.size(), src.size());
    assert_eq!(out.pixel(1, 0).unwrap()[3], 200);
    assert_eq!(out.pixel(0, 0).unwrap()[3], 255);
    assert!(!src.is_grayscale());
}

#[test]
fn desaturate_is_idempotent() {
    let src = checker(5, 4);
    let once = desaturate(&src);
    let twice = desaturate(&once);
    assert_eq!(once, twice);
}

#[test]
fn desaturate_extremes() {
    let white = Bitmap::filled(1, 1, [255, 255, 255, 255]);
    assert_eq!(desaturate(&white).pixel(0, 0), Some([255, 255, 255, 255]));
    let green = Bitmap::filled(1, 1, [0, 255, 0, 255]);
    // 0.715 * 255 = 182.3
    assert_eq!(desaturate(&green).pixel(0, 0), Some([182, 182, 182, 255]));
}
