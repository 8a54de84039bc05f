use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_pixels() {
    let bytes = png_bytes(3, 2, [100, 50, 200, 128]);
    let bmp = decode_icon(Some(&bytes)).unwrap();
    assert_eq!((bmp.width(), bmp.height()), (3, 2));
    assert_eq!(bmp.pixel(2, 1), Some([100, 50, 200, 128]));
}

#[test]
fn premultiplied_copy_matches_rounding() {
    let bytes = png_bytes(1, 1, [100, 50, 200, 128]);
    let bmp = decode_icon(Some(&bytes)).unwrap();
    assert_eq!(
        bmp.to_premul_rgba8(),
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn absent_or_empty_bytes_are_null_asset() {
    assert!(matches!(decode_icon(None), Err(FaceError::NullAsset)));
    assert!(matches!(decode_icon(Some(&[])), Err(FaceError::NullAsset)));
}

#[test]
fn corrupt_bytes_are_malformed() {
    let err = decode_icon(Some(b"definitely not an image")).unwrap_err();
    assert!(matches!(err, FaceError::MalformedImage(_)));

    let mut truncated = png_bytes(4, 4, [1, 2, 3, 255]);
    truncated.truncate(20);
    assert!(matches!(
        decode_icon(Some(&truncated)),
        Err(FaceError::MalformedImage(_))
    ));
}

#[test]
fn png_reencode_survives_decode() {
    let bmp = Bitmap::filled(5, 7, [10, 20, 30, 255]);
    let bytes = encode_png(&bmp).unwrap();
    assert_eq!(decode_icon(Some(&bytes)).unwrap(), bmp);
}
