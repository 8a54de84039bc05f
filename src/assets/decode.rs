use std::io::Cursor;

use anyhow::Context;

use crate::assets::bitmap::Bitmap;
use crate::foundation::error::{FaceError, FaceResult};

/// Decode an encoded icon (PNG, JPEG, ... anything `image` sniffs) into an owned bitmap.
///
/// `None` and an empty slice are both reported as [`FaceError::NullAsset`]: the caller forwarded
/// nothing, which is distinct from the remote side sending corrupt data.
#[tracing::instrument(level = "debug", skip_all)]
pub fn decode_icon(bytes: Option<&[u8]>) -> FaceResult<Bitmap> {
    let bytes = match bytes {
        Some(b) if !b.is_empty() => b,
        _ => return Err(FaceError::NullAsset),
    };
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FaceError::malformed_image(format!("decode icon from memory: {e}")))?;
    Ok(Bitmap::from_rgba(dyn_img.to_rgba8()))
}

/// Encode a bitmap as PNG, the format used for the cross-process handoff.
pub fn encode_png(bitmap: &Bitmap) -> FaceResult<Vec<u8>> {
    let mut buf = Vec::new();
    bitmap
        .as_image()
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode icon as png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
