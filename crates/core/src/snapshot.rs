//! JPEG helpers for crash snapshots.
//!
//! Real snapshots come from the detection cameras. The seeder and tests use
//! a generated placeholder: a solid red frame with a white banner.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::CoreError;

/// Content type of every stored snapshot.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Default placeholder dimensions (width x height).
pub const PLACEHOLDER_SIZE: (u32, u32) = (600, 400);

const BACKGROUND: Rgb<u8> = Rgb([255, 0, 0]);
const BANNER: Rgb<u8> = Rgb([255, 255, 255]);

/// Render a placeholder snapshot and encode it as JPEG.
///
/// `stripes` white bars are drawn across the top of the frame so that
/// different test crashes produce visibly different images.
pub fn placeholder_jpeg(width: u32, height: u32, stripes: u32) -> Result<Vec<u8>, CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::Validation(
            "snapshot dimensions must be non-zero".into(),
        ));
    }

    let stripe_height = (height / 20).max(1);
    let image = RgbImage::from_fn(width, height, |x, y| {
        let stripe = y / stripe_height;
        let in_banner = stripe % 2 == 1 && stripe / 2 < stripes && x >= width / 20;
        if in_banner {
            BANNER
        } else {
            BACKGROUND
        }
    });

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| CoreError::Internal(format!("failed to encode snapshot: {e}")))?;
    Ok(buf.into_inner())
}

/// True when `bytes` start with the JPEG start-of-image marker.
pub fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}
