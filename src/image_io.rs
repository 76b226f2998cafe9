//! Decoding uploaded page images and encoding rendered overlays.

use crate::error::{LayoutEvalError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Decode an uploaded image payload into 8-bit RGB.
///
/// # Errors
///
/// Returns [`LayoutEvalError::InvalidInput`] for an empty payload or one the
/// decoder cannot read.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(LayoutEvalError::InvalidInput("Empty image file".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| LayoutEvalError::InvalidInput(format!("Unreadable image: {e}")))?;

    log::debug!("decoded {}x{} image", image.width(), image.height());
    Ok(image.to_rgb8())
}

/// Encode an RGB image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Encode an RGB image as a `data:image/png;base64,...` URI.
pub fn png_data_uri(image: &RgbImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_empty_payload() {
        match decode_image(&[]) {
            Err(LayoutEvalError::InvalidInput(msg)) => assert!(msg.contains("Empty")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_payload() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(LayoutEvalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_png_keeps_pixels_and_size() {
        let mut image = RgbImage::from_pixel(7, 5, Rgb([255, 255, 255]));
        image.put_pixel(3, 2, Rgb([10, 20, 30]));

        let decoded = decode_image(&encode_png(&image).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (7, 5));
        assert_eq!(decoded.get_pixel(3, 2), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = png_data_uri(&RgbImage::new(2, 2)).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
