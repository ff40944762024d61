use std::sync::Arc;

use egui::ColorImage;
use log::debug;
use thiserror::Error;

/// A decoded background, shared between the document and its observers
pub type BackgroundImage = Arc<ColorImage>;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("No image data")]
    Empty,
    #[error("Unrecognized image data: {0}")]
    Format(#[from] image::ImageError),
    #[error("Image has zero width or height")]
    ZeroDimensions,
}

/// Decodes encoded image bytes into an RGBA bitmap.
///
/// Empty input and images with a zero dimension are rejected so observers
/// never receive a bitmap they can't lay out.
pub fn decode_background(bytes: &[u8]) -> Result<BackgroundImage, BitmapError> {
    if bytes.is_empty() {
        return Err(BitmapError::Empty);
    }

    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(BitmapError::ZeroDimensions);
    }
    debug!("Decoded background image: {}x{}", decoded.width(), decoded.height());

    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.as_flat_samples();
    Ok(Arc::new(ColorImage::from_rgba_unmultiplied(
        size,
        pixels.as_slice(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let image = decode_background(&png_bytes(3, 2)).unwrap();
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0], egui::Color32::RED);
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(decode_background(&[]), Err(BitmapError::Empty)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_background(b"definitely not an image"),
            Err(BitmapError::Format(_))
        ));
    }
}
