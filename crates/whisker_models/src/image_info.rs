//! Lightweight inspection of uploaded images.

use image::ImageReader;
use std::io::Cursor;

/// Format and dimensions of a decodable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: image::ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Sniff the format and read the dimensions from the image header.
///
/// Returns `None` when the bytes are not a supported image. Only the header
/// is parsed; pixel data is never decoded.
pub fn inspect_image(bytes: &[u8]) -> Option<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let format = reader.format()?;
    let (width, height) = reader.into_dimensions().ok()?;
    Some(ImageInfo {
        format,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_png_header_is_read() {
        let info = inspect_image(&encode(3, 2, image::ImageFormat::Png)).unwrap();
        assert_eq!(info.format, image::ImageFormat::Png);
        assert_eq!((info.width, info.height), (3, 2));
    }

    #[test]
    fn test_jpeg_header_is_read() {
        let info = inspect_image(&encode(40, 30, image::ImageFormat::Jpeg)).unwrap();
        assert_eq!(info.format, image::ImageFormat::Jpeg);
        assert_eq!((info.width, info.height), (40, 30));
    }

    #[test]
    fn test_text_is_not_an_image() {
        assert!(inspect_image(b"definitely not an image").is_none());
        assert!(inspect_image(&[]).is_none());
    }
}
