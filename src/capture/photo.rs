use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageBuffer, ImageOutputFormat, Rgb, RgbImage};

use crate::error::{CaptureError, Result};

/// Data-URI prefix used when handing photo bytes to the upload service
const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A single captured still image
///
/// This is a simple wrapper around an RGB image buffer that provides the
/// encodings the booth needs: PNG bytes for downloads and a base64 data URI
/// for the upload service.
#[derive(Clone, Debug)]
pub struct Photo {
    buffer: RgbImage,
}

impl Photo {
    /// Create a new photo from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new photo with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Get the width of the photo
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the photo
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.buffer.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbImage {
        &mut self.buffer
    }

    /// Consume the photo, returning the underlying image buffer
    pub fn into_image(self) -> RgbImage {
        self.buffer
    }

    /// Decode a photo from encoded image bytes (PNG or JPEG)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).map_err(|e| CaptureError::DecodeFailed {
            reason: e.to_string(),
        })?;
        Ok(Self::new(image.to_rgb8()))
    }

    /// Encode the photo as PNG bytes
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.buffer
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| CaptureError::EncodeFailed { reason: e.to_string() })?;
        Ok(bytes)
    }

    /// Encode the photo as a `data:image/png;base64,...` URI
    pub fn to_data_uri(&self) -> Result<String> {
        let bytes = self.to_png_bytes()?;
        Ok(format!("{}{}", DATA_URI_PREFIX, BASE64.encode(bytes)))
    }

    /// Decode a photo from a base64 data URI
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        // The payload starts after the first comma, whatever the media type
        let payload = uri.split_once(',').map(|(_, p)| p).ok_or_else(|| {
            CaptureError::DecodeFailed {
                reason: "missing data URI payload".to_string(),
            }
        })?;

        let bytes = BASE64.decode(payload).map_err(|e| CaptureError::DecodeFailed {
            reason: e.to_string(),
        })?;

        Self::from_bytes(&bytes)
    }

    /// Save the photo as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        self.buffer.save(path.as_ref()).map_err(|e| CaptureError::EncodeFailed {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_roundtrip() {
        let photo = Photo::new_filled(8, 6, [200, 40, 40]);

        let uri = photo.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = Photo::from_data_uri(&uri).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 6);
        assert_eq!(decoded.get_pixel(3, 3), [200, 40, 40]);
    }

    #[test]
    fn test_invalid_data_uri_rejected() {
        assert!(Photo::from_data_uri("no comma here").is_err());
        assert!(Photo::from_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        assert!(Photo::from_bytes(b"not an image").is_err());
    }
}
