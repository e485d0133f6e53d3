//! Decoded image payload held by the byte cache.

use std::fmt;

use bytes::Bytes;
use image::DynamicImage;

use crate::domain::errors::FetchError;

/// Raw image payload together with its decoded form.
#[derive(Clone)]
pub struct ImageBytes {
    raw: Bytes,
    decoded: DynamicImage,
}

impl ImageBytes {
    /// Decodes a payload, sniffing the format from its contents.
    ///
    /// This is CPU bound; callers on the async runtime should run it on a
    /// blocking thread.
    ///
    /// # Errors
    /// Returns `FetchError::Decode` if the payload is not a supported image.
    pub fn decode(raw: Bytes) -> Result<Self, FetchError> {
        let decoded = image::load_from_memory(&raw)
            .map_err(|e| FetchError::decode(format!("failed to decode image: {e}")))?;

        Ok(Self { raw, decoded })
    }

    /// Returns the undecoded payload exactly as received.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Decoded width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.decoded.width()
    }

    /// Decoded height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.decoded.height()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Debug for ImageBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBytes")
            .field("len", &self.raw.len())
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat};

    /// Encodes a blank PNG of the given size.
    pub fn png(width: u32, height: u32) -> Bytes {
        let mut buf = Vec::new();
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        Bytes::from(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let raw = fixtures::png(4, 3);
        let image = ImageBytes::decode(raw.clone()).unwrap();

        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.as_bytes(), &raw[..]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImageBytes::decode(Bytes::from_static(b"<html>not an image</html>"));
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }
}
