//! Decode/encode boundary.
//!
//! The core only sees [`PixelBuffer`]s; everything format-specific lives
//! behind the [`Codec`] trait. [`ImageCodec`] is the implementation backed by
//! the `image` crate (JPEG, PNG, BMP, GIF and whatever else it was built with).

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use crate::error::{ImageProcessorError, Result};
use crate::pixel_buffer::PixelBuffer;

pub trait Codec {
    /// Read the file at `path` into an RGB buffer.
    fn decode(&self, path: &Path) -> Result<PixelBuffer>;

    /// Write `buffer` to `path`. The format is chosen by the implementation.
    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<()>;
}

/// [`Codec`] backed by the `image` crate.
///
/// Decoding sniffs the format from the file contents, so a misnamed or
/// extensionless file still loads. Encoding picks the format from the
/// extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> Result<PixelBuffer> {
        let decode_err = |source: ImageError| ImageProcessorError::Decode {
            path: path.to_path_buf(),
            source,
        };
        let img = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_err(ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;
        PixelBuffer::from_rgb_image(img.into_rgb8())
    }

    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<()> {
        buffer
            .to_rgb_image()?
            .save(path)
            .map_err(|source| ImageProcessorError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Load image from bytes (supports PNG, JPEG, BMP, etc.)
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|source| ImageProcessorError::Decode {
        path: "<memory>".into(),
        source,
    })
}

/// Encode a buffer into an in-memory file of the given format.
pub fn save_image_to_bytes(buffer: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(buffer.to_rgb_image()?)
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|source| ImageProcessorError::Encode {
            path: "<memory>".into(),
            source,
        })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_round_trip_png() {
        let buf = PixelBuffer::from_fn(3, 4, |y, x| [(y * 10) as u8, (x * 20) as u8, 77]);
        let bytes = save_image_to_bytes(&buf, ImageFormat::Png).unwrap();
        let decoded = load_image_from_bytes(&bytes).unwrap();
        assert_eq!(PixelBuffer::from_rgb_image(decoded.into_rgb8()).unwrap(), buf);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = load_image_from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(ImageProcessorError::Decode { .. })));
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let path = Path::new("does/not/exist.png");
        let err = ImageCodec.decode(path).unwrap_err();
        assert_eq!(
            err,
            ImageProcessorError::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::ErrorKind::NotFound.into()),
            }
        );
    }
}
