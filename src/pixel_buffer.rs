//! Dense RGB pixel storage shared by every transform.
//!
//! A [`PixelBuffer`] is an `(height, width, 3)` array of `u8`, laid out the
//! same way as an interleaved RGB raster: row-major, channels innermost.

use image::{ImageBuffer, Rgb, RgbImage};
use ndarray::{Array3, ArrayView2, Axis};

use crate::error::{ImageProcessorError, Result};

/// Number of channels carried by every buffer (R, G, B).
pub const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Wrap an existing `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (_, _, channels) = data.dim();
        if channels != CHANNELS {
            return Err(ImageProcessorError::invalid(format!(
                "expected {CHANNELS} channels, got {channels}"
            )));
        }
        Ok(Self { data })
    }

    /// A buffer where every pixel has the same colour.
    pub fn filled(height: usize, width: usize, rgb: [u8; 3]) -> Self {
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| rgb[c]);
        Self { data }
    }

    /// Build from a `(height, width)` grid and a per-pixel closure.
    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; 3],
    {
        let mut data = Array3::zeros((height, width, CHANNELS));
        for y in 0..height {
            for x in 0..width {
                let px = f(y, x);
                for (c, &v) in px.iter().enumerate() {
                    data[[y, x, c]] = v;
                }
            }
        }
        Self { data }
    }

    /// Take over the interleaved bytes of an `RgbImage` without copying.
    pub fn from_rgb_image(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_interleaved(height as usize, width as usize, image.into_raw())
    }

    /// Wrap row-major RGB bytes; `raw` must hold exactly `height * width * 3` values.
    pub fn from_interleaved(height: usize, width: usize, raw: Vec<u8>) -> Result<Self> {
        let len = raw.len();
        let data = Array3::from_shape_vec((height, width, CHANNELS), raw).map_err(|e| {
            ImageProcessorError::invalid(format!(
                "{len} bytes do not fill a {width}x{height} RGB buffer: {e}"
            ))
        })?;
        Ok(Self { data })
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let (height, width, _) = self.data.dim();
        // `iter` walks in logical order whatever the memory layout is.
        let raw: Vec<u8> = self.data.iter().copied().collect();
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
            ImageProcessorError::invalid(format!(
                "buffer of {width}x{height} does not fit an RGB image"
            ))
        })
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn pixel(&self, y: usize, x: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    /// One colour plane as a `(height, width)` view.
    pub fn channel(&self, c: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), c)
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_has_uniform_pixels() {
        let buf = PixelBuffer::filled(3, 5, [10, 20, 30]);
        assert_eq!(buf.shape(), (3, 5, 3));
        assert_eq!(buf.pixel(0, 0), [10, 20, 30]);
        assert_eq!(buf.pixel(2, 4), [10, 20, 30]);
    }

    #[test]
    fn test_from_array_rejects_wrong_channel_count() {
        let arr = Array3::<u8>::zeros((2, 2, 4));
        assert!(matches!(
            PixelBuffer::from_array(arr),
            Err(ImageProcessorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rgb_image_conversion_preserves_layout() {
        let mut img: RgbImage = ImageBuffer::new(3, 2);
        img.put_pixel(2, 1, Rgb([1, 2, 3]));
        img.put_pixel(0, 1, Rgb([9, 8, 7]));

        let buf = PixelBuffer::from_rgb_image(img.clone()).unwrap();
        assert_eq!(buf.shape(), (2, 3, 3));
        assert_eq!(buf.pixel(1, 2), [1, 2, 3]);
        assert_eq!(buf.pixel(1, 0), [9, 8, 7]);

        let back = buf.to_rgb_image().unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_from_interleaved_requires_exact_length() {
        let buf = PixelBuffer::from_interleaved(2, 2, (0..12).collect()).unwrap();
        assert_eq!(buf.pixel(1, 0), [6, 7, 8]);

        for len in [0, 11, 13] {
            assert!(matches!(
                PixelBuffer::from_interleaved(2, 2, vec![0; len]),
                Err(ImageProcessorError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_from_fn_and_channel_view() {
        let buf = PixelBuffer::from_fn(2, 2, |y, x| [(y * 2 + x) as u8, 100, 200]);
        assert_eq!(buf.pixel(1, 1), [3, 100, 200]);
        let red = buf.channel(0);
        assert_eq!(red[[1, 0]], 2);
    }
}
