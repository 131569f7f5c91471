//! Pixel-level transforms.
//!
//! Each transform reads a [`PixelBuffer`] and produces a new one. The three
//! operations round differently: `compress` and `to_grayscale` truncate their
//! float or integer result, `to_grayscale` additionally wraps on overflow, and
//! `adjust_brightness` clamps to `[0, 255]` before truncating. These rules are
//! observable in the output and are kept separate.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, Axis, Zip, s};

use crate::error::{ImageProcessorError, Result};
use crate::pixel_buffer::{CHANNELS, PixelBuffer};

/// Lowest accepted brightness change, in percent.
pub const MIN_BRIGHTNESS_PERCENT: i32 = -100;
/// Highest accepted brightness change, in percent.
pub const MAX_BRIGHTNESS_PERCENT: i32 = 100;

/// Per-channel weights for the luma sum.
///
/// Any triple is accepted. Weights that sum above 1 can push the luma past
/// 255, which then wraps (see [`to_grayscale`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrayscaleWeights {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl GrayscaleWeights {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::new(0.5, 0.3, 0.2)
    }
}

impl fmt::Display for GrayscaleWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for GrayscaleWeights {
    type Err = ImageProcessorError;

    /// Parses `"r,g,b"`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ImageProcessorError::invalid(format!(
                "grayscale weights must be three comma-separated numbers, got '{s}'"
            )));
        }
        let mut values = [0.0f64; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                ImageProcessorError::invalid(format!("invalid grayscale weight '{part}'"))
            })?;
        }
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

/// Block-averaging downscale.
///
/// Trailing rows and columns that do not fill a whole `factor x factor` block
/// are dropped. Each output channel value is the block mean truncated to `u8`.
/// The output shape is `(H / factor, W / factor, 3)`; a factor larger than a
/// dimension yields zero pixels along it.
///
/// # Errors
/// `InvalidArgument` if `factor` is zero.
pub fn compress(buffer: &PixelBuffer, factor: u32) -> Result<PixelBuffer> {
    if factor == 0 {
        return Err(ImageProcessorError::invalid(
            "compression factor must be at least 1",
        ));
    }

    let f = factor as usize;
    let (height, width, _) = buffer.shape();
    let (out_h, out_w) = (height / f, width / f);
    if out_h == 0 || out_w == 0 {
        return PixelBuffer::from_array(Array3::zeros((out_h, out_w, CHANNELS)));
    }

    let src = buffer.as_array();
    // Both dimensions are >= f here, so f * f cannot overflow.
    let block_len = (f * f) as u64;
    let out = Array3::from_shape_fn((out_h, out_w, CHANNELS), |(by, bx, c)| {
        let block = src.slice(s![by * f..(by + 1) * f, bx * f..(bx + 1) * f, c]);
        let sum: u64 = block.iter().map(|&v| u64::from(v)).sum();
        (sum / block_len) as u8
    });

    PixelBuffer::from_array(out)
}

/// Weighted-sum grayscale.
///
/// The luma plane is computed in full from the input before any channel is
/// written, then copied into R, G and B. No clamp is applied: the sum is
/// truncated toward zero and wrapped modulo 256.
pub fn to_grayscale(buffer: &PixelBuffer, weights: GrayscaleWeights) -> Result<PixelBuffer> {
    let luma = Zip::from(buffer.channel(0))
        .and(buffer.channel(1))
        .and(buffer.channel(2))
        .map_collect(|&r, &g, &b| {
            wrap_to_u8(
                f64::from(r) * weights.r + f64::from(g) * weights.g + f64::from(b) * weights.b,
            )
        });

    let out = luma
        .insert_axis(Axis(2))
        .broadcast(buffer.shape())
        .map(|view| view.to_owned())
        .ok_or_else(|| ImageProcessorError::invalid("luma plane does not match the buffer"))?;
    PixelBuffer::from_array(out)
}

/// Narrow a float to `u8` the way an unchecked 8-bit cast does.
fn wrap_to_u8(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.trunc() as i64).rem_euclid(256) as u8
}

/// Linear brightness scaling by `1 + percent / 100`, clamped to `[0, 255]`.
///
/// # Errors
/// `InvalidArgument` if `percent` is outside `[-100, 100]`.
pub fn adjust_brightness(buffer: &PixelBuffer, percent: i32) -> Result<PixelBuffer> {
    if !(MIN_BRIGHTNESS_PERCENT..=MAX_BRIGHTNESS_PERCENT).contains(&percent) {
        return Err(ImageProcessorError::invalid(format!(
            "brightness percent must be from {MIN_BRIGHTNESS_PERCENT} to {MAX_BRIGHTNESS_PERCENT}, got {percent}"
        )));
    }

    let scale = (1.0 + f64::from(percent) / 100.0) as f32;
    let out = buffer
        .as_array()
        .mapv(|v| (f32::from(v) * scale).clamp(0.0, 255.0) as u8);

    PixelBuffer::from_array(out)
}
