//! In-memory RGB image editing: block-average downscaling, weighted grayscale
//! and brightness scaling, chained on a loaded image and saved back to disk.

pub mod config;
pub mod error;
pub mod image_handler;
pub mod pipeline;
pub mod pixel_buffer;
pub mod processor;
pub mod stats;
pub mod transforms;
pub mod utils;

pub use error::{ImageProcessorError, Result};
pub use image_handler::{Codec, ImageCodec};
pub use pipeline::{Pipeline, Preset, Transform};
pub use pixel_buffer::PixelBuffer;
pub use processor::ImageProcessor;
pub use stats::{ChannelStats, Stats};
pub use transforms::GrayscaleWeights;
