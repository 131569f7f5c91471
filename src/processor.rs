//! The stateful editing session: an original snapshot plus a working copy.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{ImageProcessorError, Result};
use crate::image_handler::{Codec, ImageCodec};
use crate::pipeline::{Pipeline, Transform};
use crate::pixel_buffer::PixelBuffer;
use crate::stats::Stats;
use crate::transforms::GrayscaleWeights;
use crate::utils::paths;

/// An image loaded for editing.
///
/// `original` is captured at load time and never changes afterwards;
/// `current` is replaced by every transform. All mutating methods return
/// `&mut Self` so calls chain with `?`:
///
/// ```no_run
/// # use image_processor::{ImageProcessor, GrayscaleWeights};
/// # fn run() -> image_processor::Result<()> {
/// let mut editor = ImageProcessor::open("photo.jpg")?;
/// editor
///     .to_grayscale(GrayscaleWeights::default())?
///     .adjust_brightness(30)?
///     .compress(2)?;
/// editor.save(None)?;
/// # Ok(())
/// # }
/// ```
///
/// A failing step does not roll back the steps before it; call
/// [`reset`](Self::reset) to get back to the loaded image.
#[derive(Debug, Default)]
pub struct ImageProcessor<C = ImageCodec> {
    codec: C,
    original: Option<PixelBuffer>,
    current: Option<PixelBuffer>,
    source_path: Option<PathBuf>,
}

impl ImageProcessor<ImageCodec> {
    pub fn new() -> Self {
        Self::with_codec(ImageCodec)
    }

    /// Create a processor and load `path` straight away.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut processor = Self::new();
        processor.load(path)?;
        Ok(processor)
    }
}

impl<C: Codec> ImageProcessor<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            original: None,
            current: None,
            source_path: None,
        }
    }

    /// Decode `path` and make it both the original and the working image.
    ///
    /// Anything loaded before is discarded. On failure the previous state is
    /// left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let buffer = self.codec.decode(path)?;
        info!(
            "Image loaded from {}. Size: {}x{}",
            path.display(),
            buffer.width(),
            buffer.height()
        );
        self.current = Some(buffer.clone());
        self.original = Some(buffer);
        self.source_path = Some(path.to_path_buf());
        Ok(self)
    }

    /// Load an already decoded buffer, without a source path.
    pub fn load_buffer(&mut self, buffer: PixelBuffer) -> &mut Self {
        self.current = Some(buffer.clone());
        self.original = Some(buffer);
        self.source_path = None;
        self
    }

    /// Throw away all edits and go back to the loaded image.
    pub fn reset(&mut self) -> Result<&mut Self> {
        let original = self.original.as_ref().ok_or(ImageProcessorError::NotLoaded)?;
        self.current = Some(original.clone());
        info!("Image reset to original");
        Ok(self)
    }

    pub fn compress(&mut self, factor: u32) -> Result<&mut Self> {
        self.apply(&Transform::Compress(factor))
    }

    pub fn to_grayscale(&mut self, weights: GrayscaleWeights) -> Result<&mut Self> {
        self.apply(&Transform::Grayscale(weights))
    }

    pub fn adjust_brightness(&mut self, percent: i32) -> Result<&mut Self> {
        self.apply(&Transform::Brightness(percent))
    }

    /// Replace the working image with `step` applied to it.
    pub fn apply(&mut self, step: &Transform) -> Result<&mut Self> {
        let current = self.current.as_mut().ok_or(ImageProcessorError::NotLoaded)?;
        let before = current.shape();
        *current = step.apply(current)?;
        debug!("applied {step}: {before:?} -> {:?}", current.shape());
        Ok(self)
    }

    /// Apply each step in order. Steps that ran before a failure stay applied.
    pub fn apply_pipeline(&mut self, pipeline: &Pipeline) -> Result<&mut Self> {
        for step in pipeline.steps() {
            self.apply(step)?;
        }
        Ok(self)
    }

    /// Statistics of the working image, or `None` before anything is loaded.
    pub fn stats(&self) -> Option<Stats> {
        self.current.as_ref().map(Stats::of)
    }

    /// Encode the working image and return the path written.
    ///
    /// Without an explicit `path` the output goes next to the source file as
    /// `<stem>_processed<ext>`, or to `processed_image.jpg` if the image did
    /// not come from a file. Missing parent directories are created.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let current = self.current.as_ref().ok_or(ImageProcessorError::NotLoaded)?;
        let output = match path {
            Some(path) => path.to_path_buf(),
            None => paths::default_output_path(self.source_path.as_deref()),
        };
        paths::ensure_parent_dir(&output)?;
        self.codec.encode(current, &output)?;
        info!("Image saved: {}", output.display());
        Ok(output)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&PixelBuffer> {
        self.current.as_ref()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}
