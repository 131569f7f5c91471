//! Composable transform chains.
//!
//! A [`Pipeline`] is an ordered list of [`Transform`] steps. It can be parsed
//! from a compact text form such as `grayscale;brightness:30;compress:2`,
//! which is what the CLI accepts for `--chain`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ImageProcessorError, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::transforms::{self, GrayscaleWeights};

/// A single step of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Compress(u32),
    Grayscale(GrayscaleWeights),
    Brightness(i32),
}

impl Transform {
    /// Apply this step to `buffer`, producing a new buffer.
    pub fn apply(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        match *self {
            Transform::Compress(factor) => transforms::compress(buffer, factor),
            Transform::Grayscale(weights) => transforms::to_grayscale(buffer, weights),
            Transform::Brightness(percent) => transforms::adjust_brightness(buffer, percent),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Compress(factor) => write!(f, "compress:{factor}"),
            Transform::Grayscale(weights) if *weights == GrayscaleWeights::default() => {
                write!(f, "grayscale")
            }
            Transform::Grayscale(weights) => write!(f, "grayscale:{weights}"),
            Transform::Brightness(percent) => write!(f, "brightness:{percent}"),
        }
    }
}

impl FromStr for Transform {
    type Err = ImageProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s, None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("compress", Some(arg)) => arg.parse().map(Transform::Compress).map_err(|_| {
                ImageProcessorError::invalid(format!("invalid compression factor '{arg}'"))
            }),
            ("grayscale" | "gray", None) => Ok(Transform::Grayscale(GrayscaleWeights::default())),
            ("grayscale" | "gray", Some(arg)) => arg.parse().map(Transform::Grayscale),
            ("brightness", Some(arg)) => arg.parse().map(Transform::Brightness).map_err(|_| {
                ImageProcessorError::invalid(format!("invalid brightness percent '{arg}'"))
            }),
            ("compress" | "brightness", None) => Err(ImageProcessorError::invalid(format!(
                "'{name}' needs an argument, e.g. '{name}:2'"
            ))),
            _ => Err(ImageProcessorError::invalid(format!("unknown operation '{s}'"))),
        }
    }
}

/// An ordered chain of transforms applied left to right.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Transform>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: Transform) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Transform) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Transform] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step on a copy of `buffer` and return the final result.
    ///
    /// Leaves `buffer` untouched. The first failing step aborts the run.
    pub fn apply(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        let mut current = buffer.clone();
        for step in &self.steps {
            current = step.apply(&current)?;
        }
        Ok(current)
    }
}

impl From<Vec<Transform>> for Pipeline {
    fn from(steps: Vec<Transform>) -> Self {
        Self { steps }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "empty");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for Pipeline {
    type Err = ImageProcessorError;

    /// Parses `;`-separated steps. Empty segments are ignored.
    fn from_str(s: &str) -> Result<Self> {
        s.split(';')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<Transform>)
            .collect::<Result<Vec<_>>>()
            .map(Pipeline::from)
    }
}

/// Ready-made chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// grayscale -> +30% -> compress 2
    GrayBrightCompress,
    /// compress 2 -> grayscale -> +20%
    CompressGrayBright,
    /// +50% -> grayscale
    BrightGray,
    /// grayscale -> +10% -> compress 2, used for directory runs
    Batch,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::GrayBrightCompress,
        Preset::CompressGrayBright,
        Preset::BrightGray,
        Preset::Batch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::GrayBrightCompress => "gray-bright-compress",
            Preset::CompressGrayBright => "compress-gray-bright",
            Preset::BrightGray => "bright-gray",
            Preset::Batch => "batch",
        }
    }

    pub fn pipeline(self) -> Pipeline {
        let gray = Transform::Grayscale(GrayscaleWeights::default());
        match self {
            Preset::GrayBrightCompress => Pipeline::new()
                .then(gray)
                .then(Transform::Brightness(30))
                .then(Transform::Compress(2)),
            Preset::CompressGrayBright => Pipeline::new()
                .then(Transform::Compress(2))
                .then(gray)
                .then(Transform::Brightness(20)),
            Preset::BrightGray => Pipeline::new().then(Transform::Brightness(50)).then(gray),
            Preset::Batch => Pipeline::new()
                .then(gray)
                .then(Transform::Brightness(10))
                .then(Transform::Compress(2)),
        }
    }
}

impl FromStr for Preset {
    type Err = ImageProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                ImageProcessorError::invalid(format!(
                    "unknown preset '{s}', expected one of: {}",
                    names.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain() {
        let pipeline: Pipeline = "grayscale; brightness:30 ;compress:2".parse().unwrap();
        assert_eq!(
            pipeline.steps(),
            &[
                Transform::Grayscale(GrayscaleWeights::default()),
                Transform::Brightness(30),
                Transform::Compress(2),
            ]
        );
        assert_eq!(pipeline, Preset::GrayBrightCompress.pipeline());
    }

    #[test]
    fn test_parse_custom_weights_and_negative_percent() {
        let pipeline: Pipeline = "grayscale:0.2,0.7,0.1;brightness:-20".parse().unwrap();
        assert_eq!(
            pipeline.steps(),
            &[
                Transform::Grayscale(GrayscaleWeights::new(0.2, 0.7, 0.1)),
                Transform::Brightness(-20),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_steps() {
        assert!("blur:3".parse::<Pipeline>().is_err());
        assert!("compress".parse::<Pipeline>().is_err());
        assert!("compress:two".parse::<Pipeline>().is_err());
        assert!("brightness:1.5".parse::<Pipeline>().is_err());
        assert!("grayscale:1,2".parse::<Pipeline>().is_err());
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let pipeline: Pipeline = "".parse().unwrap();
        assert!(pipeline.is_empty());
        let buf = PixelBuffer::filled(2, 3, [4, 5, 6]);
        assert_eq!(pipeline.apply(&buf).unwrap(), buf);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let pipeline = Preset::CompressGrayBright.pipeline();
        assert_eq!(pipeline.to_string(), "compress:2 -> grayscale -> brightness:20");

        let text: Vec<String> = pipeline.steps().iter().map(|s| s.to_string()).collect();
        let reparsed: Pipeline = text.join(";").parse().unwrap();
        assert_eq!(reparsed, pipeline);
    }

    #[test]
    fn test_apply_runs_left_to_right() {
        let buf = PixelBuffer::filled(4, 4, [100, 100, 100]);
        let out = Preset::GrayBrightCompress.pipeline().apply(&buf).unwrap();
        // gray: 100*0.5 + 100*0.3 + 100*0.2 = 100, then * 1.3 = 130
        assert_eq!(out.shape(), (2, 2, 3));
        assert_eq!(out.pixel(1, 1), [130, 130, 130]);
    }

    #[test]
    fn test_apply_stops_on_first_error() {
        let pipeline = Pipeline::new()
            .then(Transform::Brightness(150))
            .then(Transform::Compress(2));
        let buf = PixelBuffer::filled(2, 2, [1, 1, 1]);
        assert!(matches!(
            pipeline.apply(&buf),
            Err(ImageProcessorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_preset_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("sepia".parse::<Preset>().is_err());
    }
}
