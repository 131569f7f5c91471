use std::path::PathBuf;

use thiserror::Error;

/// The central error type for all operations in the image_processor.
#[derive(Error, Debug)]
pub enum ImageProcessorError {
    #[error("No image loaded, load an image first")]
    NotLoaded,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageProcessorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ImageProcessorError::InvalidArgument(msg.into())
    }
}

// Variant-level equality. Wrapped foreign errors are not comparable, so only
// the kind of failure is checked for those.
impl PartialEq for ImageProcessorError {
    fn eq(&self, other: &Self) -> bool {
        use ImageProcessorError::*;
        match (self, other) {
            (NotLoaded, NotLoaded) => true,
            (InvalidArgument(a), InvalidArgument(b)) => a == b,
            (Decode { path: a, .. }, Decode { path: b, .. }) => a == b,
            (Encode { path: a, .. }, Encode { path: b, .. }) => a == b,
            (Filesystem { path: a, .. }, Filesystem { path: b, .. }) => a == b,
            (Io(_), Io(_)) => true,
            _ => false,
        }
    }
}

/// A centralized result type for our library.
pub type Result<T> = std::result::Result<T, ImageProcessorError>;
