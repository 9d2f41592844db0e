//! Error type shared by the enhancement, detection and I/O layers.

use std::path::PathBuf;

use crate::region::Region;

pub type Result<T> = std::result::Result<T, StripError>;

/// Errors that can occur while reading, processing or writing a test strip image.
#[derive(Debug, thiserror::Error)]
pub enum StripError {
    /// The input could not be read or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An empty or zero-sized image reached the pipeline.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A region was sampled against an image it does not fit in.
    #[error(
        "region ({}, {}) {}x{} does not fit a {width}x{height} image",
        region.x, region.y, region.width, region.height
    )]
    OutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },

    /// The processed image could not be encoded or written.
    #[error("failed to save image {}: {reason}", path.display())]
    Save {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<image::ImageError>,
    },

    #[error("kornia image error: {0}")]
    Kornia(#[from] kornia::image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StripError {
    pub fn save(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Save {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }
}
