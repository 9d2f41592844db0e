//! Tunable parameters for enhancement, detection and output.
//!
//! Every section implements `Default` with the values the reader was calibrated
//! with, and deserializes with `#[serde(default)]` so a JSON file only has to
//! name the fields it changes:
//!
//! ```no_run
//! use test_strip_reader::PipelineConfig;
//! use std::path::Path;
//!
//! let config = PipelineConfig::from_json_file(Path::new("strip.json"))?;
//! assert_eq!(config.output.jpeg_quality, 95);
//! # Ok::<(), test_strip_reader::StripError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const BILATERAL_DIAMETER: u32 = 9;
const BILATERAL_SIGMA_COLOR: f64 = 75.0;
const BILATERAL_SIGMA_SPACE: f64 = 75.0;
const CLAHE_CLIP_LIMIT: f64 = 2.0;
const CLAHE_TILES: u32 = 8;
const THRESHOLD_BLOCK_SIZE: u32 = 11;
const THRESHOLD_OFFSET: i32 = 2;
const MIN_PAD_AREA: f64 = 100.0;
const MAX_PAD_AREA: f64 = 10_000.0;
const MIN_ASPECT_RATIO: f64 = 0.5;
const MAX_ASPECT_RATIO: f64 = 3.0;
const ROW_TOLERANCE: u32 = 50;
const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub enhance: EnhanceConfig,
    pub detection: DetectionConfig,
    pub output: OutputConfig,
}

/// Parameters of the five enhancement stages.
///
/// White balance and sharpening have no parameters; they are always applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub denoise: DenoiseConfig,
    pub contrast: ContrastConfig,
}

/// Bilateral filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Neighbourhood diameter in pixels; the window is the disc of radius `diameter / 2`.
    pub diameter: u32,
    pub sigma_color: f64,
    pub sigma_space: f64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            diameter: BILATERAL_DIAMETER,
            sigma_color: BILATERAL_SIGMA_COLOR,
            sigma_space: BILATERAL_SIGMA_SPACE,
        }
    }
}

/// CLAHE parameters applied to the L* channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub clip_limit: f64,
    /// Number of tile columns the image is split into.
    pub tiles_x: u32,
    /// Number of tile rows the image is split into.
    pub tiles_y: u32,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            clip_limit: CLAHE_CLIP_LIMIT,
            tiles_x: CLAHE_TILES,
            tiles_y: CLAHE_TILES,
        }
    }
}

/// Pad detection parameters.
///
/// Area and aspect bounds are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Side of the Gaussian window used for the local mean (odd, >= 3).
    pub block_size: u32,
    /// A pixel is foreground when it is at least this much darker than its local mean.
    pub offset: i32,
    pub min_area: f64,
    pub max_area: f64,
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Regions whose top edges differ by less than this are ordered as one row.
    pub row_tolerance: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            block_size: THRESHOLD_BLOCK_SIZE,
            offset: THRESHOLD_OFFSET,
            min_area: MIN_PAD_AREA,
            max_area: MAX_PAD_AREA,
            min_aspect_ratio: MIN_ASPECT_RATIO,
            max_aspect_ratio: MAX_ASPECT_RATIO,
            row_tolerance: ROW_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
