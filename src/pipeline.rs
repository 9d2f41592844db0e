//! Runs enhancement, detection and sampling over one image.

use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use log::info;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::detect::pads::detect_with_mask;
use crate::enhance::enhance;
use crate::error::Result;
use crate::histogram::{ColorStats, hsv_histograms};
use crate::image_io::{load_image, save_image};
use crate::region::{ColorSample, Region};
use crate::sampler::sample_regions;

/// Everything produced for a single input image.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub processed: RgbImage,
    /// Threshold mask the regions were extracted from.
    pub mask: GrayImage,
    pub regions: Vec<Region>,
    pub samples: Vec<ColorSample>,
}

pub fn analyze(image: &RgbImage, config: &PipelineConfig) -> Result<Analysis> {
    let processed = enhance(image, &config.enhance)?;
    let (regions, mask) = detect_with_mask(&processed, &config.detection)?;
    let samples = sample_regions(&processed, &regions)?;
    Ok(Analysis {
        processed,
        mask,
        regions,
        samples,
    })
}

/// Serializable summary of a [`process_file`] run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub samples: Vec<ColorSample>,
    pub stats: ColorStats,
}

/// Loads `input`, analyzes it and writes the enhanced image to `output`.
///
/// The analysis is returned alongside the report so callers can render
/// overlays without running the pipeline twice.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<(PipelineReport, Analysis)> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let image = load_image(input)?;
    let (width, height) = image.dimensions();
    info!("loaded {} ({width}x{height})", input.display());

    let analysis = analyze(&image, config)?;
    info!("detected {} regions", analysis.regions.len());

    save_image(&analysis.processed, output, config.output.jpeg_quality)?;
    info!("saved processed image to {}", output.display());

    let report = PipelineReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        samples: analysis.samples.clone(),
        stats: hsv_histograms(&analysis.processed).stats(),
    };
    Ok((report, analysis))
}

impl PipelineReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
