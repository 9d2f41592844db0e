//! Five-stage enhancement applied before pad detection.
//!
//! Every stage takes an image by reference and returns a new one with the same
//! dimensions, so stages can be run and tested in isolation.

use image::RgbImage;
use log::debug;

use crate::config::EnhanceConfig;
use crate::error::{Result, StripError};

pub mod contrast;
pub mod denoise;
pub mod lighting;
pub mod sharpen;
pub mod white_balance;

pub use contrast::clahe_luminance;
pub use denoise::bilateral_filter;
pub use lighting::normalize_lighting;
pub use sharpen::sharpen;
pub use white_balance::gray_world;

/// Runs noise reduction, adaptive contrast, white balance, sharpening and
/// lighting normalization, in that order.
pub fn enhance(image: &RgbImage, config: &EnhanceConfig) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(StripError::InvalidInput(format!(
            "cannot enhance an empty {width}x{height} image"
        )));
    }

    let denoised = bilateral_filter(image, &config.denoise);
    debug!("denoised {width}x{height}");
    let contrasted = clahe_luminance(&denoised, &config.contrast);
    debug!("applied CLAHE to luminance");
    let balanced = gray_world(&contrasted);
    debug!("applied gray-world white balance");
    let sharpened = sharpen(&balanced);
    debug!("sharpened");
    let normalized = normalize_lighting(&sharpened);
    debug!("normalized lighting");

    Ok(normalized)
}

/// Maps a possibly out-of-range coordinate into `0..len` by mirroring around
/// the edge pixels without repeating them (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect101(index: i64, len: usize) -> usize {
    let len = len as i64;
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

pub(crate) fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
