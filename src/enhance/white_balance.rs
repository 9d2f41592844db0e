//! Gray-world white balance.

use image::RgbImage;
use log::warn;

use super::clamp_u8;

/// Per-channel means of an RGB image, in R, G, B order.
pub fn channel_means(image: &RgbImage) -> [f64; 3] {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return [0.0; 3];
    }
    let mut sums = [0u64; 3];
    for pixel in image.pixels() {
        for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += value as u64;
        }
    }
    sums.map(|s| s as f64 / count as f64)
}

/// Rescales each channel so all three channel means equal their common average.
///
/// Channels whose mean is zero are left as they are.
pub fn gray_world(image: &RgbImage) -> RgbImage {
    let means = channel_means(image);
    let gray = means.iter().sum::<f64>() / 3.0;

    let scales = means.map(|mean| if mean > 0.0 { gray / mean } else { 1.0 });
    if means.iter().any(|&m| m <= 0.0) {
        warn!("white balance skipped an empty channel (means {means:?})");
    }

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for (value, scale) in pixel.0.iter_mut().zip(scales) {
            *value = clamp_u8(*value as f64 * scale);
        }
    }
    out
}
