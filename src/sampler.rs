//! Reduces detected regions to a single representative color.

use image::RgbImage;

use crate::error::{Result, StripError};
use crate::region::{ColorSample, Region};

/// Mean color of every pixel in `region`, rounded per channel.
///
/// Fails with [`StripError::OutOfBounds`] when the region is empty or does not
/// lie entirely inside `image`.
pub fn sample_color(image: &RgbImage, region: &Region) -> Result<ColorSample> {
    let (width, height) = image.dimensions();
    if !region.fits_within(width, height) {
        return Err(StripError::OutOfBounds {
            region: *region,
            width,
            height,
        });
    }

    let mut sums = [0u64; 3];
    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let p = image.get_pixel(x, y);
            for (sum, &c) in sums.iter_mut().zip(p.0.iter()) {
                *sum += c as u64;
            }
        }
    }

    let count = region.bbox_area() as f64;
    let color = sums.map(|s| (s as f64 / count).round().min(255.0) as u8);
    Ok(ColorSample {
        region: *region,
        color,
    })
}

pub fn sample_regions(image: &RgbImage, regions: &[Region]) -> Result<Vec<ColorSample>> {
    regions.iter().map(|r| sample_color(image, r)).collect()
}
