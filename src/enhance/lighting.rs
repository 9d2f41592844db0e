//! Global brightness normalization in HSV space.

use image::{Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

use super::clamp_u8;
use crate::histogram::{equalization_lut, histogram};

/// Equalizes the HSV value channel over the whole image; hue and saturation are kept.
///
/// The 8-bit value of a pixel is its largest channel, so the histogram is built
/// from that directly. Pixels whose value maps to itself are copied unchanged.
pub fn normalize_lighting(image: &RgbImage) -> RgbImage {
    let values: Vec<u8> = image
        .pixels()
        .map(|p| p[0].max(p[1]).max(p[2]))
        .collect();
    let lut = equalization_lut(&histogram(&values));

    let mut out = image.clone();
    for (pixel, &v) in out.pixels_mut().zip(&values) {
        let mapped = lut[v as usize];
        if mapped == v {
            continue;
        }
        let rgb: Srgb<f32> = Srgb::new(pixel[0], pixel[1], pixel[2]).into_format();
        let mut hsv = Hsv::from_color(rgb);
        hsv.value = mapped as f32 / 255.0;
        let rgb = Srgb::from_color(hsv);
        *pixel = Rgb([
            clamp_u8(rgb.red as f64 * 255.0),
            clamp_u8(rgb.green as f64 * 255.0),
            clamp_u8(rgb.blue as f64 * 255.0),
        ]);
    }
    out
}
