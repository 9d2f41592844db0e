use image::RgbImage;
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

pub fn histogram(values: &[u8]) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Global histogram equalization lookup table.
///
/// The lowest occupied level maps to 0 and the rest follow the cumulative
/// distribution scaled to 255. A histogram with a single occupied level (or
/// none) yields the identity table.
pub fn equalization_lut(hist: &[u32; 256]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return identity_lut();
    };
    let first_count = hist[first] as u64;
    if first_count == total {
        return identity_lut();
    }

    let scale = 255.0 / (total - first_count) as f64;
    let mut sum = 0u64;
    for (value, &count) in hist.iter().enumerate().skip(first + 1) {
        sum += count as u64;
        lut[value] = (sum as f64 * scale).round().min(255.0) as u8;
    }
    lut
}

fn identity_lut() -> [u8; 256] {
    std::array::from_fn(|i| i as u8)
}

/// Hue, saturation and value histograms in 8-bit HSV encoding
/// (hue is halved to fit 0..180).
#[derive(Debug, Clone)]
pub struct HsvHistograms {
    pub hue: [u32; 256],
    pub saturation: [u32; 256],
    pub value: [u32; 256],
}

/// Summary of an [`HsvHistograms`], as printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStats {
    pub pixel_count: u64,
    pub mean_hue: f64,
    pub mean_saturation: f64,
    pub mean_value: f64,
}

pub fn hsv_histograms(image: &RgbImage) -> HsvHistograms {
    let mut hists = HsvHistograms {
        hue: [0; 256],
        saturation: [0; 256],
        value: [0; 256],
    };
    for p in image.pixels() {
        let rgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
        let hsv = Hsv::from_color(rgb);
        let hue = (hsv.hue.into_positive_degrees() / 2.0).round() as usize % 180;
        let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as usize;
        hists.hue[hue] += 1;
        hists.saturation[saturation] += 1;
        hists.value[p[0].max(p[1]).max(p[2]) as usize] += 1;
    }
    hists
}

impl HsvHistograms {
    pub fn stats(&self) -> ColorStats {
        let pixel_count: u64 = self.value.iter().map(|&c| c as u64).sum();
        ColorStats {
            pixel_count,
            mean_hue: histogram_mean(&self.hue, pixel_count),
            mean_saturation: histogram_mean(&self.saturation, pixel_count),
            mean_value: histogram_mean(&self.value, pixel_count),
        }
    }
}

fn histogram_mean(hist: &[u32; 256], count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let weighted: f64 = hist
        .iter()
        .enumerate()
        .map(|(level, &c)| level as f64 * c as f64)
        .sum();
    weighted / count as f64
}
