//! Edge-preserving bilateral smoothing.

use image::{Rgb, RgbImage};

use super::{clamp_u8, reflect101};
use crate::config::DenoiseConfig;

/// Largest possible sum of absolute channel differences between two RGB pixels.
const MAX_COLOR_DISTANCE: usize = 3 * 255;

/// Replaces each pixel with a weighted mean of the pixels in a disc around it.
///
/// Weights fall off with spatial distance and with the L1 color distance to the
/// center pixel, so strong edges (pad borders) survive while sensor noise is
/// averaged out. Borders are reflected.
pub fn bilateral_filter(image: &RgbImage, config: &DenoiseConfig) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let sigma_color = if config.sigma_color > 0.0 {
        config.sigma_color
    } else {
        1.0
    };
    let sigma_space = if config.sigma_space > 0.0 {
        config.sigma_space
    } else {
        1.0
    };
    let radius = (config.diameter / 2).max(1) as i64;

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let color_weights: Vec<f64> = (0..=MAX_COLOR_DISTANCE)
        .map(|d| ((d * d) as f64 * color_coeff).exp())
        .collect();

    let mut window: Vec<(i64, i64, f64)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f64;
            if r2.sqrt() > radius as f64 {
                continue;
            }
            window.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }

    let (w, h) = (width as usize, height as usize);
    let src = image.as_raw();
    let mut out = RgbImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let center = (y * w + x) * 3;
            let (cr, cg, cb) = (src[center], src[center + 1], src[center + 2]);

            let mut sum = [0f64; 3];
            let mut weight_sum = 0f64;
            for &(dx, dy, space_weight) in &window {
                let nx = reflect101(x as i64 + dx, w);
                let ny = reflect101(y as i64 + dy, h);
                let idx = (ny * w + nx) * 3;
                let (r, g, b) = (src[idx], src[idx + 1], src[idx + 2]);

                let distance = r.abs_diff(cr) as usize
                    + g.abs_diff(cg) as usize
                    + b.abs_diff(cb) as usize;
                let weight = space_weight * color_weights[distance];
                sum[0] += r as f64 * weight;
                sum[1] += g as f64 * weight;
                sum[2] += b as f64 * weight;
                weight_sum += weight;
            }

            // The center pixel always contributes weight 1.
            out.put_pixel(
                x as u32,
                y as u32,
                Rgb([
                    clamp_u8(sum[0] / weight_sum),
                    clamp_u8(sum[1] / weight_sum),
                    clamp_u8(sum[2] / weight_sum),
                ]),
            );
        }
    }

    out
}
