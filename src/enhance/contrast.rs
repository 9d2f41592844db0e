//! Contrast-limited adaptive histogram equalization (CLAHE) on the L* channel.

use image::{Rgb, RgbImage};
use palette::{FromColor, Lab, Srgb};

use super::{clamp_u8, reflect101};
use crate::config::ContrastConfig;

const HIST_SIZE: usize = 256;

/// Equalizes lightness tile by tile while leaving the a*/b* chroma untouched.
///
/// L* is quantized to 8 bits (`L * 255 / 100`) before equalization, matching
/// the usual 8-bit Lab encoding.
pub fn clahe_luminance(image: &RgbImage, config: &ContrastConfig) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let labs: Vec<Lab> = image
        .pixels()
        .map(|p| {
            let rgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            Lab::from_color(rgb)
        })
        .collect();

    let lightness: Vec<u8> = labs
        .iter()
        .map(|lab| clamp_u8(lab.l as f64 * 255.0 / 100.0))
        .collect();

    let equalized = clahe(
        &lightness,
        width as usize,
        height as usize,
        config.clip_limit,
        config.tiles_x as usize,
        config.tiles_y as usize,
    );

    let mut out = RgbImage::new(width, height);
    for ((pixel, lab), &l) in out.pixels_mut().zip(labs).zip(&equalized) {
        let adjusted = Lab::new(l as f32 * 100.0 / 255.0, lab.a, lab.b);
        let rgb = Srgb::from_color(adjusted);
        *pixel = Rgb([
            clamp_u8(rgb.red as f64 * 255.0),
            clamp_u8(rgb.green as f64 * 255.0),
            clamp_u8(rgb.blue as f64 * 255.0),
        ]);
    }
    out
}

/// CLAHE over a `tiles_x` x `tiles_y` grid of a single-channel 8-bit image.
///
/// Tiles are `ceil(width / tiles_x)` by `ceil(height / tiles_y)` pixels; when the
/// image does not divide evenly the missing right/bottom margin is read through
/// reflect-101 indexing. Each tile histogram is clipped at
/// `max(floor(clip_limit * tile_area / 256), 1)` and the excess is spread over
/// all bins. Output pixels blend the mappings of the four nearest tiles
/// bilinearly. A non-positive `clip_limit` disables clipping.
pub fn clahe(
    luma: &[u8],
    width: usize,
    height: usize,
    clip_limit: f64,
    tiles_x: usize,
    tiles_y: usize,
) -> Vec<u8> {
    if width == 0 || height == 0 {
        return luma.to_vec();
    }
    let tiles_x = tiles_x.max(1);
    let tiles_y = tiles_y.max(1);
    let tile_w = width.div_ceil(tiles_x);
    let tile_h = height.div_ceil(tiles_y);
    let tile_area = tile_w * tile_h;

    let limit = if clip_limit > 0.0 {
        Some(((clip_limit * tile_area as f64 / HIST_SIZE as f64) as usize).max(1))
    } else {
        None
    };
    let lut_scale = 255.0 / tile_area as f64;

    let mut luts = vec![[0u8; HIST_SIZE]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; HIST_SIZE];
            for py in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect101(py as i64, height);
                for px in tx * tile_w..(tx + 1) * tile_w {
                    let sx = reflect101(px as i64, width);
                    hist[luma[sy * width + sx] as usize] += 1;
                }
            }

            if let Some(limit) = limit {
                clip_histogram(&mut hist, limit);
            }

            let lut = &mut luts[ty * tiles_x + tx];
            let mut cdf = 0usize;
            for (value, &count) in hist.iter().enumerate() {
                cdf += count;
                lut[value] = clamp_u8(cdf as f64 * lut_scale);
            }
        }
    }

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        let (ty1, ty2, ya) = neighbour_tiles(y, tile_h, tiles_y);
        for x in 0..width {
            let (tx1, tx2, xa) = neighbour_tiles(x, tile_w, tiles_x);
            let v = luma[y * width + x] as usize;

            let top = luts[ty1 * tiles_x + tx1][v] as f64 * (1.0 - xa)
                + luts[ty1 * tiles_x + tx2][v] as f64 * xa;
            let bottom = luts[ty2 * tiles_x + tx1][v] as f64 * (1.0 - xa)
                + luts[ty2 * tiles_x + tx2][v] as f64 * xa;
            out[y * width + x] = clamp_u8(top * (1.0 - ya) + bottom * ya);
        }
    }
    out
}

/// Clips every bin at `limit` and hands the excess back evenly; the remainder
/// goes one count at a time to bins spaced `HIST_SIZE / remainder` apart from bin 0.
fn clip_histogram(hist: &mut [usize; HIST_SIZE], limit: usize) {
    let mut clipped = 0usize;
    for bin in hist.iter_mut() {
        if *bin > limit {
            clipped += *bin - limit;
            *bin = limit;
        }
    }

    let batch = clipped / HIST_SIZE;
    let mut residual = clipped - batch * HIST_SIZE;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }
}

/// Tiles whose centers bracket `pos`, and the blend weight of the second one.
fn neighbour_tiles(pos: usize, tile_len: usize, tiles: usize) -> (usize, usize, f64) {
    let f = pos as f64 / tile_len as f64 - 0.5;
    let first = f.floor();
    let weight = f - first;
    let first = first as i64;
    let lo = first.max(0) as usize;
    let hi = ((first + 1) as usize).min(tiles - 1);
    (lo.min(tiles - 1), hi, weight)
}
