use image::{GrayImage, Luma};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Normalized 1-D Gaussian taps for an odd window of `size` pixels.
///
/// Sigma follows the conventional default for a given window,
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: usize) -> Vec<f64> {
    let size = odd_window(size);
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as f64;
    let taps: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

fn odd_window(size: usize) -> usize {
    let size = size.max(3);
    if size % 2 == 0 { size + 1 } else { size }
}

/// Separable Gaussian blur with replicated borders, rounded back to 8 bits.
pub fn gaussian_local_mean(gray: &GrayImage, block_size: usize) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let kernel = gaussian_kernel(block_size);
    let half = (kernel.len() / 2) as i64;
    let src = gray.as_raw();

    let mut horizontal = vec![0f64; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &tap) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - half).clamp(0, w as i64 - 1) as usize;
                acc += tap * src[y * w + sx] as f64;
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &tap) in kernel.iter().enumerate() {
                let sy = (y as i64 + k as i64 - half).clamp(0, h as i64 - 1) as usize;
                acc += tap * horizontal[sy * w + x];
            }
            out.put_pixel(x as u32, y as u32, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Inverted adaptive threshold: a pixel is [`FOREGROUND`] when it is at least
/// `offset` levels darker than the Gaussian-weighted mean of its
/// `block_size` x `block_size` neighbourhood.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: usize, offset: i32) -> GrayImage {
    let mean = gaussian_local_mean(gray, block_size);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for ((dst, src), m) in out.pixels_mut().zip(gray.pixels()).zip(mean.pixels()) {
        let is_dark = src[0] as i32 - m[0] as i32 <= -offset;
        dst[0] = if is_dark { FOREGROUND } else { BACKGROUND };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(11);
        assert_eq!(k.len(), 11);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((k[0] - k[10]).abs() < 1e-15);
        assert!(k[5] > k[4]);
    }

    #[test]
    fn even_window_is_widened() {
        assert_eq!(gaussian_kernel(4).len(), 5);
        assert_eq!(gaussian_kernel(0).len(), 3);
    }

    #[test]
    fn flat_image_has_no_foreground() {
        let gray = GrayImage::from_pixel(30, 20, Luma([128]));
        let bin = adaptive_threshold_inv(&gray, 11, 2);
        assert!(bin.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn dark_blob_edges_become_foreground() {
        let mut gray = GrayImage::from_pixel(40, 40, Luma([220]));
        for y in 15..25 {
            for x in 15..25 {
                gray.put_pixel(x, y, Luma([40]));
            }
        }
        let bin = adaptive_threshold_inv(&gray, 11, 2);
        assert_eq!(bin.get_pixel(15, 15)[0], FOREGROUND);
        assert_eq!(bin.get_pixel(20, 15)[0], FOREGROUND);
        // light side of the edge stays background
        assert_eq!(bin.get_pixel(14, 20)[0], BACKGROUND);
        assert_eq!(bin.get_pixel(2, 2)[0], BACKGROUND);
    }
}
