//! Fixed 3x3 sharpening.

use image::{Rgb, RgbImage};

use super::reflect101;

/// Row-major sharpening mask: center 5, orthogonal neighbours -1, diagonals 0.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Convolves every channel with [`SHARPEN_KERNEL`] and saturates the result.
///
/// Out-of-image taps are read through reflect-101 indexing.
pub fn sharpen(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = image.as_raw();
    let mut out = RgbImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0i32; 3];
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, &k) in row.iter().enumerate() {
                    if k == 0 {
                        continue;
                    }
                    let sx = reflect101(x as i64 + kx as i64 - 1, w);
                    let sy = reflect101(y as i64 + ky as i64 - 1, h);
                    let idx = (sy * w + sx) * 3;
                    for c in 0..3 {
                        acc[c] += k * src[idx + c] as i32;
                    }
                }
            }
            out.put_pixel(x as u32, y as u32, Rgb(acc.map(|v| v.clamp(0, 255) as u8)));
        }
    }
    out
}
