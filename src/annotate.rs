//! Debug overlays: detected boxes, sampled swatches and the binary mask.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use log::info;

use crate::error::{Result, StripError};
use crate::region::ColorSample;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const SWATCH_SIZE: u32 = 10;

/// Copy of `image` with a red box around every sampled region and a small
/// swatch of its sampled color just above it (inside the box when the region
/// touches the top edge).
pub fn annotate_regions(image: &RgbImage, samples: &[ColorSample]) -> RgbImage {
    let mut canvas = image.clone();
    for sample in samples {
        let r = sample.region;
        if r.width == 0 || r.height == 0 {
            continue;
        }
        let outline = Rect::at(r.x as i32, r.y as i32).of_size(r.width, r.height);
        draw_hollow_rect_mut(&mut canvas, outline, BOX_COLOR);
        if r.width > 2 && r.height > 2 {
            let inner = Rect::at(r.x as i32 + 1, r.y as i32 + 1).of_size(r.width - 2, r.height - 2);
            draw_hollow_rect_mut(&mut canvas, inner, BOX_COLOR);
        }

        let side = SWATCH_SIZE.min(r.width).min(r.height);
        let swatch_y = if r.y >= side + 2 {
            r.y as i32 - side as i32 - 2
        } else {
            r.y as i32 + 2
        };
        let swatch = Rect::at(r.x as i32, swatch_y).of_size(side, side);
        draw_filled_rect_mut(&mut canvas, swatch, sample.rgb());
    }
    canvas
}

/// Writes `binary.png` (the threshold mask) and `overlay.png` into `dir`,
/// creating it if needed. Returns the two paths written.
pub fn write_debug_artifacts(
    dir: impl AsRef<Path>,
    mask: &GrayImage,
    annotated: &RgbImage,
) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mask_path = dir.join("binary.png");
    mask.save(&mask_path).map_err(|source| StripError::Save {
        path: mask_path.clone(),
        reason: "cannot write threshold mask".to_string(),
        source: Some(source),
    })?;
    info!("wrote {}", mask_path.display());

    let overlay_path = dir.join("overlay.png");
    annotated.save(&overlay_path).map_err(|source| StripError::Save {
        path: overlay_path.clone(),
        reason: "cannot write overlay".to_string(),
        source: Some(source),
    })?;
    info!("wrote {}", overlay_path.display());

    Ok((mask_path, overlay_path))
}
