//! Decoding and encoding of strip photographs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use log::debug;

use crate::error::{Result, StripError};

/// Opens any format the `image` crate can decode and converts it to 8-bit RGB.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| StripError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    debug!("loaded {} ({}x{})", path.display(), rgb.width(), rgb.height());
    Ok(rgb)
}

/// Writes `image` to `path`.
///
/// `.jpg`, `.jpeg` or a missing extension produce a JPEG at `quality`
/// (clamped to 1..=100); any other extension is left to the `image` crate.
pub fn save_image(image: &RgbImage, path: impl AsRef<Path>, quality: u8) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(StripError::save(
            path,
            format!("refusing to write an empty {width}x{height} image"),
        ));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("jpg") | Some("jpeg") => write_jpeg(image, path, quality),
        Some(_) => image.save(path).map_err(|source| StripError::Save {
            path: path.to_path_buf(),
            reason: "encoding failed".to_string(),
            source: Some(source),
        }),
    }
}

fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| StripError::save(path, format!("cannot create file: {e}")))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
    image
        .write_with_encoder(encoder)
        .map_err(|source| StripError::Save {
            path: path.to_path_buf(),
            reason: format!("jpeg encoding at quality {quality} failed"),
            source: Some(source),
        })?;
    writer
        .flush()
        .map_err(|e| StripError::save(path, format!("cannot flush file: {e}")))?;
    debug!("wrote {} at quality {quality}", path.display());
    Ok(())
}
