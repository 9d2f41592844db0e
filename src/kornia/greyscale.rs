use image::{GrayImage, RgbImage};
use kornia::{
    image::{Image, ImageSize, allocator::CpuAllocator},
    imgproc,
};

use crate::error::{Result, StripError};

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// Converts an RGB image to 8-bit luminance using kornia's weighted sum.
pub fn luma(image: &RgbImage) -> Result<GrayImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(StripError::InvalidInput(format!(
            "cannot convert an empty {width}x{height} image to grey"
        )));
    }

    let rgb = CpuImage::<u8, 3>::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        image.as_raw().clone(),
        CpuAllocator,
    )?;
    let mut gray = CpuImage::<u8, 1>::from_size_val(rgb.size(), 0u8, CpuAllocator)?;
    imgproc::color::gray_from_rgb_u8(&rgb, &mut gray)?;

    GrayImage::from_raw(width, height, gray.as_slice().to_vec()).ok_or_else(|| {
        StripError::InvalidInput(format!("grey buffer does not match {width}x{height}"))
    })
}
