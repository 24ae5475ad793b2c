// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::{srgb_gamma_encode, xyz_to_linear_srgb};

use image::{ImageResult, Rgb, RgbImage};

fn to_byte(linear: Float) -> u8 {
    let encoded = srgb_gamma_encode(linear.max(0.0).min(1.0));
    (encoded * 255.0 + 0.5).floor().max(0.0).min(255.0) as u8
}

/// Gamma encoded 8-bit sRGB preview of an XYZ bitmap. Out of gamut values
/// are clipped.
pub fn xyz_to_srgb8(image: &Bitmap) -> RgbImage {
    RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        let rgb = xyz_to_linear_srgb(&image[(x as usize, y as usize)]);
        Rgb([to_byte(rgb.x), to_byte(rgb.y), to_byte(rgb.z)])
    })
}

/// Writes a preview image; the format follows the file extension.
pub fn write_preview_to_file(image: &Bitmap, file_path: &str) -> ImageResult<()> {
    log::info!("Writing preview image: {}.", file_path);
    xyz_to_srgb8(image).save(file_path)
}
