/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;
use crate::math::spectrum::xyz_to_linear_srgb;

use exr::prelude::*;

/// Writes an XYZ bitmap as a linear sRGB OpenEXR image.
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> std::result::Result<(), exr::error::Error> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let rgb = image.map(xyz_to_linear_srgb);
    write_rgb_file(file_path, image.width(), image.height(), |x, y| {
        let p = rgb[(x, y)];
        (p.x as f32, p.y as f32, p.z as f32)
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

/// Reads the RGB channels of an OpenEXR image back into a bitmap.
pub fn read_exr_from_file(file_path: &str) -> std::result::Result<Bitmap, exr::error::Error> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    let image = read_first_rgba_layer_from_file(
        file_path,
        |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
        |bitmap: &mut Bitmap, position, (r, g, b, _a): (f32, f32, f32, f32)| {
            bitmap[(position.x(), position.y())] =
                crate::math::constants::Vector3f::new(r as f64, g as f64, b as f64);
        },
    )?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}
