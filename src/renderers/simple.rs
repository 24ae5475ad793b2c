// Copyright @yucwang 2021

use crate::core::integrator::shade_pixel;
use crate::core::scene::Scene;
use crate::core::sensor::Camera;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector3f;
use crate::renderers::options::{ConfigError, RenderOptions};

use rand::rngs::StdRng;
use rand::SeedableRng;

use std::ops::Range;
use std::sync::{mpsc, Mutex};
use std::thread;

/// Seed of the generator that renders image row `row`.
pub fn row_seed(seed: u64, row: usize) -> u64 {
    // splitmix64 finalizer
    let mut z = seed ^ (row as u64).wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Renders one row of XYZ pixels with its own deterministic generator.
pub fn render_row(row: usize, options: &RenderOptions, camera: &dyn Camera, scene: &Scene) -> Vec<Vector3f> {
    let mut rng = StdRng::seed_from_u64(row_seed(options.seed, row));
    (0..options.image_cols)
        .map(|col| shade_pixel(row, col, options, camera, scene, &mut rng))
        .collect()
}

/// Splits `rows` into `workers` contiguous chunks whose sizes differ by at
/// most one. Trailing chunks are empty when there are more workers than rows.
fn row_chunks(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let base = rows / workers;
    let extra = rows % workers;
    let mut start = 0;
    (0..workers)
        .map(|i| {
            let len = base + if i < extra { 1 } else { 0 };
            let chunk = start..start + len;
            start += len;
            chunk
        })
        .collect()
}

/// Renders the crushed `scene` into a CIE XYZ bitmap.
///
/// Rows are split statically between `options.worker_count` threads. Every
/// row draws from a generator seeded from `options.seed` and its index, so
/// the image does not depend on the number of workers. `progress` is called
/// on the calling thread with `(completed, total)` path samples.
pub fn render_scene(options: &RenderOptions,
                    camera: &dyn Camera,
                    scene: &Scene,
                    progress: &(dyn Fn(usize, usize) + Sync)) -> Result<Bitmap, ConfigError> {
    options.validate()?;
    if !scene.is_crushed() {
        log::warn!("Rendering a scene that was never crushed; every ray will miss.");
    }

    let rows = options.image_rows;
    let cols = options.image_cols;
    let total = options.total_samples();
    let samples_per_row = cols * options.wavelength_bins();
    let chunks = row_chunks(rows, options.worker_count.min(rows));

    log::info!("Rendering {}x{} pixels, {} wavelength bins, depth {}, {} workers.",
               cols, rows, options.wavelength_bins(), options.max_bounce_depth, chunks.len());

    let completed = Mutex::new(0usize);
    let mut bitmap = Bitmap::new(cols, rows);
    let (tx, rx) = mpsc::channel::<(usize, Vec<Vector3f>)>();

    thread::scope(|scope| {
        for chunk in chunks.iter().cloned() {
            let tx = tx.clone();
            scope.spawn(move || {
                for row in chunk {
                    let pixels = render_row(row, options, camera, scene);
                    if tx.send((row, pixels)).is_err() {
                        break;
                    }
                }
            });
        }

        drop(tx);
        for (row, pixels) in rx.iter() {
            bitmap.set_row(row, &pixels);
            let done = match completed.lock() {
                Ok(mut count) => {
                    *count += samples_per_row;
                    *count
                }
                Err(poisoned) => {
                    let mut count = poisoned.into_inner();
                    *count += samples_per_row;
                    *count
                }
            };
            progress(done, total);
        }
    });

    log::info!("Render finished.");
    Ok(bitmap)
}
