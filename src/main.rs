// Copyright 2020 TwoCookingMice

use prismatic::core::scene_loader::load_scene;
use prismatic::io::exr_utils::write_exr_to_file;
use prismatic::io::image_utils::write_preview_to_file;
use prismatic::renderers::simple::render_scene;

use indicatif::{ProgressBar, ProgressStyle};

use std::env;

fn parse_flag<T: std::str::FromStr>(args: &[String], i: usize, current: T) -> T {
    args.get(i).and_then(|v| v.parse::<T>().ok()).unwrap_or(current)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <scene.xml> <output.exr> [--png path] [--rows N] [--cols N] [--grid N] \
                   [--max-depth N] [--seed N] [--threads N]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let mut loaded = match load_scene(input_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    };

    let mut png_path: Option<String> = None;
    let options = &mut loaded.options;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--png" => {
                i += 1;
                png_path = args.get(i).cloned();
            }
            "--rows" => {
                i += 1;
                options.image_rows = parse_flag(&args, i, options.image_rows);
            }
            "--cols" => {
                i += 1;
                options.image_cols = parse_flag(&args, i, options.image_cols);
            }
            "--grid" => {
                i += 1;
                options.supersample_grid_size = parse_flag(&args, i, options.supersample_grid_size);
            }
            "--max-depth" => {
                i += 1;
                options.max_bounce_depth = parse_flag(&args, i, options.max_bounce_depth);
            }
            "--seed" => {
                i += 1;
                options.seed = parse_flag(&args, i, options.seed);
            }
            "--threads" => {
                i += 1;
                options.worker_count = parse_flag(&args, i, options.worker_count);
            }
            other => log::warn!("Ignoring unknown argument {}.", other),
        }
        i += 1;
    }

    loaded.scene.crush(0.0);

    let progress = ProgressBar::new(loaded.options.total_samples() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} samples ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let report = |done: usize, _total: usize| progress.set_position(done as u64);

    let image = match render_scene(&loaded.options, &loaded.camera, &loaded.scene, &report) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Invalid render options: {}", e);
            std::process::exit(1);
        }
    };
    progress.finish_and_clear();

    if let Err(e) = write_exr_to_file(&image, output_path) {
        eprintln!("Failed to write {}: {}", output_path, e);
        std::process::exit(1);
    }
    if let Some(path) = png_path {
        if let Err(e) = write_preview_to_file(&image, &path) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
    }
}
