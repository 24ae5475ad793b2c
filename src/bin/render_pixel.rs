use prismatic::core::scene_loader::load_scene;
use prismatic::math::spectrum::xyz_to_linear_srgb;
use prismatic::renderers::simple::render_row;
use std::env;

// Renders the row holding the pixel, so the value printed is the one the
// full render writes for the same seed.
fn main() {
    env::set_var("RUST_LOG", env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()));
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml> <row> <col> [--grid N] [--max-depth N] [--seed N]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let row: usize = args[2].parse().unwrap_or(0);
    let col: usize = args[3].parse().unwrap_or(0);

    let mut loaded = match load_scene(scene_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    };

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--grid" => {
                i += 1;
                loaded.options.supersample_grid_size = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(loaded.options.supersample_grid_size);
            }
            "--max-depth" => {
                i += 1;
                loaded.options.max_bounce_depth = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(loaded.options.max_bounce_depth);
            }
            "--seed" => {
                i += 1;
                loaded.options.seed = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(loaded.options.seed);
            }
            _ => {}
        }
        i += 1;
    }

    if let Err(e) = loaded.options.validate() {
        eprintln!("Invalid options: {}", e);
        std::process::exit(1);
    }
    if row >= loaded.options.image_rows || col >= loaded.options.image_cols {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}",
                  row, col, loaded.options.image_rows, loaded.options.image_cols);
        std::process::exit(2);
    }

    loaded.scene.crush(0.0);
    let pixels = render_row(row, &loaded.options, &loaded.camera, &loaded.scene);
    let xyz = pixels[col];
    let rgb = xyz_to_linear_srgb(&xyz);
    println!("pixel (row {}, col {})", row, col);
    println!("XYZ: {:.6} {:.6} {:.6}", xyz.x, xyz.y, xyz.z);
    println!("linear sRGB: {:.6} {:.6} {:.6}", rgb.x, rgb.y, rgb.z);
}
