use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use umbra_core::{save_image, SceneDescription, SceneFile};
use umbra_renderer::{build_world, render, Camera, CancelToken, Vec3};

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Preset {
    /// Ground plus a grid of small random spheres and three large ones
    #[default]
    Random,
    /// Diffuse, metal and hollow glass spheres on a ground sphere
    ThreeSpheres,
}

#[derive(Parser, Debug)]
#[command(name = "umbra", about = "Render a sphere scene with a CPU ray tracer")]
struct Args {
    /// JSON scene file. Without one, the `--preset` scene is rendered.
    scene: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    /// Built-in scene used when no scene file is given
    preset: Preset,

    #[arg(short, long, default_value = "output.ppm")]
    /// Output image; the extension picks the format (ppm, png, jpg)
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    /// Samples per pixel
    spp: Option<u32>,

    #[arg(long)]
    /// Maximum number of bounces per path
    max_depth: Option<u32>,

    #[arg(long)]
    /// Seed for the per-pixel random streams (and the random preset).
    /// Given a seed, the output is deterministic.
    seed: Option<u64>,

    #[arg(long)]
    /// Write the resolved scene file as JSON and exit without rendering
    dump_scene: Option<PathBuf>,
}

fn load_scene(args: &Args) -> Result<SceneFile> {
    let mut file = match &args.scene {
        Some(path) => SceneFile::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => preset_scene(args.preset, args.seed.unwrap_or_default()),
    };

    if let Some(width) = args.width {
        file.render.width = width;
    }
    if let Some(height) = args.height {
        file.render.height = height;
    }
    if let Some(spp) = args.spp {
        file.render.samples_per_pixel = spp;
    }
    if let Some(max_depth) = args.max_depth {
        file.render.max_depth = max_depth;
    }
    if let Some(seed) = args.seed {
        file.render.seed = seed;
    }
    file.render.validate()?;

    Ok(file)
}

fn preset_scene(preset: Preset, seed: u64) -> SceneFile {
    match preset {
        Preset::Random => SceneFile {
            scene: SceneDescription::random(seed),
            ..Default::default()
        },
        Preset::ThreeSpheres => {
            let mut file = SceneFile {
                scene: SceneDescription::three_spheres(),
                ..Default::default()
            };
            file.render = file.render.with_resolution(400, 200).with_quality(100, 50);
            let look_from = Vec3::new(-2.0, 2.0, 1.0);
            let look_at = Vec3::new(0.0, 0.0, -1.0);
            file.camera = file
                .camera
                .with_position(look_from, look_at, Vec3::Y)
                .with_lens(30.0, 0.0, (look_from - look_at).length());
            file
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let file = load_scene(&args)?;

    if let Some(path) = &args.dump_scene {
        std::fs::write(path, file.to_json_string()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
        return Ok(());
    }

    let start = Instant::now();
    let world = build_world(&file.scene)?;
    let camera = Camera::new(&file.camera, file.render.aspect_ratio())?;
    log::info!("Scene built in {:?}", start.elapsed());

    let start = Instant::now();
    let image = render(&camera, &world, &file.render, &CancelToken::new())?;
    log::info!("Rendered in {:?}", start.elapsed());

    save_image(&args.output, image.width, image.height, &image.to_rgb8())
        .with_context(|| format!("failed to save {}", args.output.display()))?;

    Ok(())
}
