//! `ember` - render a scene to an image file.

mod cli;
mod logger;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use ember_scene::{Preset, Scene};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    if args.list_scenes {
        for preset in Preset::ALL {
            println!("{}", preset);
        }
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let start = std::time::Instant::now();
    let scene = load_scene(&args.scene)?;
    log::info!(
        "Scene '{}' ready in {:?} ({} objects)",
        args.scene,
        start.elapsed(),
        scene.world.len()
    );

    let config = args
        .render_config(&scene)
        .context("Invalid render settings")?;
    let camera = scene.build_camera();
    let image = ember_renderer::render(&camera, &scene.world, &config);

    output::write_image(&image, &args.output)?;
    log::info!("Saved to {}", args.output.display());

    Ok(())
}

/// Preset name first, then a scene file path.
fn load_scene(name_or_path: &str) -> Result<Scene> {
    if let Ok(preset) = name_or_path.parse::<Preset>() {
        return Ok(preset.build());
    }
    ember_scene::load_scene(name_or_path)
        .with_context(|| format!("Failed to load scene '{}'", name_or_path))
}
