use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

mod cli;
mod scene_file;

use cli::Args;
use scene_file::SceneDocument;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let document = SceneDocument::load(&args.scene)?;
    let mut config = document.render.clone();
    args.apply(&mut config);
    config.validate().context("Invalid render settings")?;

    let camera = document.camera_for(&config);

    let start = Instant::now();
    let image = lumen_renderer::render_parallel(&document.scene, &camera, &config)
        .context("Render failed")?;
    log::info!("Finished in {:.2?}", start.elapsed());

    lumen_renderer::save_ppm(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
