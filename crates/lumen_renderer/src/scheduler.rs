//! Parallel strip rendering.
//!
//! Workers share no memory with the caller or each other. The scene, camera
//! and configuration are serialized once into a JSON payload; each worker
//! rebuilds a private copy, renders its strip and hands back owned rows. The
//! scheduler waits for every strip, then orders strips by row range, never by
//! completion order.

use crate::renderer::log_sample_plan;
use crate::{
    partition_rows, render_tile, Camera, ConfigError, Image, Raytracer, RenderConfig, Scene,
    Tile, TileResult,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize render job: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid tile partition: {0}")]
    InvalidPartition(String),

    #[error("worker for rows {start_y}..{end_y} failed: {message}")]
    Worker {
        start_y: u32,
        end_y: u32,
        message: String,
    },
}

/// Everything a worker needs, as plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
}

/// Borrowed view of a [`RenderJob`] with the same serialized form.
#[derive(Serialize)]
struct RenderJobRef<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    config: &'a RenderConfig,
}

impl RenderJob {
    pub fn new(scene: Scene, camera: Camera, config: RenderConfig) -> Self {
        Self {
            scene,
            camera,
            config,
        }
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, RenderError> {
        encode_job(&self.scene, &self.camera, &self.config)
    }

    /// Rebuild a job from a payload. NURBS surfaces are validated and
    /// re-tessellated on the way in.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

fn encode_job(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<Vec<u8>, RenderError> {
    serde_json::to_vec(&RenderJobRef {
        scene,
        camera,
        config,
    })
    .map_err(RenderError::Serialize)
}

/// Render on `config.thread_count()` workers, one strip each.
pub fn render_parallel(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<Image, RenderError> {
    config.validate()?;
    let tiles = partition_rows(config.width, config.height, config.thread_count(), config.seed);
    render_with_partition(scene, camera, config, &tiles)
}

/// Render with an explicit strip layout. The tiles must cover every row of
/// the image exactly once.
pub fn render_with_partition(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    tiles: &[Tile],
) -> Result<Image, RenderError> {
    config.validate()?;
    log_sample_plan(config);
    log::info!(
        "Rendering {}x{} in {} strips on {} threads, {} samples/pixel, seed {}",
        config.width,
        config.height,
        tiles.len(),
        config.thread_count(),
        config.samples_traced(),
        config.seed
    );

    let payload = encode_job(scene, camera, config)?;
    log::debug!("Render job payload is {} bytes", payload.len());
    render_payload(&payload, tiles, config.thread_count())
}

/// Render a serialized [`RenderJob`] over `tiles` on `threads` workers.
///
/// Any worker failure, including a payload that does not decode, aborts the
/// whole render.
pub fn render_payload(
    payload: &[u8],
    tiles: &[Tile],
    threads: usize,
) -> Result<Image, RenderError> {
    let (width, height) = check_partition(tiles)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("lumen-worker-{i}"))
        .build()?;

    let start = Instant::now();
    let mut results: Vec<TileResult> = pool.install(|| {
        tiles
            .par_iter()
            .map(|tile| run_worker(payload, tile))
            .collect::<Result<Vec<_>, _>>()
    })?;

    results.sort_by(|a, b| b.tile.start_y.cmp(&a.tile.start_y));
    let rows = results.into_iter().flat_map(|result| result.rows).collect();

    log::info!("Render complete in {:.2?}", start.elapsed());
    Ok(Image::from_rows(width, height, rows))
}

/// Image dimensions if `tiles` cover `[0, height)` exactly once with one
/// shared size and seed.
fn check_partition(tiles: &[Tile]) -> Result<(u32, u32), RenderError> {
    let first = tiles
        .first()
        .ok_or_else(|| RenderError::InvalidPartition("no tiles".to_string()))?;

    if let Some(odd) = tiles.iter().find(|t| {
        (t.width, t.height, t.seed) != (first.width, first.height, first.seed)
    }) {
        return Err(RenderError::InvalidPartition(format!(
            "tile {}..{} is for a {}x{} image with seed {}, expected {}x{} with seed {}",
            odd.start_y,
            odd.end_y,
            odd.width,
            odd.height,
            odd.seed,
            first.width,
            first.height,
            first.seed
        )));
    }

    let mut ordered: Vec<&Tile> = tiles.iter().collect();
    ordered.sort_by_key(|t| t.start_y);
    let mut next = 0;
    for tile in ordered {
        if tile.start_y != next || tile.is_empty() {
            return Err(RenderError::InvalidPartition(format!(
                "tile {}..{} does not continue from row {}",
                tile.start_y, tile.end_y, next
            )));
        }
        next = tile.end_y;
    }
    if next != first.height {
        return Err(RenderError::InvalidPartition(format!(
            "tiles end at row {next}, image has {} rows",
            first.height
        )));
    }

    Ok((first.width, first.height))
}

fn run_worker(payload: &[u8], tile: &Tile) -> Result<TileResult, RenderError> {
    let outcome = panic::catch_unwind(|| -> Result<TileResult, String> {
        let mut job =
            RenderJob::from_payload(payload).map_err(|e| format!("invalid render job: {e}"))?;
        if (job.config.width, job.config.height) != (tile.width, tile.height) {
            return Err(format!(
                "job is {}x{} but tile is for {}x{}",
                job.config.width, job.config.height, tile.width, tile.height
            ));
        }
        job.config.seed = tile.seed;

        let tracer = Raytracer::new(&job.scene, &job.camera, &job.config);
        let start = Instant::now();
        let result = render_tile(tile, &tracer);
        log::debug!(
            "Rows {}..{} done on {} in {:.2?}",
            tile.start_y,
            tile.end_y,
            std::thread::current().name().unwrap_or("worker"),
            start.elapsed()
        );
        Ok(result)
    });

    let message = match outcome {
        Ok(Ok(result)) => return Ok(result),
        Ok(Err(message)) => message,
        Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
    };
    log::error!("Worker for rows {}..{} failed: {}", tile.start_y, tile.end_y, message);
    Err(RenderError::Worker {
        start_y: tile.start_y,
        end_y: tile.end_y,
        message,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
