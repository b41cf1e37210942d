use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{AntialiasQuality, RenderConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Quality {
    None,
    Low,
    Medium,
    High,
    Ultra,
}

impl From<Quality> for AntialiasQuality {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::None => AntialiasQuality::None,
            Quality::Low => AntialiasQuality::Low,
            Quality::Medium => AntialiasQuality::Medium,
            Quality::High => AntialiasQuality::High,
            Quality::Ultra => AntialiasQuality::Ultra,
        }
    }
}

/// Command line arguments. Render flags left unset keep the scene
/// document's values.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Deterministic multi-threaded ray tracer")]
pub struct Args {
    /// Scene document (JSON)
    pub scene: PathBuf,

    /// Output PPM path
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Antialiasing preset (forces stratified sampling)
    #[arg(long = "aa", value_enum)]
    pub antialiasing: Option<Quality>,

    /// Maximum recursion depth for reflections
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Gamma exponent divisor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Jitter samples inside a regular grid of strata
    #[arg(long)]
    pub stratified: bool,

    /// Worker threads (defaults to the number of cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Base RNG seed
    #[arg(long)]
    pub seed: Option<u32>,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(quality) = self.antialiasing {
            config.antialiasing = Some(quality.into());
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if self.stratified {
            config.stratified = true;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}
