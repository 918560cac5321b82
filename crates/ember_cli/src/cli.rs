use clap::{Parser, ValueEnum};
use ember_renderer::{CosineWeighting, RenderConfig, DEFAULT_BUCKET_SIZE};
use ember_scene::{Scene, SceneResult};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Built-in scene name (see --list-scenes) or path to a JSON scene file
    #[arg(long, default_value = "cornell_box")]
    pub scene: String,

    /// Image width in pixels; height follows the camera aspect ratio
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Number of samples per pixel
    #[arg(short = 's', long)]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(short = 'd', long)]
    pub max_depth: Option<u32>,

    /// Base random seed; equal seeds give identical images
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Bucket (tile) edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Output file (.ppm for ASCII PPM, otherwise any format the image crate knows)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Weight scattered light by |cos| of the bounce angle (legacy look)
    #[arg(long)]
    pub cosine_weighting: bool,

    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Print the built-in scene names and exit
    #[arg(long)]
    pub list_scenes: bool,
}

impl Args {
    /// Merge command line overrides with the scene's suggested settings.
    pub fn render_config(&self, scene: &Scene) -> SceneResult<RenderConfig> {
        let (image_width, image_height) =
            scene.image_size(self.width.unwrap_or(scene.settings.image_width).max(1))?;

        Ok(RenderConfig {
            image_width,
            image_height,
            samples_per_pixel: self
                .samples
                .unwrap_or(scene.settings.samples_per_pixel)
                .max(1),
            max_depth: self.max_depth.unwrap_or(scene.settings.max_depth),
            background: scene.background,
            cosine_weighting: if self.cosine_weighting {
                CosineWeighting::Legacy
            } else {
                CosineWeighting::Off
            },
            seed: self.seed,
            bucket_size: self.bucket_size.max(1),
        })
    }
}
