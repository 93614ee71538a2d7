//! QuickCrop Core Library
//!
//! This library provides the core functionality for the QuickCrop image
//! cropper: loading an image onto a display surface, selecting a region over
//! its fitted preview, cropping the original to that region, and exporting a
//! resized copy.
//!
//! # Overview
//!
//! - **Surface**: Toolkit-independent state machine via [`surface`]
//! - **Geometry**: Fit, centering and rectangle math via [`geometry`]
//! - **Image Processing**: Decode, selection mapping, crop, resize, encode via [`image_processing`]
//! - **Export**: Suggested file names and percentage choices via [`export`]
//! - **User Interface**: `eframe` window via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use quickcrop_core::QuickCrop;
//!
//! let app = QuickCrop::new()?;
//! app.run_interactive(None)?;
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`export`]: Save-time defaults
//! - [`geometry`]: Integer points, sizes and rectangles
//! - [`image_processing`]: Image manipulation utilities
//! - [`surface`]: The display-and-crop surface
//! - [`ui`]: User interface components

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod image_processing;
pub mod surface;
pub mod ui;

// Re-export primary types for convenience
pub use config::Config;
pub use error::{AppError, Result};
pub use geometry::{Point, Rect, Size};
pub use image_processing::ImageProcessor;
pub use surface::{CropSurface, SaveReport, SurfaceEvent, SurfaceResponse};

use std::path::PathBuf;

/// A crop-and-export run without a window.
///
/// The selection corners are in surface coordinates, exactly as a pointer
/// drag over a surface of `surface` size would report them.
#[derive(Debug, Clone, PartialEq)]
pub struct CropJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Display area the image is fit into before selecting.
    pub surface: Size,
    /// Drag start and end; `None` exports the whole image.
    pub selection: Option<(Point, Point)>,
    pub percent: u32,
}

/// Main entry point for the QuickCrop application.
///
/// This struct provides a facade over configuration, the interactive window
/// and the headless pipeline.
pub struct QuickCrop {
    config: Config,
}

impl QuickCrop {
    /// Creates a new instance with configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if an environment value is invalid.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self { config })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Opens the interactive window, optionally preloading `initial`.
    ///
    /// # Errors
    ///
    /// Returns an error if the UI cannot be started.
    pub fn run_interactive(&self, initial: Option<PathBuf>) -> Result<()> {
        ui::run_cropper_ui(self.config.clone(), initial)
    }

    /// Runs `job` on a fresh surface: load, select, crop, save.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidImage`] if the input cannot be decoded,
    /// [`AppError::NoSelection`] if the selection misses the preview, and
    /// the errors of [`CropSurface::save_image`].
    pub fn run_job(&self, job: &CropJob) -> Result<SaveReport> {
        let mut surface = CropSurface::new(job.surface);
        surface.load(&job.input)?;

        if let Some((start, end)) = job.selection {
            surface.begin_selection(start);
            surface.update_selection(end);
            surface.end_selection(end);
            surface.crop_to_selection()?;
        }

        surface.save_image(job.percent, &job.output)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup. This loads `.env` files if
/// present.
pub fn init() {
    let _ = dotenvy::dotenv();
}
