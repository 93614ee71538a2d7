//! User interface for quickcrop.
//!
//! An `eframe` window hosting one [`CropSurface`](crate::surface::CropSurface):
//! drop an image in, drag a selection, then crop or save from the context
//! menu.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: Modal state, menu commands and notifications
//! - [`input`]: Translation of egui input into surface events
//! - [`rendering`]: Drawing the preview, drop zone and selection
//! - [`dialogs`]: Native save dialog and message boxes
//! - [`cropper`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use quickcrop_core::{ui, Config};
//!
//! let config = Config::load()?;
//! ui::run_cropper_ui(config, Some("photo.jpg".into()))?;
//! ```

mod cropper;
mod dialogs;
mod input;
mod rendering;
mod state;

// Public API exports
pub use cropper::{CropperApp, APP_TITLE};
pub use input::to_surface_point;
pub use state::{MenuCommand, Notice, NoticeLevel, UiState};

use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;

/// Opens the cropper window and returns when the user closes it.
///
/// # Arguments
/// * `config` - Application configuration
/// * `initial` - Image to load on startup; a decode failure is reported in
///   the window rather than returned
///
/// # Errors
/// Returns an error if the window or event loop cannot be created.
pub fn run_cropper_ui(config: Config, initial: Option<PathBuf>) -> Result<()> {
    cropper::run(config, initial)
}
