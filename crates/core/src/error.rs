//! Error types for the quickcrop-core library.
//!
//! Each variant maps to one user-facing outcome so the front-end can pick
//! the right notification (or stay silent) without inspecting messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur within the quickcrop-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// The file could not be decoded as an image.
    #[error("Not a valid image: {0}")]
    InvalidImage(String),

    /// Crop attempted without an image or with an empty selection.
    #[error("Selection area is empty or invalid")]
    NoSelection,

    /// Save attempted before any image was loaded.
    #[error("No image loaded")]
    NoImage,

    /// Resize percentage outside the supported range.
    #[error("Resize percentage must be between 10 and 100, got {0}")]
    InvalidPercent(u32),

    /// Writing the exported image failed.
    #[error("Failed to write {}: {reason}", .path.display())]
    WriteFailure { path: PathBuf, reason: String },

    /// Configuration-related errors (invalid environment values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid-image error with the given message.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Creates a write failure for `path`.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Whether the error is a missing precondition the UI should ignore
    /// silently rather than report.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoSelection | Self::NoImage)
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
