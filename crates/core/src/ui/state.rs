//! UI state types and notification messages.

use crate::error::AppError;
use crate::surface::SaveReport;

/// Modal state layered over the surface.
///
/// `Idle` -> `ResizePrompt` (on "Save Image") -> `Idle` (on OK or Cancel).
#[derive(Clone, Debug, PartialEq)]
pub enum UiState {
    /// The surface receives input.
    Idle,
    /// Asking for the export percentage.
    ResizePrompt {
        /// Currently chosen percentage.
        percent: u32,
    },
}

/// Entries of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Crop,
    SaveImage,
}

/// Severity of a modal notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A modal message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    /// The notification for a failed action, or `None` when the failure is a
    /// missing precondition the UI ignores.
    pub fn from_error(err: &AppError) -> Option<Self> {
        if err.is_precondition() {
            return None;
        }
        let notice = match err {
            AppError::InvalidImage(_) => Self {
                level: NoticeLevel::Warning,
                title: "Error",
                message: "This is not a valid image.".to_string(),
            },
            AppError::WriteFailure { .. } | AppError::InvalidPercent(_) => Self {
                level: NoticeLevel::Error,
                title: "Error",
                message: format!("Failed to save image.\n\n{}", err),
            },
            other => Self {
                level: NoticeLevel::Error,
                title: "Error",
                message: other.to_string(),
            },
        };
        Some(notice)
    }

    /// The notification for a completed save.
    pub fn saved(report: &SaveReport) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: "Success",
            message: format!(
                "Image saved successfully.\n\n{} ({}x{})",
                report.path.display(),
                report.width,
                report.height
            ),
        }
    }
}
