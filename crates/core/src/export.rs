//! Save-time defaults: suggested file names and the percentage step.

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Step between the percentages offered in the resize prompt.
pub const PERCENT_STEP: u32 = 10;

/// Suggested file name for an export made at `now`.
///
/// Shaped as `Image_<year>-<month>-<day>_<hour>-<minute>-<second>.png`.
pub fn default_file_name(now: NaiveDateTime) -> String {
    now.format("Image_%Y-%m-%d_%H-%M-%S.png").to_string()
}

/// Suggested destination inside `dir` for an export made at `now`.
pub fn default_save_path(dir: &Path, now: NaiveDateTime) -> PathBuf {
    dir.join(default_file_name(now))
}

/// Suggested destination inside `dir` using the current local time.
pub fn suggested_save_path(dir: &Path) -> PathBuf {
    default_save_path(dir, Local::now().naive_local())
}
