//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is honored) and can be
//! overridden through [`ConfigBuilder`]. Nothing is persisted.

use crate::error::{AppError, Result};
use crate::geometry::Size;
use crate::image_processing::ImageProcessor;
use directories::UserDirs;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the default save directory.
pub const ENV_SAVE_DIR: &str = "QUICKCROP_SAVE_DIR";
/// Environment variable holding the default resize percentage.
pub const ENV_DEFAULT_PERCENT: &str = "QUICKCROP_DEFAULT_PERCENT";
/// Environment variable holding the initial surface size as `WxH`.
pub const ENV_WINDOW_SIZE: &str = "QUICKCROP_WINDOW_SIZE";

const DEFAULT_PERCENT: u32 = 100;
const DEFAULT_WINDOW_SIZE: Size = Size::new(800, 600);

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory the save dialog opens in.
    pub save_dir: PathBuf,
    /// Percentage preselected in the resize prompt.
    pub default_percent: u32,
    /// Initial size of the display surface.
    pub window_size: Size,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(dir) = lookup(ENV_SAVE_DIR).filter(|v| !v.trim().is_empty()) {
            builder = builder.with_save_dir(dir.trim());
        }

        if let Some(raw) = lookup(ENV_DEFAULT_PERCENT) {
            let percent = raw.trim().parse::<u32>().map_err(|_| {
                AppError::config(format!("{} must be an integer, got '{}'", ENV_DEFAULT_PERCENT, raw))
            })?;
            builder = builder.with_default_percent(percent);
        }

        if let Some(raw) = lookup(ENV_WINDOW_SIZE) {
            builder = builder.with_window_size(parse_size(&raw)?);
        }

        builder.build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            default_percent: DEFAULT_PERCENT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Fluent builder for [`Config`], validated on [`build`](Self::build).
#[derive(Default)]
pub struct ConfigBuilder {
    save_dir: Option<PathBuf>,
    default_percent: Option<u32>,
    window_size: Option<Size>,
}

impl ConfigBuilder {
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn with_default_percent(mut self, percent: u32) -> Self {
        self.default_percent = Some(percent);
        self
    }

    pub fn with_window_size(mut self, size: Size) -> Self {
        self.window_size = Some(size);
        self
    }

    pub fn build(self) -> Result<Config> {
        let default_percent = self.default_percent.unwrap_or(DEFAULT_PERCENT);
        ImageProcessor::validate_percent(default_percent)
            .map_err(|e| AppError::config(e.to_string()))?;

        let window_size = self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE);
        if window_size.is_empty() {
            return Err(AppError::config("Window size must be non-zero"));
        }

        Ok(Config {
            save_dir: self.save_dir.unwrap_or_else(default_save_dir),
            default_percent,
            window_size,
        })
    }
}

/// Desktop directory, falling back to home, then the working directory.
pub fn default_save_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| {
            dirs.desktop_dir()
                .map(|d| d.to_path_buf())
                .or_else(|| Some(dirs.home_dir().to_path_buf()))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parses `WxH` (also accepts `W,H` and an uppercase `X`).
pub fn parse_size(raw: &str) -> Result<Size> {
    let invalid = || AppError::config(format!("Expected a size like 800x600, got '{}'", raw));

    let (w, h) = raw
        .trim()
        .split_once(['x', 'X', ','])
        .ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;

    Ok(Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.default_percent, 100);
        assert_eq!(config.window_size, Size::new(800, 600));
        assert_eq!(config.save_dir, default_save_dir());
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_SAVE_DIR, "/tmp/exports"),
            (ENV_DEFAULT_PERCENT, " 50 "),
            (ENV_WINDOW_SIZE, "1024x768"),
        ]))
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.default_percent, 50);
        assert_eq!(config.window_size, Size::new(1024, 768));
    }

    #[test]
    fn blank_save_dir_falls_back() {
        let config = Config::from_lookup(lookup_from(&[(ENV_SAVE_DIR, "  ")])).unwrap();
        assert_eq!(config.save_dir, default_save_dir());
    }

    #[test]
    fn out_of_range_percent_is_config_error() {
        let result = Config::from_lookup(lookup_from(&[(ENV_DEFAULT_PERCENT, "150")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn non_numeric_percent_is_config_error() {
        let result = Config::from_lookup(lookup_from(&[(ENV_DEFAULT_PERCENT, "half")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn parse_size_accepts_common_separators() {
        assert_eq!(parse_size("640x480").unwrap(), Size::new(640, 480));
        assert_eq!(parse_size("640X480").unwrap(), Size::new(640, 480));
        assert_eq!(parse_size(" 640 , 480 ").unwrap(), Size::new(640, 480));
        assert!(parse_size("640").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let result = Config::builder().with_window_size(Size::new(0, 600)).build();
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
