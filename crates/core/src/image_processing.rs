//! Image loading, cropping, resizing and encoding.
//!
//! # Coordinate Mapping
//!
//! The surface shows the image scaled to fit its display area and centered
//! inside it. A selection is drawn in surface units over that preview, so
//! before cropping it has to lose the centering offset, be clipped to the
//! preview, and be scaled up (or down) to original-image pixels. The scale
//! factor is taken from the width; because the fit preserves aspect ratio
//! the height follows the same factor up to one preview unit of truncation.

use crate::error::{AppError, Result};
use crate::geometry::{centering_offset, fit_size, Point, Rect, Size};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;
use std::path::Path;

/// File extensions accepted on drag-and-drop (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Smallest resize percentage offered at save time.
pub const MIN_PERCENT: u32 = 10;
/// Largest resize percentage offered at save time.
pub const MAX_PERCENT: u32 = 100;

/// Filter used for both the export resize and any preview downscale.
const SMOOTH_FILTER: FilterType = FilterType::CatmullRom;

/// Where a fitted preview sits inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewTransform {
    /// Display area the preview was fit into.
    pub surface: Size,
    /// Size of the fitted preview.
    pub preview: Size,
    /// Top-left of the preview inside the surface.
    pub offset: Point,
}

impl PreviewTransform {
    /// Fits an image of `image` size into `surface` and centers it.
    pub fn fit(image: Size, surface: Size) -> Self {
        let preview = fit_size(image, surface);
        Self {
            surface,
            preview,
            offset: centering_offset(surface, preview),
        }
    }

    /// The preview's rectangle in surface coordinates.
    pub fn preview_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.preview)
    }
}

/// A region of the original image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Image processing utilities for the crop-and-export workflow.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Whether a dropped file should be accepted, judged by extension only.
    pub fn is_supported_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
            .unwrap_or(false)
    }

    /// Decodes the image at `path`.
    ///
    /// The format is sniffed from the file content first so a mislabeled
    /// file still opens; the extension is the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidImage`] if the file cannot be read or
    /// decoded.
    pub fn decode(path: &Path) -> Result<DynamicImage> {
        let reader = ImageReader::open(path)
            .map_err(|e| AppError::invalid_image(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| AppError::invalid_image(format!("{}: {}", path.display(), e)))?;

        reader
            .decode()
            .map_err(|e| AppError::invalid_image(format!("{}: {}", path.display(), e)))
    }

    /// Maps a selection drawn over the preview to a region of the original
    /// image.
    ///
    /// # Arguments
    ///
    /// * `selection` - Normalized selection in surface coordinates
    /// * `transform` - Placement of the preview the selection was drawn on
    /// * `original` - Size of the original image
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoSelection`] if the selection is empty, lies
    /// entirely outside the preview, or shrinks to nothing once scaled.
    pub fn map_selection(
        selection: Rect,
        transform: &PreviewTransform,
        original: Size,
    ) -> Result<CropRegion> {
        let preview = transform.preview;
        if selection.is_empty() || preview.is_empty() || original.is_empty() {
            return Err(AppError::NoSelection);
        }

        // Remove the centering offset, clipping anything left of / above the preview
        let sx = (selection.x as i64 - transform.offset.x as i64).max(0);
        let sy = (selection.y as i64 - transform.offset.y as i64).max(0);

        // Clip the far edges to the preview
        let sw = (selection.width as i64).min(preview.width as i64 - sx);
        let sh = (selection.height as i64).min(preview.height as i64 - sy);
        if sw <= 0 || sh <= 0 {
            return Err(AppError::NoSelection);
        }

        let (fx, fy) = Self::scale_factors(original, preview);

        let x = (sx as f64 * fx) as u32;
        let y = (sy as f64 * fy) as u32;
        let mut width = (sw as f64 * fx) as u32;
        let mut height = (sh as f64 * fy) as u32;

        // Clamp to image bounds to prevent out-of-bounds crops
        width = width.min(original.width.saturating_sub(x));
        height = height.min(original.height.saturating_sub(y));

        if width == 0 || height == 0 {
            return Err(AppError::NoSelection);
        }

        Ok(CropRegion {
            x,
            y,
            width,
            height,
        })
    }

    /// Preview-to-original scale factors `(x, y)`.
    ///
    /// The width-derived factor is used on both axes whenever the preview is
    /// an aspect fit of the original up to one unit of truncation on its
    /// derived side. A width-bound fit truncates the height and a
    /// height-bound fit truncates the width, so both predictions are
    /// checked. Anything else gets a factor per axis.
    fn scale_factors(original: Size, preview: Size) -> (f64, f64) {
        let fx = original.width as f64 / preview.width as f64;
        let fy = original.height as f64 / preview.height as f64;

        let predicted_height = original.height as f64 / fx;
        let predicted_width = original.width as f64 / fy;
        if (predicted_height - preview.height as f64).abs() <= 1.0
            || (predicted_width - preview.width as f64).abs() <= 1.0
        {
            (fx, fx)
        } else {
            log::warn!(
                "Preview {}x{} is not an aspect fit of {}x{}, scaling axes independently",
                preview.width,
                preview.height,
                original.width,
                original.height
            );
            (fx, fy)
        }
    }

    /// Extracts `region` from `image` as a new image.
    pub fn crop(image: &DynamicImage, region: CropRegion) -> DynamicImage {
        image.crop_imm(region.x, region.y, region.width, region.height)
    }

    /// Checks a resize percentage against the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidPercent`] outside `10..=100`.
    pub fn validate_percent(percent: u32) -> Result<u32> {
        if (MIN_PERCENT..=MAX_PERCENT).contains(&percent) {
            Ok(percent)
        } else {
            Err(AppError::InvalidPercent(percent))
        }
    }

    /// Output size for an export at `percent`.
    ///
    /// The target box is each side scaled by the percentage (truncated);
    /// the image is then fit into that box preserving aspect ratio.
    pub fn export_size(original: Size, percent: u32) -> Size {
        let target = Size::new(
            (original.width as u64 * percent as u64 / 100) as u32,
            (original.height as u64 * percent as u64 / 100) as u32,
        );
        fit_size(original, target)
    }

    /// Produces a smoothly resized copy of `image` for export.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidPercent`] outside `10..=100`.
    pub fn resize_for_export(image: &DynamicImage, percent: u32) -> Result<DynamicImage> {
        let percent = Self::validate_percent(percent)?;
        let original = Size::new(image.width(), image.height());
        let target = Self::export_size(original, percent);

        if target == original {
            return Ok(image.clone());
        }

        Ok(image.resize_exact(target.width, target.height, SMOOTH_FILTER))
    }

    /// Picks the encoder for `path` from its extension.
    ///
    /// A path without an extension is written as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::WriteFailure`] if the extension is unknown or its
    /// format cannot be encoded.
    pub fn output_format(path: &Path) -> Result<ImageFormat> {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return Ok(ImageFormat::Png);
        };

        let format = ImageFormat::from_extension(ext)
            .ok_or_else(|| AppError::write(path, format!("unsupported extension '.{}'", ext)))?;

        if !format.writing_enabled() {
            return Err(AppError::write(
                path,
                format!("writing {:?} images is not supported", format),
            ));
        }

        Ok(format)
    }

    /// Encodes `image` to `path` in the format chosen by its extension.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::WriteFailure`] for unsupported extensions and for
    /// any encoding or filesystem error.
    pub fn write(image: &DynamicImage, path: &Path) -> Result<ImageFormat> {
        let format = Self::output_format(path)?;
        let encodable = Self::encodable_for(image, format);

        encodable
            .save_with_format(path, format)
            .map_err(|e| AppError::write(path, e))?;

        Ok(format)
    }

    /// Converts pixel layouts the target encoder rejects.
    fn encodable_for(image: &DynamicImage, format: ImageFormat) -> DynamicImage {
        match format {
            // JPEG has no alpha channel and no 16-bit support
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            ImageFormat::Png => image.clone(),
            _ => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }

    /// Downscales `image` so neither side exceeds `max_side`, for display.
    pub fn thumbnail_within(image: &DynamicImage, max_side: u32) -> DynamicImage {
        if image.width() <= max_side && image.height() <= max_side {
            return image.clone();
        }
        let size = fit_size(
            Size::new(image.width(), image.height()),
            Size::new(max_side, max_side),
        );
        image.resize_exact(size.width, size.height, SMOOTH_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        }))
    }

    #[test]
    fn accepts_supported_extensions_in_any_case() {
        for name in ["a.png", "b.JPG", "c.Jpeg", "d.bmp", "e.GIF", "/some/dir/f.PnG"] {
            assert!(ImageProcessor::is_supported_path(&PathBuf::from(name)), "{name}");
        }
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["a.tiff", "b.webp", "c.txt", "noext", "png", "d.png.bak", ".gif"] {
            assert!(!ImageProcessor::is_supported_path(&PathBuf::from(name)), "{name}");
        }
    }

    #[test]
    fn preview_transform_centers_vertically() {
        let t = PreviewTransform::fit(Size::new(1000, 500), Size::new(800, 600));
        assert_eq!(t.preview, Size::new(800, 400));
        assert_eq!(t.offset, Point::new(0, 100));
        assert_eq!(t.preview_rect(), Rect::new(0, 100, 800, 400));
    }

    #[test]
    fn maps_selection_through_offset_and_scale() {
        let original = Size::new(1000, 500);
        let t = PreviewTransform::fit(original, Size::new(800, 600));
        let region =
            ImageProcessor::map_selection(Rect::new(100, 150, 200, 100), &t, original).unwrap();
        // origin (100, 150 - 100) * 1.25 and size (200, 100) * 1.25, truncated
        assert_eq!(
            region,
            CropRegion {
                x: 125,
                y: 62,
                width: 250,
                height: 125
            }
        );
    }

    #[test]
    fn selection_over_top_margin_is_clipped_to_preview() {
        let original = Size::new(1000, 500);
        let t = PreviewTransform::fit(original, Size::new(800, 600));
        // starts 50 units above the preview's top edge
        let region =
            ImageProcessor::map_selection(Rect::new(0, 50, 80, 100), &t, original).unwrap();
        assert_eq!(region.y, 0);
        assert_eq!(region.x, 0);
        assert_eq!(region.width, 100);
        assert_eq!(region.height, 125);
    }

    #[test]
    fn selection_past_bottom_right_is_clipped() {
        let original = Size::new(1000, 500);
        let t = PreviewTransform::fit(original, Size::new(800, 600));
        let region =
            ImageProcessor::map_selection(Rect::new(700, 450, 500, 500), &t, original).unwrap();
        // x: 700..800 preview -> 875..1000, y: 350..400 preview -> 437..500
        assert_eq!(region.x, 875);
        assert_eq!(region.width, 125);
        assert_eq!(region.y, 437);
        assert_eq!(region.height, 62);
        assert!(region.x + region.width <= original.width);
        assert!(region.y + region.height <= original.height);
    }

    #[test]
    fn selection_entirely_in_margin_is_no_selection() {
        let original = Size::new(1000, 500);
        let t = PreviewTransform::fit(original, Size::new(800, 600));
        let result = ImageProcessor::map_selection(Rect::new(10, 520, 100, 50), &t, original);
        assert!(matches!(result, Err(AppError::NoSelection)));
    }

    #[test]
    fn empty_selection_is_no_selection() {
        let original = Size::new(100, 100);
        let t = PreviewTransform::fit(original, Size::new(100, 100));
        let result = ImageProcessor::map_selection(Rect::new(10, 10, 0, 40), &t, original);
        assert!(matches!(result, Err(AppError::NoSelection)));
    }

    #[test]
    fn upscaled_preview_single_unit_can_vanish() {
        // 10x10 image shown at 100x100: one surface unit is a tenth of a pixel
        let original = Size::new(10, 10);
        let t = PreviewTransform::fit(original, Size::new(100, 100));
        let result = ImageProcessor::map_selection(Rect::new(0, 0, 1, 50), &t, original);
        assert!(matches!(result, Err(AppError::NoSelection)));
    }

    #[test]
    fn truncated_preview_height_keeps_uniform_scale() {
        // 1000x333 fits to 800x266; 333/266 != 1.25 but within one unit
        let (fx, fy) = ImageProcessor::scale_factors(Size::new(1000, 333), Size::new(800, 266));
        assert_eq!(fx, 1.25);
        assert_eq!(fy, 1.25);
    }

    #[test]
    fn tall_preview_uses_width_factor_on_both_axes() {
        // 300x901 fits to 199x600; the width side carries the truncation
        let original = Size::new(300, 901);
        let t = PreviewTransform::fit(original, Size::new(800, 600));
        assert_eq!(t.preview, Size::new(199, 600));

        let (fx, fy) = ImageProcessor::scale_factors(original, t.preview);
        assert_eq!(fx, fy);
        assert_eq!(fx, 300.0 / 199.0);

        // lower half of the preview: rows 300..600
        let region = ImageProcessor::map_selection(
            Rect::new(t.offset.x, 300, 199, 300),
            &t,
            original,
        )
        .unwrap();
        // 300 * 300/199 = 452.26; the height is clipped at the bottom edge
        assert_eq!(region.y, 452);
        assert_eq!(region.height, 901 - 452);
    }

    #[test]
    fn mismatched_preview_scales_axes_independently() {
        let (fx, fy) = ImageProcessor::scale_factors(Size::new(1000, 1000), Size::new(500, 250));
        assert_eq!(fx, 2.0);
        assert_eq!(fy, 4.0);
    }

    #[test]
    fn crop_extracts_exact_pixels() {
        let image = gradient(64, 32);
        let region = CropRegion {
            x: 10,
            y: 5,
            width: 20,
            height: 8,
        };
        let cropped = ImageProcessor::crop(&image, region);
        assert_eq!((cropped.width(), cropped.height()), (20, 8));
        let src = image.to_rgba8();
        let dst = cropped.to_rgba8();
        for y in 0..8 {
            for x in 0..20 {
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(x + 10, y + 5));
            }
        }
    }

    #[test]
    fn percent_range_is_inclusive() {
        assert!(ImageProcessor::validate_percent(10).is_ok());
        assert!(ImageProcessor::validate_percent(100).is_ok());
        assert!(matches!(
            ImageProcessor::validate_percent(9),
            Err(AppError::InvalidPercent(9))
        ));
        assert!(matches!(
            ImageProcessor::validate_percent(101),
            Err(AppError::InvalidPercent(101))
        ));
    }

    #[test]
    fn export_size_halves_dimensions() {
        assert_eq!(
            ImageProcessor::export_size(Size::new(400, 300), 50),
            Size::new(200, 150)
        );
    }

    #[test]
    fn export_size_truncates_and_preserves_aspect() {
        // box 33x33 from 333x333 at 10%
        assert_eq!(
            ImageProcessor::export_size(Size::new(333, 333), 10),
            Size::new(33, 33)
        );
        // box 101x10 from 1011x101; height-bound width 10*1011/101 = 100
        assert_eq!(
            ImageProcessor::export_size(Size::new(1011, 101), 10),
            Size::new(100, 10)
        );
    }

    #[test]
    fn resize_for_export_does_not_touch_source() {
        let image = gradient(400, 300);
        let resized = ImageProcessor::resize_for_export(&image, 50).unwrap();
        assert_eq!((resized.width(), resized.height()), (200, 150));
        assert_eq!((image.width(), image.height()), (400, 300));
    }

    #[test]
    fn resize_for_export_rejects_bad_percent() {
        let image = gradient(4, 4);
        assert!(matches!(
            ImageProcessor::resize_for_export(&image, 0),
            Err(AppError::InvalidPercent(0))
        ));
    }

    #[test]
    fn output_format_follows_extension() {
        let cases = [
            ("out.png", ImageFormat::Png),
            ("out.JPG", ImageFormat::Jpeg),
            ("out.jpeg", ImageFormat::Jpeg),
            ("out.bmp", ImageFormat::Bmp),
            ("out.gif", ImageFormat::Gif),
            ("out", ImageFormat::Png),
        ];
        for (name, expected) in cases {
            assert_eq!(
                ImageProcessor::output_format(Path::new(name)).unwrap(),
                expected,
                "{name}"
            );
        }
    }

    #[test]
    fn output_format_rejects_unknown_extension() {
        let result = ImageProcessor::output_format(Path::new("out.xyz"));
        assert!(matches!(result, Err(AppError::WriteFailure { .. })));
    }

    #[test]
    fn thumbnail_within_caps_longest_side() {
        let image = gradient(300, 100);
        let thumb = ImageProcessor::thumbnail_within(&image, 150);
        assert_eq!((thumb.width(), thumb.height()), (150, 50));

        let untouched = ImageProcessor::thumbnail_within(&image, 300);
        assert_eq!((untouched.width(), untouched.height()), (300, 100));
    }
}
