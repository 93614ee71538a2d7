//! The display-and-crop surface.
//!
//! [`CropSurface`] owns the loaded image, the preview placement and the
//! selection, and knows nothing about any windowing toolkit. A front-end
//! feeds it [`SurfaceEvent`]s (or calls the operations directly) and paints
//! whatever [`CropSurface::render`] describes.
//!
//! Selection follows a two-state machine: `Idle -> Selecting` on a primary
//! press with an image loaded, back to `Idle` on release. The finalized
//! rectangle may be empty.

use crate::error::{AppError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::image_processing::{ImageProcessor, PreviewTransform};
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Text shown while no image is loaded.
pub const PLACEHOLDER_TEXT: &str = "Drag and drop an image here";

/// Selection outline color (RGB).
pub const ACCENT_COLOR: [u8; 3] = [255, 0, 0];
/// Selection outline width, in surface units.
pub const STROKE_WIDTH: f32 = 2.0;
/// Dash and gap length of the selection outline.
pub const DASH_PATTERN: (f32, f32) = (6.0, 4.0);

/// Pointer buttons the surface distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Input delivered by the hosting toolkit.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A file is being dragged over the surface.
    DragEnter(PathBuf),
    /// The drag left without dropping.
    DragLeave,
    /// A file was dropped.
    Drop(PathBuf),
    PointerDown { button: PointerButton, pos: Point },
    PointerMove(Point),
    PointerUp { button: PointerButton, pos: Point },
    /// The user asked for the context menu (keyboard menu key, long press).
    ContextRequest,
    /// The display area changed size.
    Resize(Size),
}

/// How a hovering drag is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropHighlight {
    #[default]
    None,
    Accepted,
    Rejected,
}

/// Entries of the context menu and whether each can be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    pub crop_enabled: bool,
    pub save_enabled: bool,
}

/// What the front-end should do after an event.
#[derive(Debug)]
pub enum SurfaceResponse {
    /// Nothing changed.
    Ignored,
    /// State changed; repaint.
    Redraw,
    /// A new image was loaded; re-upload and repaint.
    ImageChanged,
    /// Show the context menu.
    ContextMenu(ContextMenu),
    /// The event failed; the surface state is unchanged.
    Failed(AppError),
}

/// Selection outline to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOverlay {
    pub rect: Rect,
    pub color: [u8; 3],
    pub stroke_width: f32,
    pub dash: (f32, f32),
}

/// Everything needed to paint one frame of the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub surface: Size,
    /// Where to paint the image, if one is loaded.
    pub preview: Option<Rect>,
    pub selection: Option<SelectionOverlay>,
    pub highlight: DropHighlight,
    /// Shown instead of a preview.
    pub placeholder: Option<&'static str>,
    /// Bumped whenever the image is replaced.
    pub generation: u64,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    end: Point,
}

/// Loaded image plus the selection drawn over its preview.
pub struct CropSurface {
    image: Option<DynamicImage>,
    source: Option<PathBuf>,
    surface: Size,
    transform: Option<PreviewTransform>,
    selection: Rect,
    drag: Option<Drag>,
    highlight: DropHighlight,
    generation: u64,
}

impl CropSurface {
    /// Creates an empty surface with a display area of `surface`.
    pub fn new(surface: Size) -> Self {
        Self {
            image: None,
            source: None,
            surface,
            transform: None,
            selection: Rect::default(),
            drag: None,
            highlight: DropHighlight::None,
            generation: 0,
        }
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Path the current image was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    pub fn preview_transform(&self) -> Option<PreviewTransform> {
        self.transform
    }

    /// The current selection, if it covers any area.
    pub fn selection(&self) -> Option<Rect> {
        (!self.selection.is_empty()).then_some(self.selection)
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn is_selecting(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drop_highlight(&self) -> DropHighlight {
        self.highlight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dispatches a toolkit event to the matching operation.
    pub fn handle(&mut self, event: SurfaceEvent) -> SurfaceResponse {
        match event {
            SurfaceEvent::DragEnter(path) => {
                self.drag_enter(&path);
                SurfaceResponse::Redraw
            }
            SurfaceEvent::DragLeave => {
                self.drag_leave();
                SurfaceResponse::Redraw
            }
            SurfaceEvent::Drop(path) => match self.drop_file(&path) {
                Ok(()) => SurfaceResponse::ImageChanged,
                Err(e) => SurfaceResponse::Failed(e),
            },
            SurfaceEvent::PointerDown {
                button: PointerButton::Primary,
                pos,
            } => self.redraw_if(|s| s.begin_selection(pos)),
            SurfaceEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            }
            | SurfaceEvent::ContextRequest => match self.context_menu() {
                Some(menu) => SurfaceResponse::ContextMenu(menu),
                None => SurfaceResponse::Ignored,
            },
            SurfaceEvent::PointerMove(pos) => self.redraw_if(|s| s.update_selection(pos)),
            SurfaceEvent::PointerUp {
                button: PointerButton::Primary,
                pos,
            } => self.redraw_if(|s| s.end_selection(pos)),
            SurfaceEvent::PointerUp { .. } => SurfaceResponse::Ignored,
            SurfaceEvent::Resize(size) => self.redraw_if(|s| s.resize(size)),
        }
    }

    fn redraw_if(&mut self, op: impl FnOnce(&mut Self) -> bool) -> SurfaceResponse {
        if op(self) {
            SurfaceResponse::Redraw
        } else {
            SurfaceResponse::Ignored
        }
    }

    /// Marks a hovering drag as accepted or rejected by its extension.
    pub fn drag_enter(&mut self, path: &Path) -> bool {
        let accepted = ImageProcessor::is_supported_path(path);
        self.highlight = if accepted {
            DropHighlight::Accepted
        } else {
            DropHighlight::Rejected
        };
        accepted
    }

    pub fn drag_leave(&mut self) {
        self.highlight = DropHighlight::None;
    }

    /// Completes a drop: loads the file if its extension is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidImage`] for rejected extensions and
    /// undecodable files.
    pub fn drop_file(&mut self, path: &Path) -> Result<()> {
        self.highlight = DropHighlight::None;
        if !ImageProcessor::is_supported_path(path) {
            return Err(AppError::invalid_image(format!(
                "{}: unsupported file type",
                path.display()
            )));
        }
        self.load(path)
    }

    /// Decodes `path` and makes it the current image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidImage`] if decoding fails; the surface is
    /// left as it was.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let image = match ImageProcessor::decode(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Rejected {}: {}", path.display(), e);
                return Err(e);
            }
        };
        self.load_image(image);
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    /// Makes an already decoded image the current one.
    pub fn load_image(&mut self, image: DynamicImage) {
        log::info!("Loaded {}x{} image", image.width(), image.height());
        self.source = None;
        self.replace_image(image);
    }

    fn replace_image(&mut self, image: DynamicImage) {
        let size = Size::new(image.width(), image.height());
        self.transform = Some(PreviewTransform::fit(size, self.surface));
        self.image = Some(image);
        self.generation += 1;
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selection = Rect::default();
        self.drag = None;
    }

    /// Changes the display area, re-fitting the preview.
    ///
    /// The selection is dropped because it was drawn over the old preview.
    pub fn resize(&mut self, surface: Size) -> bool {
        if surface == self.surface {
            return false;
        }
        self.surface = surface;
        if let Some(image) = &self.image {
            let size = Size::new(image.width(), image.height());
            self.transform = Some(PreviewTransform::fit(size, surface));
        }
        self.clear_selection();
        true
    }

    /// Starts a selection at `point`. Returns `false` with no image loaded.
    pub fn begin_selection(&mut self, point: Point) -> bool {
        if self.image.is_none() {
            return false;
        }
        self.drag = Some(Drag {
            start: point,
            end: point,
        });
        self.selection = Rect::default();
        log::debug!("Selection started at ({}, {})", point.x, point.y);
        true
    }

    /// Moves the free corner of an in-progress selection.
    pub fn update_selection(&mut self, point: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.end = point;
        self.selection = Rect::from_points(drag.start, drag.end);
        true
    }

    /// Finalizes the selection at `point` and returns to idle.
    pub fn end_selection(&mut self, point: Point) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.selection = Rect::from_points(drag.start, point);
        log::debug!(
            "Selection finished: {}x{} at ({}, {})",
            self.selection.width,
            self.selection.height,
            self.selection.x,
            self.selection.y
        );
        true
    }

    /// The context menu offered for the current state, if any.
    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.image.as_ref().map(|_| ContextMenu {
            crop_enabled: self.has_selection(),
            save_enabled: true,
        })
    }

    /// Describes the current frame.
    pub fn render(&self) -> RenderPlan {
        let preview = self.transform.map(|t| t.preview_rect());
        let selection = self.selection().map(|rect| SelectionOverlay {
            rect,
            color: ACCENT_COLOR,
            stroke_width: STROKE_WIDTH,
            dash: DASH_PATTERN,
        });

        RenderPlan {
            surface: self.surface,
            preview,
            selection,
            highlight: self.highlight,
            placeholder: self.image.is_none().then_some(PLACEHOLDER_TEXT),
            generation: self.generation,
        }
    }

    /// Replaces the image with the region under the selection.
    ///
    /// The crop is destructive: the previous pixels are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoSelection`] without an image, with an empty
    /// selection, or when the selection clips to nothing.
    pub fn crop_to_selection(&mut self) -> Result<()> {
        let (Some(image), Some(transform), Some(selection)) =
            (self.image.as_ref(), self.transform, self.selection())
        else {
            return Err(AppError::NoSelection);
        };

        let original = Size::new(image.width(), image.height());
        let region = ImageProcessor::map_selection(selection, &transform, original)?;
        let cropped = ImageProcessor::crop(image, region);

        log::info!(
            "Cropped {}x{} to {}x{} at ({}, {})",
            original.width,
            original.height,
            region.width,
            region.height,
            region.x,
            region.y
        );

        self.replace_image(cropped);
        Ok(())
    }

    /// Writes a copy of the image resized to `percent` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoImage`] with nothing loaded,
    /// [`AppError::InvalidPercent`] outside `10..=100`, and
    /// [`AppError::WriteFailure`] if encoding or writing fails.
    pub fn save_image(&self, percent: u32, destination: &Path) -> Result<SaveReport> {
        let image = self.image.as_ref().ok_or(AppError::NoImage)?;
        let resized = ImageProcessor::resize_for_export(image, percent)?;

        let format = match ImageProcessor::write(&resized, destination) {
            Ok(format) => format,
            Err(e) => {
                log::warn!("Save failed: {}", e);
                return Err(e);
            }
        };

        log::info!(
            "Saved {}x{} {:?} to {}",
            resized.width(),
            resized.height(),
            format,
            destination.display()
        );

        Ok(SaveReport {
            path: destination.to_path_buf(),
            width: resized.width(),
            height: resized.height(),
            format: format!("{:?}", format),
        })
    }
}

impl Default for CropSurface {
    fn default() -> Self {
        Self::new(Size::new(800, 600))
    }
}
