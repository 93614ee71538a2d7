//! Main cropper application.
//!
//! This module contains the `CropperApp` struct which implements the
//! `eframe::App` trait and hosts a single [`CropSurface`].

use super::dialogs::{pick_save_path, show_notice};
use super::input::{file_drag_events, pointer_events, FileDragFrame, PointerFrame};
use super::rendering::paint_surface;
use super::state::{MenuCommand, Notice, UiState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::export::{suggested_save_path, PERCENT_STEP};
use crate::geometry::Size;
use crate::image_processing::{ImageProcessor, MAX_PERCENT, MIN_PERCENT};
use crate::surface::{CropSurface, SurfaceEvent, SurfaceResponse};
use eframe::egui;
use std::path::PathBuf;

/// Window title.
pub const APP_TITLE: &str = "Fast Image Crop & Resize";

/// The cropper window.
pub struct CropperApp {
    surface: CropSurface,
    config: Config,

    // Texture state
    texture: Option<egui::TextureHandle>,
    /// Surface generation the texture was uploaded for
    texture_generation: u64,

    // Input state
    hovering_file: bool,

    state: UiState,
    /// Shown at the start of the next frame
    pending_notice: Option<Notice>,
}

impl CropperApp {
    /// Creates the application, optionally preloading `initial`.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `initial` - Image to open on startup
    pub fn new(config: Config, initial: Option<PathBuf>) -> Self {
        let mut surface = CropSurface::new(config.window_size);
        let mut pending_notice = None;

        if let Some(path) = initial {
            if let Err(e) = surface.load(&path) {
                pending_notice = Notice::from_error(&e);
            }
        }

        Self {
            surface,
            config,
            texture: None,
            texture_generation: 0,
            hovering_file: false,
            state: UiState::Idle,
            pending_notice,
        }
    }

    /// Feeds an event to the surface and reacts to the outcome.
    fn dispatch(&mut self, ctx: &egui::Context, event: SurfaceEvent) {
        match self.surface.handle(event) {
            SurfaceResponse::Ignored | SurfaceResponse::ContextMenu(_) => {}
            SurfaceResponse::Redraw | SurfaceResponse::ImageChanged => ctx.request_repaint(),
            SurfaceResponse::Failed(e) => self.report(&e),
        }
    }

    fn report(&self, err: &AppError) {
        match Notice::from_error(err) {
            Some(notice) => show_notice(&notice),
            None => log::debug!("Ignored: {}", err),
        }
    }

    /// Re-uploads the texture when the surface holds a different image.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.surface.generation();
        if self.texture.is_some() && self.texture_generation == generation {
            return;
        }

        self.texture = self.surface.image().map(|image| {
            let max_side = ctx.input(|i| i.max_texture_side) as u32;
            let display = ImageProcessor::thumbnail_within(image, max_side);
            let size = [display.width() as usize, display.height() as usize];
            let buffer = display.to_rgba8();
            let pixels = buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR)
        });
        self.texture_generation = generation;
    }

    fn run_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Crop => {
                if let Err(e) = self.surface.crop_to_selection() {
                    self.report(&e);
                }
            }
            MenuCommand::SaveImage => {
                if self.surface.has_image() {
                    self.state = UiState::ResizePrompt {
                        percent: self.config.default_percent,
                    };
                }
            }
        }
    }

    /// Asks for the destination and writes the export.
    fn save_with_percent(&mut self, percent: u32) {
        let suggested = suggested_save_path(&self.config.save_dir);
        let Some(destination) = pick_save_path(&suggested) else {
            log::debug!("Save cancelled");
            return;
        };

        match self.surface.save_image(percent, &destination) {
            Ok(report) => show_notice(&Notice::saved(&report)),
            Err(e) => self.report(&e),
        }
    }

    /// Renders the resize percentage prompt. Returns the chosen percentage
    /// once confirmed.
    fn render_resize_prompt(&mut self, ctx: &egui::Context) -> Option<u32> {
        let UiState::ResizePrompt { percent } = &mut self.state else {
            return None;
        };

        let mut confirmed = false;
        let mut cancelled = ctx.input(|i| i.key_pressed(egui::Key::Escape));

        egui::Window::new("Resize Percentage")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Choose resize percentage ({}–{}):",
                    MIN_PERCENT, MAX_PERCENT
                ));
                ui.add(
                    egui::Slider::new(percent, MIN_PERCENT..=MAX_PERCENT)
                        .step_by(PERCENT_STEP as f64)
                        .suffix("%"),
                );
                ui.horizontal(|ui| {
                    confirmed = ui.button("OK").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Enter));
                    cancelled |= ui.button("Cancel").clicked();
                });
            });

        let chosen = *percent;
        if confirmed || cancelled {
            self.state = UiState::Idle;
        }
        confirmed.then_some(chosen)
    }
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(notice) = self.pending_notice.take() {
            show_notice(&notice);
        }

        let panel_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(8))
            .fill(ctx.style().visuals.window_fill());

        let mut command = None;

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let area = ui.max_rect();
                let size = Size::new(area.width().max(0.0) as u32, area.height().max(0.0) as u32);
                self.dispatch(ctx, SurfaceEvent::Resize(size));

                for event in file_drag_events(FileDragFrame::capture(ctx), &mut self.hovering_file) {
                    self.dispatch(ctx, event);
                }

                self.sync_texture(ctx);

                let response = ui.interact(area, ui.id().with("surface"), egui::Sense::click_and_drag());

                // The prompt is modal: the surface ignores pointer input under it
                if self.state == UiState::Idle {
                    let pointer = PointerFrame::capture(ctx, &response);
                    for event in pointer_events(pointer, self.surface.is_selecting()) {
                        self.dispatch(ctx, event);
                    }
                }

                if let Some(menu) = self.surface.context_menu() {
                    response.context_menu(|ui| {
                        if ui
                            .add_enabled(menu.crop_enabled, egui::Button::new("✔ Crop"))
                            .clicked()
                        {
                            command = Some(MenuCommand::Crop);
                            ui.close();
                        }
                        if ui
                            .add_enabled(menu.save_enabled, egui::Button::new("💾 Save Image"))
                            .clicked()
                        {
                            command = Some(MenuCommand::SaveImage);
                            ui.close();
                        }
                    });
                }

                paint_surface(ui.painter(), area, &self.surface.render(), self.texture.as_ref());
            });

        if let Some(command) = command {
            self.run_command(command);
            ctx.request_repaint();
        }

        if let Some(percent) = self.render_resize_prompt(ctx) {
            self.save_with_percent(percent);
        }
    }
}

/// Opens the cropper window and blocks until it is closed.
///
/// # Arguments
/// * `config` - Application configuration
/// * `initial` - Image to open on startup
pub fn run(config: Config, initial: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([
                config.window_size.width as f32,
                config.window_size.height as f32,
            ])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(CropperApp::new(config, initial)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))
}
