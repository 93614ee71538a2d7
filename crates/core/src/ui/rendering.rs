//! Painting helpers for the surface.
//!
//! These turn a [`RenderPlan`] into egui shapes. Surface coordinates are
//! offset by the top-left corner of the area the surface occupies.

use crate::geometry::Rect;
use crate::surface::{DropHighlight, RenderPlan, SelectionOverlay};
use eframe::egui;

const IDLE_BORDER: egui::Color32 = egui::Color32::from_rgb(0xaa, 0xaa, 0xaa);
const IDLE_FILL: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf0, 0xf0);
const ACCEPT_BORDER: egui::Color32 = egui::Color32::from_rgb(0x00, 0xbf, 0xff);
const ACCEPT_FILL: egui::Color32 = egui::Color32::from_rgb(0xe6, 0xf7, 0xff);
const REJECT_BORDER: egui::Color32 = egui::Color32::from_rgb(0xd9, 0x53, 0x4f);
const REJECT_FILL: egui::Color32 = egui::Color32::from_rgb(0xfb, 0xee, 0xee);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(0x55, 0x55, 0x55);

const ZONE_BORDER_WIDTH: f32 = 2.0;
const ZONE_DASH: (f32, f32) = (8.0, 5.0);

/// Fill and border colors of the drop zone.
pub fn drop_zone_colors(highlight: DropHighlight) -> (egui::Color32, egui::Color32) {
    match highlight {
        DropHighlight::None => (IDLE_FILL, IDLE_BORDER),
        DropHighlight::Accepted => (ACCEPT_FILL, ACCEPT_BORDER),
        DropHighlight::Rejected => (REJECT_FILL, REJECT_BORDER),
    }
}

/// Converts a surface rectangle to screen space.
pub fn to_screen_rect(origin: egui::Pos2, rect: Rect) -> egui::Rect {
    let min = origin + egui::vec2(rect.x as f32, rect.y as f32);
    egui::Rect::from_min_size(min, egui::vec2(rect.width as f32, rect.height as f32))
}

/// Paints a whole frame.
///
/// # Arguments
/// * `painter` - The egui painter to draw with
/// * `area` - Screen rectangle occupied by the surface
/// * `plan` - What the surface wants shown
/// * `texture` - The uploaded image, if any
pub fn paint_surface(
    painter: &egui::Painter,
    area: egui::Rect,
    plan: &RenderPlan,
    texture: Option<&egui::TextureHandle>,
) {
    draw_drop_zone(painter, area, plan.highlight);

    if let (Some(preview), Some(texture)) = (plan.preview, texture) {
        painter.image(
            texture.id(),
            to_screen_rect(area.min, preview),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    if let Some(text) = plan.placeholder {
        painter.text(
            area.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            TEXT_COLOR,
        );
    }

    if let Some(overlay) = &plan.selection {
        draw_selection_border(painter, area.min, overlay);
    }
}

/// Fills the surface and outlines it with a dashed border.
pub fn draw_drop_zone(painter: &egui::Painter, area: egui::Rect, highlight: DropHighlight) {
    let (fill, border) = drop_zone_colors(highlight);
    painter.rect_filled(area, 0.0, fill);
    draw_dashed_rect(
        painter,
        area.shrink(ZONE_BORDER_WIDTH / 2.0),
        egui::Stroke::new(ZONE_BORDER_WIDTH, border),
        ZONE_DASH,
    );
}

/// Draws the dashed selection outline.
pub fn draw_selection_border(
    painter: &egui::Painter,
    origin: egui::Pos2,
    overlay: &SelectionOverlay,
) {
    let [r, g, b] = overlay.color;
    draw_dashed_rect(
        painter,
        to_screen_rect(origin, overlay.rect),
        egui::Stroke::new(overlay.stroke_width, egui::Color32::from_rgb(r, g, b)),
        overlay.dash,
    );
}

fn draw_dashed_rect(
    painter: &egui::Painter,
    rect: egui::Rect,
    stroke: egui::Stroke,
    (dash, gap): (f32, f32),
) {
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(&outline, stroke, dash, gap));
}
