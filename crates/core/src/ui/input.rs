//! Translation of egui input into surface events.
//!
//! egui reports pointer and file-drag state per frame; the surface wants
//! discrete events. The functions here diff the frame state against what the
//! surface already knows and emit only the transitions.

use crate::geometry::Point;
use crate::surface::{PointerButton, SurfaceEvent};
use eframe::egui;
use std::path::PathBuf;

/// Converts a screen position to surface coordinates, rounding toward the
/// top-left so a pointer inside a unit maps to that unit.
pub fn to_surface_point(pos: egui::Pos2, origin: egui::Pos2) -> Point {
    let local = pos - origin;
    Point::new(local.x.floor() as i32, local.y.floor() as i32)
}

/// File drag state for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDragFrame {
    /// Path of the first hovered file; `Some(None)` when the platform hides it.
    pub hovered: Option<Option<PathBuf>>,
    /// Path of the first dropped file.
    pub dropped: Option<PathBuf>,
}

impl FileDragFrame {
    pub fn capture(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            hovered: i.raw.hovered_files.first().map(|f| f.path.clone()),
            dropped: i.raw.dropped_files.first().and_then(|f| f.path.clone()),
        })
    }
}

/// Emits drag-enter, drag-leave and drop transitions.
///
/// `hovering` carries whether a drag was over the surface last frame.
pub fn file_drag_events(frame: FileDragFrame, hovering: &mut bool) -> Vec<SurfaceEvent> {
    let mut events = Vec::new();

    if let Some(path) = frame.dropped {
        *hovering = false;
        events.push(SurfaceEvent::Drop(path));
        return events;
    }

    match frame.hovered {
        Some(path) if !*hovering => {
            *hovering = true;
            // An unnamed file cannot be checked, so it is offered as rejected
            events.push(SurfaceEvent::DragEnter(path.unwrap_or_default()));
        }
        None if *hovering => {
            *hovering = false;
            events.push(SurfaceEvent::DragLeave);
        }
        _ => {}
    }

    events
}

/// Primary-button pointer state for one frame, in surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    pub pressed: bool,
    pub released: bool,
    pub moved: bool,
    /// Whether the press landed on the surface (not on a menu or window).
    pub over_surface: bool,
    pub pos: Option<Point>,
}

impl PointerFrame {
    pub fn capture(ctx: &egui::Context, response: &egui::Response) -> Self {
        let origin = response.rect.min;
        ctx.input(|i| Self {
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            moved: i.pointer.is_moving(),
            over_surface: response.hovered(),
            pos: i
                .pointer
                .latest_pos()
                .map(|pos| to_surface_point(pos, origin)),
        })
    }
}

/// Emits pointer-down, pointer-move and pointer-up for the primary button.
///
/// Moves and releases are only forwarded while a selection is in progress.
pub fn pointer_events(frame: PointerFrame, selecting: bool) -> Vec<SurfaceEvent> {
    let Some(pos) = frame.pos else {
        return Vec::new();
    };

    let mut events = Vec::new();
    let mut selecting = selecting;

    if frame.pressed && frame.over_surface {
        events.push(SurfaceEvent::PointerDown {
            button: PointerButton::Primary,
            pos,
        });
        selecting = true;
    }

    if selecting && frame.moved {
        events.push(SurfaceEvent::PointerMove(pos));
    }

    if selecting && frame.released {
        events.push(SurfaceEvent::PointerUp {
            button: PointerButton::Primary,
            pos,
        });
    }

    events
}
