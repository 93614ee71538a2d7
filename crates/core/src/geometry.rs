//! Integer geometry for the display surface.
//!
//! Everything the surface reasons about (pointer positions, the preview
//! placement, the selection) lives in surface coordinates: whole units with
//! the origin at the top-left corner of the display area.

use serde::Serialize;

/// A point in surface coordinates. May lie outside the surface while a drag
/// leaves the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height, in surface units or image pixels depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle with a top-left origin and non-negative size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds the normalized rectangle spanned by two corners dragged in any
    /// direction: top-left is the component-wise min, size the absolute
    /// difference.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// A rectangle with zero width or zero height covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Fits `image` inside `bounds` preserving aspect ratio, growing or
/// shrinking as needed.
///
/// Integer arithmetic throughout: the height-bound width is tried first and
/// kept if it fits, otherwise the result is width-bound. Divisions truncate,
/// and neither side drops below one unit so a thin image still shows.
pub fn fit_size(image: Size, bounds: Size) -> Size {
    if image.is_empty() {
        return Size::default();
    }

    let (iw, ih) = (image.width as u64, image.height as u64);
    let (bw, bh) = (bounds.width as u64, bounds.height as u64);

    let height_bound_width = bh * iw / ih;
    let (w, h) = if height_bound_width <= bw {
        (height_bound_width, bh)
    } else {
        (bw, bw * ih / iw)
    };

    Size::new(clamp_dimension(w), clamp_dimension(h))
}

fn clamp_dimension(value: u64) -> u32 {
    value.clamp(1, u32::MAX as u64) as u32
}

/// Offset that centers `inner` inside `outer`, using floor division so an
/// odd leftover puts the extra unit after the content.
pub fn centering_offset(outer: Size, inner: Size) -> Point {
    let dx = (outer.width as i64 - inner.width as i64).div_euclid(2);
    let dy = (outer.height as i64 - inner.height as i64).div_euclid(2);
    Point::new(saturate_i32(dx), saturate_i32(dy))
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_normalizes_any_drag_direction() {
        let a = Point::new(50, 10);
        let b = Point::new(20, 40);
        let r = Rect::from_points(a, b);
        assert_eq!(r, Rect::new(20, 10, 30, 30));
        assert_eq!(Rect::from_points(b, a), r);
    }

    #[test]
    fn from_points_same_point_is_empty() {
        let p = Point::new(7, 9);
        let r = Rect::from_points(p, p);
        assert_eq!(r, Rect::new(7, 9, 0, 0));
        assert!(r.is_empty());
    }

    #[test]
    fn rect_with_one_zero_side_is_empty() {
        assert!(Rect::new(0, 0, 10, 0).is_empty());
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn wide_image_is_width_bound() {
        let preview = fit_size(Size::new(1000, 500), Size::new(800, 600));
        assert_eq!(preview, Size::new(800, 400));
    }

    #[test]
    fn tall_image_is_height_bound() {
        let preview = fit_size(Size::new(300, 900), Size::new(800, 600));
        assert_eq!(preview, Size::new(200, 600));
    }

    #[test]
    fn small_image_is_enlarged_to_fit() {
        let preview = fit_size(Size::new(40, 30), Size::new(800, 600));
        assert_eq!(preview, Size::new(800, 600));
    }

    #[test]
    fn fit_truncates_fractional_side() {
        // 600 * 1000 / 333 = 1801 > 800, so width-bound: 800 * 333 / 1000 = 266.4
        let preview = fit_size(Size::new(1000, 333), Size::new(800, 600));
        assert_eq!(preview, Size::new(800, 266));
    }

    #[test]
    fn extreme_aspect_keeps_one_unit() {
        let preview = fit_size(Size::new(10_000, 1), Size::new(800, 600));
        assert_eq!(preview, Size::new(800, 1));
    }

    #[test]
    fn empty_image_fits_to_nothing() {
        assert_eq!(fit_size(Size::new(0, 10), Size::new(800, 600)), Size::default());
    }

    #[test]
    fn centering_uses_floor_division() {
        let offset = centering_offset(Size::new(800, 600), Size::new(800, 400));
        assert_eq!(offset, Point::new(0, 100));

        let odd = centering_offset(Size::new(801, 600), Size::new(800, 599));
        assert_eq!(odd, Point::new(0, 0));
    }

    #[test]
    fn centering_larger_inner_goes_negative() {
        let offset = centering_offset(Size::new(0, 0), Size::new(1, 1));
        assert_eq!(offset, Point::new(-1, -1));
    }
}
