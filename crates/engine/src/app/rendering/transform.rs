use crate::app::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Used when the sink cannot report its output size.
pub const FALLBACK_VIEWPORT: Viewport = Viewport::new(960, 540);

/// World-space position of the screen's top-left corner that centres
/// `target` in `viewport`.
pub fn camera_offset(target: Rect, viewport: Viewport) -> Vec2 {
    Vec2::new(
        target.x + target.w * 0.5 - viewport.width as f32 * 0.5,
        target.y + target.h * 0.5 - viewport.height as f32 * 0.5,
    )
}

pub fn world_to_screen(rect: Rect, camera_offset: Vec2) -> Rect {
    rect.translated(Vec2::new(-camera_offset.x, -camera_offset.y))
}

/// Whole-pixel bounds `(left, top, right, bottom)` of a screen rect.
pub(crate) fn screen_rect_px(rect: Rect) -> (i32, i32, i32, i32) {
    let left = rect.x.round() as i32;
    let top = rect.y.round() as i32;
    let right = (rect.x + rect.w).round() as i32;
    let bottom = (rect.y + rect.h).round() as i32;
    (left, top, right, bottom)
}
