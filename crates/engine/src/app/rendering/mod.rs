mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{camera_offset, world_to_screen, Viewport, FALLBACK_VIEWPORT};

use super::{Rect, TextureId};

/// Drawing backend the scene renders into, once per frame:
/// `clear`, any number of `draw` calls, then `present`.
pub trait RenderSink {
    type Error;

    /// Current output size, if the backend can report one.
    fn viewport(&self) -> Option<Viewport>;

    fn clear(&mut self);

    /// Draws `texture` stretched to fill `dest`, in screen pixels.
    /// Unknown handles are ignored.
    fn draw(&mut self, texture: TextureId, dest: Rect);

    fn present(&mut self) -> Result<(), Self::Error>;
}
