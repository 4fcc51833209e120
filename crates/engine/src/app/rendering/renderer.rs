use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::transform::screen_rect_px;
use super::{RenderSink, Viewport};
use crate::app::{Rect, Texture, TextureCache, TextureId};

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Software framebuffer presented through `pixels`. Owns the textures the
/// scene's handles point into.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    textures: TextureCache,
}

impl Renderer {
    pub fn new(window: Arc<Window>, textures: TextureCache) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
            textures,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport::new(width, height);
        Ok(())
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}

impl RenderSink for Renderer {
    type Error = Error;

    fn viewport(&self) -> Option<Viewport> {
        (!self.viewport.is_empty()).then_some(self.viewport)
    }

    fn clear(&mut self) {
        fill(self.pixels.frame_mut(), CLEAR_COLOR);
    }

    fn draw(&mut self, texture: TextureId, dest: Rect) {
        let Some(texture) = self.textures.get(texture) else {
            return;
        };
        blit_stretched(self.pixels.frame_mut(), self.viewport, texture, dest);
    }

    fn present(&mut self) -> Result<(), Error> {
        self.pixels.render()
    }
}

fn fill(frame: &mut [u8], color: [u8; 4]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

/// Nearest-neighbour copy of `texture` onto `dest`, clipped to the frame.
/// Fully transparent texels leave the frame untouched.
fn blit_stretched(frame: &mut [u8], viewport: Viewport, texture: &Texture, dest: Rect) {
    if !texture.is_drawable() || viewport.is_empty() {
        return;
    }
    let frame_len = viewport.width as usize * viewport.height as usize * 4;
    if frame.len() < frame_len {
        return;
    }

    let (left, top, right, bottom) = screen_rect_px(dest);
    let dest_w = right - left;
    let dest_h = bottom - top;
    if dest_w <= 0 || dest_h <= 0 {
        return;
    }

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = right.min(viewport.width as i32);
    let draw_bottom = bottom.min(viewport.height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let frame_width = viewport.width as usize;
    let texture_width = texture.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = ((out_y - top) as u64 * texture.height as u64 / dest_h as u64) as usize;
        let src_y = src_y.min(texture.height as usize - 1);
        let src_row = src_y * texture_width * 4;
        let dst_row = out_y as usize * frame_width * 4;

        for out_x in draw_left..draw_right {
            let src_x = ((out_x - left) as u64 * texture.width as u64 / dest_w as u64) as usize;
            let src_x = src_x.min(texture_width - 1);
            let src = src_row + src_x * 4;
            if texture.rgba[src + 3] == 0 {
                continue;
            }
            let dst = dst_row + out_x as usize * 4;
            frame[dst..dst + 4].copy_from_slice(&texture.rgba[src..src + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn frame(viewport: Viewport) -> Vec<u8> {
        vec![0; viewport.width as usize * viewport.height as usize * 4]
    }

    fn pixel(frame: &[u8], viewport: Viewport, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * viewport.width as usize + x) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn texture(width: u32, height: u32, texels: &[[u8; 4]]) -> Texture {
        Texture {
            width,
            height,
            rgba: texels.iter().flatten().copied().collect(),
        }
    }

    #[test]
    fn stretches_texture_to_destination() {
        let viewport = Viewport::new(4, 2);
        let mut frame = frame(viewport);
        let texture = texture(2, 1, &[RED, BLUE]);

        blit_stretched(&mut frame, viewport, &texture, Rect::new(0.0, 0.0, 4.0, 2.0));

        assert_eq!(pixel(&frame, viewport, 0, 0), RED);
        assert_eq!(pixel(&frame, viewport, 1, 1), RED);
        assert_eq!(pixel(&frame, viewport, 2, 0), BLUE);
        assert_eq!(pixel(&frame, viewport, 3, 1), BLUE);
    }

    #[test]
    fn clips_partially_offscreen_destination() {
        let viewport = Viewport::new(3, 3);
        let mut frame = frame(viewport);
        let texture = texture(2, 2, &[RED, BLUE, BLUE, RED]);

        blit_stretched(&mut frame, viewport, &texture, Rect::new(-1.0, -1.0, 2.0, 2.0));

        assert_eq!(pixel(&frame, viewport, 0, 0), RED);
        assert_eq!(pixel(&frame, viewport, 1, 0), [0; 4]);
        assert_eq!(pixel(&frame, viewport, 0, 1), [0; 4]);
    }

    #[test]
    fn fully_offscreen_destination_draws_nothing() {
        let viewport = Viewport::new(2, 2);
        let mut frame = frame(viewport);
        let texture = texture(1, 1, &[RED]);

        blit_stretched(&mut frame, viewport, &texture, Rect::new(5.0, 5.0, 2.0, 2.0));
        blit_stretched(&mut frame, viewport, &texture, Rect::new(-4.0, 0.0, 2.0, 2.0));

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn transparent_texels_are_skipped() {
        let viewport = Viewport::new(2, 1);
        let mut frame = frame(viewport);
        fill(&mut frame, BLUE);
        let texture = texture(2, 1, &[CLEAR, RED]);

        blit_stretched(&mut frame, viewport, &texture, Rect::new(0.0, 0.0, 2.0, 1.0));

        assert_eq!(pixel(&frame, viewport, 0, 0), BLUE);
        assert_eq!(pixel(&frame, viewport, 1, 0), RED);
    }

    #[test]
    fn malformed_texture_is_ignored() {
        let viewport = Viewport::new(2, 2);
        let mut frame = frame(viewport);
        let short = Texture {
            width: 2,
            height: 2,
            rgba: vec![255; 4],
        };

        blit_stretched(&mut frame, viewport, &short, Rect::new(0.0, 0.0, 2.0, 2.0));

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn fill_paints_every_pixel() {
        let mut frame = vec![7; 16];
        fill(&mut frame, CLEAR_COLOR);
        assert!(frame.chunks_exact(4).all(|chunk| chunk == CLEAR_COLOR));
    }
}
