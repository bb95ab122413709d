//! Render target for fixed-resolution rendering.
//!
//! Scenes draw into a texture at the configured render resolution, which is
//! then scaled into the window with letterboxing. The color filter is applied
//! during that final blit, so it covers every scene pixel and the overlay.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

/// NonSend: `RenderTexture2D` holds GPU resources of the main thread.
pub struct RenderTarget {
    pub texture: RenderTexture2D,
    pub game_width: u32,
    pub game_height: u32,
}

impl RenderTarget {
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, width, height)
            .map_err(|e| format!("Failed to create render texture: {}", e))?;

        // UI text and outlines scale better smoothed.
        unsafe {
            ffi::SetTextureFilter(
                texture.texture,
                TextureFilter::TEXTURE_FILTER_BILINEAR as i32,
            );
        }

        Ok(Self {
            texture,
            game_width: width,
            game_height: height,
        })
    }

    /// Source rectangle with negative height to flip the Y axis of the
    /// OpenGL texture.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.game_width as f32,
            height: -(self.game_height as f32),
        }
    }
}
