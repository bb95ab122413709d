//! Window size resource.
//!
//! The OS window may differ from the render resolution; the render target is
//! letterboxed into it and pointer positions are mapped back through the
//! same rectangle.

use bevy_ecs::prelude::Resource;
use raylib::prelude::*;

/// Current window size in pixels, refreshed every frame.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WindowSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl WindowSize {
    /// Largest centered rectangle with the game's aspect ratio.
    pub fn calculate_letterbox(&self, game_width: u32, game_height: u32) -> Rectangle {
        let game_w = game_width as f32;
        let game_h = game_height as f32;
        let window_w = self.w as f32;
        let window_h = self.h as f32;

        let game_aspect = game_w / game_h;
        let window_aspect = window_w / window_h;

        if window_aspect > game_aspect {
            let scale = window_h / game_h;
            let scaled_w = game_w * scale;
            Rectangle {
                x: (window_w - scaled_w) / 2.0,
                y: 0.0,
                width: scaled_w,
                height: window_h,
            }
        } else {
            let scale = window_w / game_w;
            let scaled_h = game_h * scale;
            Rectangle {
                x: 0.0,
                y: (window_h - scaled_h) / 2.0,
                width: window_w,
                height: scaled_h,
            }
        }
    }

    /// Map a window position (mouse) into render-target pixels, clamped to
    /// the game area.
    pub fn window_to_game_pos(
        &self,
        window_pos: Vector2,
        game_width: u32,
        game_height: u32,
    ) -> Vector2 {
        let letterbox = self.calculate_letterbox(game_width, game_height);
        let game_w = game_width as f32;
        let game_h = game_height as f32;

        if letterbox.width <= 0.0 || letterbox.height <= 0.0 {
            return Vector2 { x: 0.0, y: 0.0 };
        }
        Vector2 {
            x: ((window_pos.x - letterbox.x) * game_w / letterbox.width).clamp(0.0, game_w),
            y: ((window_pos.y - letterbox.y) * game_h / letterbox.height).clamp(0.0, game_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_pillarbox_on_wide_window() {
        let window = WindowSize { w: 2000, h: 720 };
        let rect = window.calculate_letterbox(1280, 720);
        assert!(approx_eq(rect.width, 1280.0));
        assert!(approx_eq(rect.x, 360.0));
    }

    #[test]
    fn test_window_to_game_maps_through_letterbox() {
        let window = WindowSize { w: 640, h: 720 };
        // Game 1280x720 scaled to 640x360, centered vertically at y=180.
        let pos = window.window_to_game_pos(Vector2 { x: 320.0, y: 360.0 }, 1280, 720);
        assert!(approx_eq(pos.x, 640.0));
        assert!(approx_eq(pos.y, 360.0));
        let clamped = window.window_to_game_pos(Vector2 { x: 0.0, y: 0.0 }, 1280, 720);
        assert!(approx_eq(clamped.y, 0.0));
    }
}
