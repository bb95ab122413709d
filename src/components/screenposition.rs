//! Screen-space position component.
//!
//! Every interactive element in this game lives in screen space: scenes are
//! laid out against the fixed render resolution and never scroll. The
//! position is the element's pivot; see
//! [`UiElement::anchor`](super::uielement::UiElement::anchor).

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Screen-space pivot of an entity, in render-target pixels.
#[derive(Component, Clone, Copy, Debug)]
pub struct ScreenPosition {
    pub pos: Vector2,
}

impl Default for ScreenPosition {
    fn default() -> Self {
        Self {
            pos: Vector2 { x: 0.0, y: 0.0 },
        }
    }
}

impl ScreenPosition {
    /// Create a ScreenPosition from x and y.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }

    /// Place relative to the render size, `fx`/`fy` in `[0, 1]`.
    ///
    /// Scenes are authored in fractions of the screen (`0.03 * WIDTH`) so the
    /// layout follows the configured render resolution.
    pub fn fraction(fx: f32, fy: f32, width: f32, height: f32) -> Self {
        Self::new(fx * width, fy * height)
    }

    /// Translate by delta.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_scales_to_render_size() {
        let p = ScreenPosition::fraction(0.25, 0.5, 800.0, 600.0);
        assert_eq!(p.pos.x, 200.0);
        assert_eq!(p.pos.y, 300.0);
    }

    #[test]
    fn test_translate() {
        let mut p = ScreenPosition::new(1.0, 2.0);
        p.translate(3.0, -2.0);
        assert_eq!(p.pos.x, 4.0);
        assert_eq!(p.pos.y, 0.0);
    }
}
