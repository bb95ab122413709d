//! Interactive UI element component.
//!
//! A [`UiElement`] is the renderable + clickable object that scenes place on
//! screen: buttons, option sprites, overlay rows. It carries the liveness
//! fields the focus engine checks before surfacing or drawing an element
//! (`visible`, `alive`, `enabled`) and the geometry used to compute its true
//! screen bounds together with
//! [`ScreenPosition`](super::screenposition::ScreenPosition) and
//! [`Scale`](super::scale::Scale).

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};

/// Visual + interactive description of an on-screen element.
#[derive(Component, Clone, Debug)]
pub struct UiElement {
    /// Texture (asset) key used to draw the element, if any.
    pub tex_key: Option<String>,
    /// Text drawn centered on the element, if any.
    pub label: Option<String>,
    /// Unscaled size in pixels.
    pub size: Vector2,
    /// Normalized pivot. `(0.5, 0.5)` means the position is the center.
    pub anchor: Vector2,
    /// Fill color used by the placeholder renderer.
    pub fill: Color,
    /// Label color.
    pub text_color: Color,
    /// Label font size in pixels.
    pub font_size: i32,
    /// Draw as a filled circle instead of a rectangle.
    pub round: bool,
    pub visible: bool,
    pub alive: bool,
    pub enabled: bool,
}

impl UiElement {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            tex_key: None,
            label: None,
            size: Vector2 {
                x: width,
                y: height,
            },
            anchor: Vector2 { x: 0.5, y: 0.5 },
            fill: Color::new(40, 120, 200, 255),
            text_color: Color::WHITE,
            font_size: 16,
            round: false,
            visible: true,
            alive: true,
            enabled: true,
        }
    }
    pub fn with_texture(mut self, key: impl Into<String>) -> Self {
        self.tex_key = Some(key.into());
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = Vector2 { x, y };
        self
    }
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }
    pub fn with_text_style(mut self, color: Color, font_size: i32) -> Self {
        self.text_color = color;
        self.font_size = font_size;
        self
    }
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Liveness check used at discovery, draw and press time.
    pub fn is_live(&self) -> bool {
        self.visible && self.alive
    }

    /// Liveness plus the `enabled` flag, used for freeform option collections.
    pub fn is_interactive(&self) -> bool {
        self.is_live() && self.enabled
    }

    /// True screen bounds of the element.
    ///
    /// The position is the element's pivot; the box is the size multiplied by
    /// the absolute scale (flipped elements still occupy positive space),
    /// shifted by the anchor.
    pub fn bounds(&self, pos: Vector2, scale: Vector2) -> Rectangle {
        let width = self.size.x * scale.x.abs();
        let height = self.size.y * scale.y.abs();
        Rectangle {
            x: pos.x - width * self.anchor.x,
            y: pos.y - height * self.anchor.y,
            width,
            height,
        }
    }

    /// Check whether a point lies inside the element's bounds.
    pub fn contains(&self, pos: Vector2, scale: Vector2, point: Vector2) -> bool {
        let r = self.bounds(pos, scale);
        point.x >= r.x && point.x <= r.x + r.width && point.y >= r.y && point.y <= r.y + r.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn v(x: f32, y: f32) -> Vector2 {
        Vector2 { x, y }
    }

    #[test]
    fn test_centered_bounds() {
        let e = UiElement::new(100.0, 50.0);
        let r = e.bounds(v(200.0, 100.0), v(1.0, 1.0));
        assert!(approx_eq(r.x, 150.0));
        assert!(approx_eq(r.y, 75.0));
        assert!(approx_eq(r.width, 100.0));
        assert!(approx_eq(r.height, 50.0));
    }

    #[test]
    fn test_bounds_apply_anchor_and_scale() {
        let e = UiElement::new(100.0, 40.0).with_anchor(0.0, 1.0);
        let r = e.bounds(v(10.0, 100.0), v(0.5, 2.0));
        assert!(approx_eq(r.x, 10.0));
        assert!(approx_eq(r.y, 20.0));
        assert!(approx_eq(r.width, 50.0));
        assert!(approx_eq(r.height, 80.0));
    }

    #[test]
    fn test_negative_scale_uses_absolute_size() {
        let e = UiElement::new(60.0, 60.0);
        let r = e.bounds(v(0.0, 0.0), v(-1.0, 1.0));
        assert!(approx_eq(r.width, 60.0));
        assert!(approx_eq(r.x, -30.0));
    }

    #[test]
    fn test_liveness() {
        let mut e = UiElement::new(1.0, 1.0);
        assert!(e.is_live());
        e.enabled = false;
        assert!(e.is_live());
        assert!(!e.is_interactive());
        e.alive = false;
        assert!(!e.is_live());
        assert!(!UiElement::new(1.0, 1.0).hidden().is_live());
    }

    #[test]
    fn test_contains() {
        let e = UiElement::new(20.0, 20.0);
        assert!(e.contains(v(50.0, 50.0), v(1.0, 1.0), v(55.0, 45.0)));
        assert!(!e.contains(v(50.0, 50.0), v(1.0, 1.0), v(70.0, 45.0)));
    }
}
