//! Focus indicator drawable and its geometry.
//!
//! The [`FocusGlow`] component is the graphics layer the focus engine draws
//! into. It holds a list of outline strokes that the render pass turns into
//! raylib draw calls; the list is cleared and rebuilt on every refresh tick.
//!
//! [`IndicatorState`] is the derived, never persisted description of what to
//! draw: the focused element's true bounds plus a shape classification. Its
//! [`strokes`](IndicatorState::strokes) method expands it into three
//! decreasing-alpha glow layers and one bright inner outline.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};
use smallvec::SmallVec;

use crate::resources::focus::FocusAction;

/// Gold used by every indicator stroke.
pub const GLOW_COLOR: Color = Color::new(0xFF, 0xD7, 0x00, 0xFF);
/// Number of outer glow layers.
pub const GLOW_LAYERS: u32 = 3;
/// Distance in pixels between consecutive glow layers.
pub const GLOW_LAYER_OFFSET: f32 = 6.0;
/// Alpha of the innermost glow layer; layer `i` uses `GLOW_BASE_ALPHA / i`.
pub const GLOW_BASE_ALPHA: f32 = 0.25;
pub const GLOW_STROKE: f32 = 3.0;
pub const INNER_OFFSET: f32 = 4.0;
pub const INNER_STROKE: f32 = 2.5;
pub const INNER_ALPHA: f32 = 0.95;
/// Aspect ratios outside this range draw freeform options as ellipses.
pub const ELLIPSE_ASPECT_MIN: f32 = 0.7;
pub const ELLIPSE_ASPECT_MAX: f32 = 1.4;
/// Texture key fragments that identify round button art.
pub const ROUND_TEXTURE_KEYS: [&str; 5] = [
    "button_play",
    "button_pause",
    "button_home",
    "button_replay",
    "button_sound",
];

/// Shape used to outline the focused element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorShape {
    Circle,
    Ellipse,
    RoundedRect,
}

/// A single outline primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outline {
    Circle {
        center: Vector2,
        radius: f32,
    },
    Ellipse {
        center: Vector2,
        radius_x: f32,
        radius_y: f32,
    },
    RoundedRect {
        rect: Rectangle,
        corner_radius: f32,
    },
}

/// Outline plus line style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineStroke {
    pub outline: Outline,
    pub thickness: f32,
    pub color: Color,
    pub alpha: f32,
}

/// Derived indicator geometry for the focused element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorState {
    pub bounds: Rectangle,
    pub shape: IndicatorShape,
}

impl IndicatorState {
    pub fn new(bounds: Rectangle, shape: IndicatorShape) -> Self {
        Self { bounds, shape }
    }

    /// Classify the element and build its indicator state.
    pub fn for_element(action: FocusAction, tex_key: Option<&str>, bounds: Rectangle) -> Self {
        Self::new(bounds, classify_shape(action, tex_key, bounds))
    }

    pub fn center(&self) -> Vector2 {
        Vector2 {
            x: self.bounds.x + self.bounds.width / 2.0,
            y: self.bounds.y + self.bounds.height / 2.0,
        }
    }

    /// Outline grown by `offset` pixels on every side.
    pub fn outline(&self, offset: f32) -> Outline {
        let b = self.bounds;
        match self.shape {
            IndicatorShape::Circle => Outline::Circle {
                center: self.center(),
                radius: b.width.max(b.height) / 2.0 + offset,
            },
            IndicatorShape::Ellipse => Outline::Ellipse {
                center: self.center(),
                radius_x: b.width / 2.0 + offset,
                radius_y: b.height / 2.0 + offset,
            },
            IndicatorShape::RoundedRect => Outline::RoundedRect {
                rect: Rectangle {
                    x: b.x - offset,
                    y: b.y - offset,
                    width: b.width + offset * 2.0,
                    height: b.height + offset * 2.0,
                },
                corner_radius: b.width.min(b.height) * 0.15,
            },
        }
    }

    /// Outer glow layers (outermost first) followed by the inner outline.
    pub fn strokes(&self) -> SmallVec<[OutlineStroke; 4]> {
        let mut strokes = SmallVec::new();
        for layer in (1..=GLOW_LAYERS).rev() {
            let layer = layer as f32;
            strokes.push(OutlineStroke {
                outline: self.outline(layer * GLOW_LAYER_OFFSET),
                thickness: GLOW_STROKE,
                color: GLOW_COLOR,
                alpha: GLOW_BASE_ALPHA / layer,
            });
        }
        strokes.push(OutlineStroke {
            outline: self.outline(INNER_OFFSET),
            thickness: INNER_STROKE,
            color: GLOW_COLOR,
            alpha: INNER_ALPHA,
        });
        strokes
    }
}

/// Pick the indicator shape for an element.
///
/// Round-button tags and round button art win; freeform options that are
/// clearly not square get an ellipse; everything else a rounded rectangle.
pub fn classify_shape(action: FocusAction, tex_key: Option<&str>, bounds: Rectangle) -> IndicatorShape {
    let round_art = tex_key
        .map(|key| ROUND_TEXTURE_KEYS.iter().any(|frag| key.contains(frag)))
        .unwrap_or(false);
    if action.is_round_button() || round_art {
        return IndicatorShape::Circle;
    }
    let aspect = bounds.width / bounds.height;
    if action.is_freeform_option() && (aspect < ELLIPSE_ASPECT_MIN || aspect > ELLIPSE_ASPECT_MAX) {
        IndicatorShape::Ellipse
    } else {
        IndicatorShape::RoundedRect
    }
}

/// Graphics layer holding the current indicator strokes.
#[derive(Component, Clone, Debug, Default)]
pub struct FocusGlow {
    pub strokes: SmallVec<[OutlineStroke; 4]>,
}

impl FocusGlow {
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Replace the layer's content with the strokes of `state`.
    pub fn draw(&mut self, state: &IndicatorState) {
        self.strokes = state.strokes();
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rectangle {
        Rectangle {
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_round_tags_are_circles() {
        let b = rect(0.0, 0.0, 120.0, 40.0);
        for action in [
            FocusAction::Play,
            FocusAction::Pause,
            FocusAction::Home,
            FocusAction::Replay,
            FocusAction::Mute,
            FocusAction::Resume,
            FocusAction::Restart,
        ] {
            assert_eq!(classify_shape(action, None, b), IndicatorShape::Circle);
        }
    }

    #[test]
    fn test_round_texture_key_is_circle() {
        let b = rect(0.0, 0.0, 120.0, 40.0);
        assert_eq!(
            classify_shape(FocusAction::Next, Some("ui/button_sound_on"), b),
            IndicatorShape::Circle
        );
        assert_eq!(
            classify_shape(FocusAction::Next, Some("button_next"), b),
            IndicatorShape::RoundedRect
        );
    }

    #[test]
    fn test_freeform_option_aspect_selects_ellipse() {
        let wide = rect(0.0, 0.0, 150.0, 50.0);
        let square = rect(0.0, 0.0, 50.0, 60.0);
        assert_eq!(
            classify_shape(FocusAction::FfOption, None, wide),
            IndicatorShape::Ellipse
        );
        assert_eq!(
            classify_shape(FocusAction::FfOption, None, square),
            IndicatorShape::RoundedRect
        );
        // Non-freeform elements never get an ellipse.
        assert_eq!(
            classify_shape(FocusAction::PpChoice, None, wide),
            IndicatorShape::RoundedRect
        );
    }

    #[test]
    fn test_strokes_layers_and_alpha_falloff() {
        let state = IndicatorState::new(rect(10.0, 10.0, 100.0, 50.0), IndicatorShape::RoundedRect);
        let strokes = state.strokes();
        assert_eq!(strokes.len(), 4);
        assert!(approx_eq(strokes[0].alpha, 0.25 / 3.0));
        assert!(approx_eq(strokes[1].alpha, 0.25 / 2.0));
        assert!(approx_eq(strokes[2].alpha, 0.25));
        assert!(approx_eq(strokes[3].alpha, 0.95));
        assert!(approx_eq(strokes[3].thickness, 2.5));
        match strokes[0].outline {
            Outline::RoundedRect { rect, corner_radius } => {
                assert!(approx_eq(rect.x, 10.0 - 18.0));
                assert!(approx_eq(rect.width, 100.0 + 36.0));
                assert!(approx_eq(corner_radius, 7.5));
            }
            other => panic!("unexpected outline {:?}", other),
        }
    }

    #[test]
    fn test_circle_radius_uses_larger_side() {
        let state = IndicatorState::new(rect(0.0, 0.0, 40.0, 60.0), IndicatorShape::Circle);
        match state.outline(INNER_OFFSET) {
            Outline::Circle { center, radius } => {
                assert!(approx_eq(center.x, 20.0));
                assert!(approx_eq(center.y, 30.0));
                assert!(approx_eq(radius, 34.0));
            }
            other => panic!("unexpected outline {:?}", other),
        }
    }

    #[test]
    fn test_glow_draw_replaces_previous_content() {
        let mut glow = FocusGlow::default();
        let state = IndicatorState::new(rect(0.0, 0.0, 10.0, 10.0), IndicatorShape::Ellipse);
        glow.draw(&state);
        glow.draw(&state);
        assert_eq!(glow.strokes.len(), 4);
        glow.clear();
        assert!(glow.is_empty());
    }
}
