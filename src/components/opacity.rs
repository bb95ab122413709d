//! Whole-drawable opacity multiplier.
//!
//! Applied on top of the per-stroke alpha of a drawable, so a pulse tween can
//! fade a multi-layer glow without touching its individual layers.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Opacity(1.0)
    }
}

impl Opacity {
    /// Combine with a stroke alpha, clamped to `[0, 1]`.
    pub fn apply(&self, alpha: f32) -> f32 {
        (self.0 * alpha).clamp(0.0, 1.0)
    }
}
