//! Markers scenes attach to elements the focus engine should know about.
//!
//! Named single buttons are exposed through
//! [`SceneSurface`](crate::resources::scenesurface::SceneSurface) slots. Ordered
//! collections are exposed by component instead:
//! - [`FreeformOption`] – clickable regions over a scene image (find-and-fix)
//! - [`ChoiceButton`] – answer buttons of a choice-list question
//!
//! [`Clickable`] marks elements that react to native pointer input, which is
//! the fallback signal the engine fires when no named callback exists.
//! [`RevealAfter`] hides an element until a delay has elapsed.

use bevy_ecs::prelude::Component;

/// A clickable region belonging to a freeform option collection.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeformOption {
    /// Position of the option in the scene's option list.
    pub index: usize,
}

/// An answer button in a choice-list scene.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceButton {
    /// Display order of the button on screen.
    pub order: usize,
    /// Option id carried to the game selection when chosen.
    pub option_index: usize,
}

/// Element responds to native pointer input (down/up signals).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Clickable;

/// Keeps an element hidden until `remaining` seconds have elapsed.
///
/// When the timer expires the element becomes visible and the scene signals
/// a content change so the focus list is rebuilt.
#[derive(Component, Clone, Copy, Debug)]
pub struct RevealAfter {
    pub remaining: f32,
}

impl RevealAfter {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Advance the timer. Returns `true` once the delay has elapsed; the
    /// reveal system removes the component at that point.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_after_expires() {
        let mut r = RevealAfter::new(0.5);
        assert!(!r.tick(0.3));
        assert!(r.tick(0.3));
    }

    #[test]
    fn test_zero_delay_expires_on_first_tick() {
        let mut r = RevealAfter::new(0.0);
        assert!(r.tick(0.0));
    }
}
