//! Per-frame keyboard input resource.
//!
//! Captures the keys the focus engine and the accessibility overlay react
//! to: arrows for navigation, Enter/Space to activate, `T`/`C`/`H` for the
//! overlay shortcuts and `\` to open or close the panel.
//!
//! [`PointerState`] holds the left mouse button mapped into render-target
//! pixels.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::events::input::InputAction;

/// Boolean key state with an associated keyboard binding.
#[derive(Debug, Clone, Copy)]
pub struct BoolState {
    pub active: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    pub key_binding: KeyboardKey,
}

impl BoolState {
    fn bound(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub focus_up: BoolState,
    pub focus_down: BoolState,
    pub focus_left: BoolState,
    pub focus_right: BoolState,
    pub activate: BoolState,
    pub activate_alt: BoolState,
    pub toggle_narration: BoolState,
    pub cycle_color_vision: BoolState,
    pub toggle_high_contrast: BoolState,
    pub toggle_overlay: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            focus_up: BoolState::bound(KeyboardKey::KEY_UP),
            focus_down: BoolState::bound(KeyboardKey::KEY_DOWN),
            focus_left: BoolState::bound(KeyboardKey::KEY_LEFT),
            focus_right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            activate: BoolState::bound(KeyboardKey::KEY_ENTER),
            activate_alt: BoolState::bound(KeyboardKey::KEY_SPACE),
            toggle_narration: BoolState::bound(KeyboardKey::KEY_T),
            cycle_color_vision: BoolState::bound(KeyboardKey::KEY_C),
            toggle_high_contrast: BoolState::bound(KeyboardKey::KEY_H),
            toggle_overlay: BoolState::bound(KeyboardKey::KEY_BACKSLASH),
        }
    }
}

impl InputState {
    /// Every binding paired with the action it raises.
    pub fn bindings_mut(&mut self) -> [(InputAction, &mut BoolState); 10] {
        [
            (InputAction::FocusUp, &mut self.focus_up),
            (InputAction::FocusDown, &mut self.focus_down),
            (InputAction::FocusLeft, &mut self.focus_left),
            (InputAction::FocusRight, &mut self.focus_right),
            (InputAction::Activate, &mut self.activate),
            (InputAction::ActivateAlt, &mut self.activate_alt),
            (InputAction::ToggleNarration, &mut self.toggle_narration),
            (InputAction::CycleColorVision, &mut self.cycle_color_vision),
            (InputAction::ToggleHighContrast, &mut self.toggle_high_contrast),
            (InputAction::ToggleOverlay, &mut self.toggle_overlay),
        ]
    }
}

/// Left mouse button state, in render-target pixels.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PointerState {
    pub pos: Vector2,
    pub pressed: bool,
    pub released: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            pos: Vector2 { x: 0.0, y: 0.0 },
            pressed: false,
            released: false,
        }
    }
}
