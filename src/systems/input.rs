//! Input systems.
//!
//! - [`update_input_state`] reads the keyboard from Raylib each frame, writes
//!   [`InputState`] and triggers an [`InputEvent`] per press and release.
//! - [`route_input_observer`] decides where an event goes. Overlay shortcuts
//!   always reach the overlay controller. While the overlay is open every
//!   other action is dropped; otherwise arrows move focus and Enter/Space
//!   activate the focused element.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::input::{InputAction, InputEvent};
use crate::events::overlay::{OverlayCommand, OverlayCommandKind};
use crate::resources::accessibility::OverlayState;
use crate::resources::focus::{Direction, FocusEngine};
use crate::resources::input::InputState;
use crate::resources::scene::CurrentScene;
use crate::systems::focus::activate_and_log;

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    for (action, state) in input.bindings_mut() {
        let key = state.key_binding;
        state.active = rl.is_key_down(key);
        state.just_pressed = rl.is_key_pressed(key);
        state.just_released = rl.is_key_released(key);
        if state.just_pressed {
            commands.trigger(InputEvent {
                action,
                pressed: true,
            });
        }
        if state.just_released {
            commands.trigger(InputEvent {
                action,
                pressed: false,
            });
        }
    }
}

/// Overlay command raised by a shortcut key, if any.
pub fn overlay_command_for(action: InputAction) -> Option<OverlayCommandKind> {
    match action {
        InputAction::ToggleOverlay => Some(OverlayCommandKind::Toggle),
        InputAction::ToggleNarration => Some(OverlayCommandKind::ToggleNarration),
        InputAction::CycleColorVision => Some(OverlayCommandKind::CycleColorVision),
        InputAction::ToggleHighContrast => Some(OverlayCommandKind::ToggleHighContrast),
        _ => None,
    }
}

fn direction_for(action: InputAction) -> Option<Direction> {
    match action {
        InputAction::FocusUp => Some(Direction::Up),
        InputAction::FocusDown => Some(Direction::Down),
        InputAction::FocusLeft => Some(Direction::Left),
        InputAction::FocusRight => Some(Direction::Right),
        _ => None,
    }
}

pub fn route_input_observer(
    trigger: On<InputEvent>,
    mut commands: Commands,
    overlay: Res<OverlayState>,
    mut engine: ResMut<FocusEngine>,
    current: Res<CurrentScene>,
) {
    let event = trigger.event();
    if !event.pressed {
        return;
    }
    if let Some(kind) = overlay_command_for(event.action) {
        commands.trigger(OverlayCommand::new(kind));
        return;
    }
    if overlay.is_open {
        debug!("overlay open, dropping {:?}", event.action);
        return;
    }
    if let Some(direction) = direction_for(event.action) {
        if engine.navigate(current.kind(), direction) {
            debug!(
                "focus -> {} ({})",
                engine.index(),
                engine.focused().map(|e| e.action.tag()).unwrap_or("-")
            );
        }
        return;
    }
    if matches!(event.action, InputAction::Activate | InputAction::ActivateAlt) {
        commands.queue(activate_and_log);
    }
}
