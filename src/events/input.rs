//! Input action events.
//!
//! This module defines [`InputEvent`] which is triggered when a game-relevant
//! key is pressed or released. The [`InputAction`] enum lists all recognized
//! actions. The router in [`crate::systems::input`] decides whether an event
//! reaches the overlay controller or the focus engine.

use bevy_ecs::prelude::*;

/// Enumeration of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Up arrow. Previous element, or the cell above on grid scenes.
    FocusUp,
    /// Down arrow. Next element, or the cell below on grid scenes.
    FocusDown,
    /// Left arrow. Previous element, or the cell to the left on grid scenes.
    FocusLeft,
    /// Right arrow. Next element, or the cell to the right on grid scenes.
    FocusRight,
    /// Enter.
    Activate,
    /// Space.
    ActivateAlt,
    /// `T` key.
    ToggleNarration,
    /// `C` key.
    CycleColorVision,
    /// `H` key.
    ToggleHighContrast,
    /// Backslash.
    ToggleOverlay,
}

impl InputAction {
    /// Overlay shortcuts are honoured whether or not the panel is open.
    pub fn is_overlay_shortcut(&self) -> bool {
        matches!(
            self,
            InputAction::ToggleNarration
                | InputAction::CycleColorVision
                | InputAction::ToggleHighContrast
                | InputAction::ToggleOverlay
        )
    }
}

/// Event emitted when an input action is pressed or released.
#[derive(Event, Debug, Clone, Copy)]
pub struct InputEvent {
    /// The input action that triggered this event.
    pub action: InputAction,
    /// Whether the action was pressed (true) or released (false).
    pub pressed: bool,
}
