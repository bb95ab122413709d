//! Accessibility overlay commands.
//!
//! Keyboard shortcuts and pointer clicks on overlay affordances are turned
//! into [`OverlayCommand`] events. The observer lives in
//! [`crate::systems::overlay`].

use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommandKind {
    /// Flip the panel between open and closed.
    Toggle,
    /// Close the panel (close affordance). No-op when already closed.
    Close,
    ToggleNarration,
    CycleColorVision,
    ToggleHighContrast,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct OverlayCommand {
    pub kind: OverlayCommandKind,
}

impl OverlayCommand {
    pub fn new(kind: OverlayCommandKind) -> Self {
        Self { kind }
    }
}
