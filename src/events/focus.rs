//! Native pointer signals for scene elements.
//!
//! Scenes that react to raw pointer input (freeform option regions, the
//! results-box next button) register an observer for [`ElementInputEvent`]
//! and filter on `element`. The pointer system triggers it on clicks; the
//! focus engine triggers it to emulate a click when the focused element has
//! no named callback.

use bevy_ecs::prelude::*;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Up,
}

/// A pointer down/up signal targeted at one element.
#[derive(Event, Debug, Clone, Copy)]
pub struct ElementInputEvent {
    pub element: Entity,
    pub phase: PointerPhase,
}
