//! Persistent entity marker component.
//!
//! Scene transitions despawn every entity that does not carry [`Persistent`].
//! The focus glow layer, the ADA overlay panel and globally registered
//! callbacks (such as mute) are persistent; scene buttons and per-scene
//! callbacks are not.

use bevy_ecs::prelude::Component;

/// Tag component for entities that survive scene transitions.
#[derive(Component, Clone, Debug)]
pub struct Persistent;
