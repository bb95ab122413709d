//! Scene transition event and observer.
//!
//! Systems request a scene change through
//! [`NextScene`](crate::resources::scene::NextScene). Triggering a
//! [`SceneChangedEvent`] makes [`observe_scene_change_event`] consume the
//! pending request and queue [`enter_scene`] as an exclusive command, so the
//! old scene is torn down and the new one built with full world access.
use crate::resources::scene::NextScene;
use crate::resources::scene::NextScenes::{Pending, Unchanged};
use crate::systems::scene::enter_scene;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

/// Apply the pending scene transition, if any.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneChangedEvent {}

pub fn observe_scene_change_event(
    _trigger: On<SceneChangedEvent>,
    mut commands: Commands,
    mut next_scene: ResMut<NextScene>,
) {
    match next_scene.get().clone() {
        Pending(name) => {
            next_scene.reset();
            commands.queue(move |world: &mut World| enter_scene(world, &name));
        }
        Unchanged => debug!("No scene change pending."),
    }
}
