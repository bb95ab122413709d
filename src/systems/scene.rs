//! Scene transitions.
//!
//! [`check_pending_scene`] runs every frame and triggers a
//! [`SceneChangedEvent`] when a transition was requested. The observer queues
//! [`enter_scene`], which tears down every non-[`Persistent`] entity (scene
//! elements, scene observers and scene callback systems), resets the
//! [`SceneSurface`], records the new [`CurrentScene`] and runs the scene's
//! setup system.
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::persistent::Persistent;
use crate::events::scene::SceneChangedEvent;
use crate::resources::scene::{CurrentScene, NextScene, NextScenes, SceneRegistry};
use crate::resources::scenesurface::SceneSurface;

pub fn check_pending_scene(mut commands: Commands, next_scene: Res<NextScene>) {
    if let NextScenes::Pending(_) = next_scene.get() {
        commands.trigger(SceneChangedEvent {});
    }
}

/// Replace the active scene with `name`. Unknown names are logged and
/// ignored, leaving the current scene untouched.
pub fn enter_scene(world: &mut World, name: &str) {
    let Some(entry) = world
        .get_resource::<SceneRegistry>()
        .and_then(|registry| registry.get(name).copied())
    else {
        warn!("unknown scene '{}', staying put", name);
        return;
    };

    let previous = world
        .get_resource::<CurrentScene>()
        .map(|c| c.id().to_string())
        .unwrap_or_default();

    let mut doomed: Vec<Entity> = world
        .query_filtered::<Entity, Without<Persistent>>()
        .iter(world)
        .collect();
    // Observers and registered systems may be hidden from plain queries.
    if let Some(surface) = world.get_resource::<SceneSurface>() {
        doomed.extend(surface.scene_owned());
    }
    doomed.sort_unstable();
    doomed.dedup();
    for entity in doomed {
        if let Ok(entity_mut) = world.get_entity_mut(entity) {
            entity_mut.despawn();
        }
    }

    if let Some(mut surface) = world.get_resource_mut::<SceneSurface>() {
        surface.reset();
    }
    world
        .get_resource_or_insert_with(CurrentScene::new)
        .set(name, entry.kind);

    info!("Scene '{}' -> '{}' ({:?})", previous, name, entry.kind);

    if let Err(e) = world.run_system(entry.setup) {
        warn!("setup of scene '{}' failed: {}", name, e);
    }
    world.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::scene::observe_scene_change_event;
    use crate::resources::scene::SceneKind;
    use bevy_ecs::observer::{Observer, On};

    #[derive(Component)]
    struct Marker;

    fn spawn_marker(mut commands: Commands) {
        commands.spawn(Marker);
    }

    fn world_with_scene() -> World {
        let mut world = World::new();
        world.insert_resource(CurrentScene::new());
        world.insert_resource(NextScene::new());
        world.insert_resource(SceneSurface::new());
        let setup = world.register_system(spawn_marker);
        world.entity_mut(setup.entity()).insert(Persistent);
        let mut registry = SceneRegistry::new();
        registry.insert("Title", SceneKind::Linear, setup);
        world.insert_resource(registry);
        world.spawn((Observer::new(observe_scene_change_event), Persistent));
        world.flush();
        world
    }

    #[test]
    fn test_enter_scene_replaces_scene_entities() {
        let mut world = world_with_scene();
        let stray = world.spawn_empty().id();
        enter_scene(&mut world, "Title");
        assert!(world.get_entity(stray).is_err());
        let markers = world.query::<&Marker>().iter(&world).count();
        assert_eq!(markers, 1);
        assert_eq!(world.resource::<CurrentScene>().id(), "Title");
        assert_eq!(world.resource::<CurrentScene>().generation(), 1);

        enter_scene(&mut world, "Title");
        let markers = world.query::<&Marker>().iter(&world).count();
        assert_eq!(markers, 1);
        assert_eq!(world.resource::<CurrentScene>().generation(), 2);
    }

    #[test]
    fn test_scene_callbacks_and_observers_torn_down() {
        fn noop() -> crate::resources::scenesurface::CallbackResult {
            Ok(())
        }
        fn on_scene(_trigger: On<SceneChangedEvent>) {}

        let mut world = world_with_scene();
        enter_scene(&mut world, "Title");
        let callback = world.register_system(noop);
        let observer = world.spawn(Observer::new(on_scene)).id();
        {
            let mut surface = world.resource_mut::<SceneSurface>();
            surface.register_callback("play", callback);
            surface.adopt_observer(observer);
        }

        enter_scene(&mut world, "Title");
        assert!(world.get_entity(callback.entity()).is_err());
        assert!(world.get_entity(observer).is_err());
        assert!(world.resource::<SceneSurface>().callback("play").is_none());
    }

    #[test]
    fn test_unknown_scene_is_ignored() {
        let mut world = world_with_scene();
        enter_scene(&mut world, "Title");
        enter_scene(&mut world, "Nowhere");
        assert_eq!(world.resource::<CurrentScene>().id(), "Title");
    }

    #[test]
    fn test_pending_request_applied_by_schedule() {
        let mut world = world_with_scene();
        world.resource_mut::<NextScene>().set("Title");
        let mut schedule = Schedule::default();
        schedule.add_systems(check_pending_scene);
        schedule.run(&mut world);
        assert_eq!(world.resource::<CurrentScene>().id(), "Title");
        assert_eq!(world.resource::<NextScene>().get(), &NextScenes::Unchanged);
    }
}
