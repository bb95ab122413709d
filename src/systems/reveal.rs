//! Delayed element reveal.
//!
//! Elements spawned hidden with a [`RevealAfter`] become visible once their
//! delay elapses. The scene surface is told its content changed so the next
//! focus poll picks the element up.
use bevy_ecs::prelude::*;

use crate::components::focusable::RevealAfter;
use crate::components::uielement::UiElement;
use crate::resources::scenesurface::SceneSurface;
use crate::resources::worldtime::WorldTime;

pub fn reveal_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut surface: ResMut<SceneSurface>,
    mut query: Query<(Entity, &mut RevealAfter, &mut UiElement)>,
) {
    let mut revealed = false;
    for (entity, mut reveal, mut ui) in query.iter_mut() {
        if reveal.tick(time.delta) {
            ui.visible = true;
            commands.entity(entity).remove::<RevealAfter>();
            revealed = true;
        }
    }
    if revealed {
        surface.signal_content_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_revealed_after_delay() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.3,
            ..Default::default()
        });
        world.insert_resource(SceneSurface::new());
        let next = world
            .spawn((UiElement::new(10.0, 10.0).hidden(), RevealAfter::new(0.5)))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(reveal_system);

        schedule.run(&mut world);
        assert!(!world.get::<UiElement>(next).is_some_and(|ui| ui.visible));
        assert!(!world.resource_mut::<SceneSurface>().take_content_changed());

        schedule.run(&mut world);
        assert!(world.get::<UiElement>(next).is_some_and(|ui| ui.visible));
        assert!(world.get::<RevealAfter>(next).is_none());
        assert!(world.resource_mut::<SceneSurface>().take_content_changed());
    }
}
