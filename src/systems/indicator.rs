//! Focus indicator drawing.
//!
//! The indicator lives on a single persistent glow entity. Every frame the
//! layer is cleared and, when the focused element is still live, redrawn
//! around its current bounds, so the glow follows buttons that move or
//! breathe. A ping-pong alpha pulse is attached whenever none is running.
use bevy_ecs::prelude::*;

use crate::components::focusglow::{FocusGlow, IndicatorState};
use crate::components::opacity::Opacity;
use crate::components::persistent::Persistent;
use crate::components::scale::Scale;
use crate::components::screenposition::ScreenPosition;
use crate::components::tween::{Easing, LoopMode, TweenAlpha};
use crate::components::uielement::UiElement;
use crate::resources::focus::FocusEngine;

/// The pulse the glow layer carries: 0.8 → 0.5 over 800 ms, forever.
pub fn glow_pulse() -> TweenAlpha {
    TweenAlpha::new(0.8, 0.5, 0.8)
        .with_easing(Easing::SineInOut)
        .with_loop_mode(LoopMode::PingPong)
}

/// Indicator geometry for `entity`, or `None` when it is gone or not live.
pub fn indicator_for(
    elements: &Query<(&UiElement, &ScreenPosition, Option<&Scale>), Without<FocusGlow>>,
    engine: &FocusEngine,
) -> Option<IndicatorState> {
    let focused = engine.focused()?;
    let (ui, pos, scale) = elements.get(focused.handle).ok()?;
    if !ui.is_live() {
        return None;
    }
    let scale = scale.copied().unwrap_or_default().scale;
    let bounds = ui.bounds(pos.pos, scale);
    Some(IndicatorState::for_element(
        focused.action,
        ui.tex_key.as_deref(),
        bounds,
    ))
}

pub fn focus_indicator_system(
    mut commands: Commands,
    mut engine: ResMut<FocusEngine>,
    elements: Query<(&UiElement, &ScreenPosition, Option<&Scale>), Without<FocusGlow>>,
    mut glows: Query<(&mut FocusGlow, Option<&TweenAlpha>)>,
) {
    let glow = engine.glow().filter(|e| glows.contains(*e));
    let Some(glow) = glow else {
        let id = commands
            .spawn((FocusGlow::default(), Opacity::default(), glow_pulse(), Persistent))
            .id();
        engine.set_glow(id);
        return;
    };
    let Ok((mut layer, tween)) = glows.get_mut(glow) else {
        return;
    };

    let state = indicator_for(&elements, &engine);
    match state {
        Some(state) => layer.draw(&state),
        None => {
            if !layer.is_empty() {
                layer.clear();
            }
            return;
        }
    }

    if !tween.is_some_and(TweenAlpha::is_running) {
        commands.entity(glow).insert(glow_pulse());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::focusglow::{IndicatorShape, Outline};
    use crate::resources::focus::{FocusAction, FocusableElement};
    use crate::resources::worldtime::WorldTime;
    use crate::systems::tween::tween_alpha_system;

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(focus_indicator_system);
        schedule.run(world);
    }

    fn glow_layer(world: &mut World) -> FocusGlow {
        let glow = world.resource::<FocusEngine>().glow().expect("glow spawned");
        world.get::<FocusGlow>(glow).cloned().expect("glow has layer")
    }

    #[test]
    fn test_glow_spawned_once_and_cleared_on_empty_list() {
        let mut world = World::new();
        world.insert_resource(FocusEngine::default());
        run(&mut world);
        run(&mut world);
        assert!(glow_layer(&mut world).is_empty());
        let count = world.query::<&FocusGlow>().iter(&world).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_round_button_gets_circle_around_scaled_bounds() {
        let mut world = World::new();
        world.insert_resource(FocusEngine::default());
        let play = world
            .spawn((
                UiElement::new(100.0, 100.0),
                ScreenPosition::new(200.0, 200.0),
                Scale::uniform(1.2),
            ))
            .id();
        world
            .resource_mut::<FocusEngine>()
            .rebuild(vec![FocusableElement::new(play, FocusAction::Play)]);
        run(&mut world);
        run(&mut world);
        let layer = glow_layer(&mut world);
        assert_eq!(layer.strokes.len(), 4);
        match layer.strokes[3].outline {
            Outline::Circle { center, radius } => {
                assert!((center.x - 200.0).abs() < 1e-4);
                assert!((radius - (60.0 + 4.0)).abs() < 1e-4);
            }
            other => panic!("expected circle, got {:?}", other),
        }
        let state = IndicatorState::for_element(
            FocusAction::Play,
            None,
            UiElement::new(100.0, 100.0).bounds(
                raylib::prelude::Vector2 { x: 200.0, y: 200.0 },
                raylib::prelude::Vector2 { x: 1.2, y: 1.2 },
            ),
        );
        assert_eq!(state.shape, IndicatorShape::Circle);
    }

    #[test]
    fn test_running_pulse_survives_redraws() {
        let mut world = World::new();
        world.insert_resource(FocusEngine::default());
        world.insert_resource(WorldTime {
            delta: 0.1,
            ..Default::default()
        });
        let play = world
            .spawn((UiElement::new(100.0, 100.0), ScreenPosition::new(200.0, 200.0)))
            .id();
        world
            .resource_mut::<FocusEngine>()
            .rebuild(vec![FocusableElement::new(play, FocusAction::Play)]);

        let mut schedule = Schedule::default();
        schedule.add_systems((tween_alpha_system, focus_indicator_system).chain());
        for _ in 0..4 {
            schedule.run(&mut world);
        }

        let glow = world.resource::<FocusEngine>().glow().expect("glow spawned");
        let time = world.get::<TweenAlpha>(glow).map(|t| t.time).unwrap_or_default();
        // Spawned on the first run, advanced on the three after it.
        assert!((time - 0.3).abs() < 1e-4);
        assert!(!glow_layer(&mut world).is_empty());
    }

    #[test]
    fn test_dead_focus_clears_layer() {
        let mut world = World::new();
        world.insert_resource(FocusEngine::default());
        let next = world
            .spawn((UiElement::new(120.0, 40.0), ScreenPosition::new(50.0, 50.0)))
            .id();
        world
            .resource_mut::<FocusEngine>()
            .rebuild(vec![FocusableElement::new(next, FocusAction::Next)]);
        run(&mut world);
        run(&mut world);
        assert!(!glow_layer(&mut world).is_empty());
        world.get_mut::<UiElement>(next).expect("spawned").alive = false;
        run(&mut world);
        assert!(glow_layer(&mut world).is_empty());
    }
}
