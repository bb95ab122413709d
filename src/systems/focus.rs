//! Focus engine systems: polling, discovery and activation.
//!
//! [`focus_poll_system`] advances the poll timer. On each tick it compares
//! the active scene's identity, content-changed signal and modal watch with
//! the previous tick and rebuilds the focus list through [`discover`] when
//! any of them changed.
//!
//! [`activate_focused`] dispatches the focused element's action. It is the
//! activation boundary: every failure comes back as an [`ActivationError`]
//! and [`activate_and_log`] turns it into a log line, leaving engine state
//! untouched.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use thiserror::Error;

use crate::components::focusable::{ChoiceButton, Clickable, FreeformOption};
use crate::components::uielement::UiElement;
use crate::events::focus::{ElementInputEvent, PointerPhase};
use crate::resources::audio::BLOOP_SFX;
use crate::resources::focus::{FocusAction, FocusEngine, FocusableElement, WatchSnapshot};
use crate::resources::scene::{CurrentScene, GameSelection, NextScene, SceneKind};
use crate::resources::scenesurface::{SceneSurface, Slot};
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::play_fx;

/// Scene entered by the pause button.
pub const PAUSE_SCENE: &str = "PauseState";
/// Scene entered after answering the choice-list question.
pub const RAIN_SCENE: &str = "PPRainState";

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("no callback registered for '{0}'")]
    MissingCallback(String),

    #[error("callback '{name}' failed: {reason}")]
    CallbackFailed { name: String, reason: String },

    #[error("element '{0}' has no input signal to emulate")]
    NoInputSignal(&'static str),

    #[error("focused element '{0}' is no longer live")]
    StaleElement(&'static str),

    #[error("callback system could not run: {0}")]
    SystemRun(String),
}

fn is_live(ui: &Query<&UiElement>, entity: Entity) -> bool {
    ui.get(entity).is_ok_and(UiElement::is_live)
}

/// Build the ordered focus list the active scene exposes.
pub fn discover(
    kind: SceneKind,
    surface: &SceneSurface,
    ui: &Query<&UiElement>,
    freeform: &Query<(Entity, &FreeformOption)>,
    choices: &Query<(Entity, &ChoiceButton)>,
) -> Vec<FocusableElement> {
    let mut found = Vec::new();
    match kind {
        SceneKind::Linear | SceneKind::PauseGrid => {
            found.extend(Slot::DISCOVERY_ORDER.iter().filter_map(|slot| {
                surface
                    .slot(*slot)
                    .filter(|e| is_live(ui, *e))
                    .map(|e| FocusableElement::new(e, slot.action()))
            }));
        }
        // Modal scenes expose one branch only; their corner buttons stay
        // pointer-only.
        SceneKind::FindAndFix => {
            if surface.results_open {
                if let Some(next) = surface.modal.results_next.filter(|e| is_live(ui, *e)) {
                    found.push(FocusableElement::new(next, FocusAction::FfNext));
                }
            } else if surface.question_open {
                let buttons = [
                    (surface.modal.fix_it, FocusAction::FfFixIt),
                    (surface.modal.its_ok, FocusAction::FfItsOk),
                ];
                for (button, action) in buttons {
                    if let Some(e) = button.filter(|e| is_live(ui, *e)) {
                        found.push(FocusableElement::new(e, action));
                    }
                }
            } else {
                let mut options: Vec<(usize, Entity)> = freeform
                    .iter()
                    .filter(|(e, _)| ui.get(*e).is_ok_and(UiElement::is_interactive))
                    .map(|(e, opt)| (opt.index, e))
                    .collect();
                options.sort_by_key(|(index, _)| *index);
                found.extend(
                    options
                        .into_iter()
                        .map(|(index, e)| FocusableElement::with_option(e, FocusAction::FfOption, index)),
                );
            }
        }
        SceneKind::ChoiceList => {
            let mut buttons: Vec<(usize, usize, Entity)> = choices
                .iter()
                .filter(|(e, _)| is_live(ui, *e))
                .map(|(e, b)| (b.order, b.option_index, e))
                .collect();
            buttons.sort_by_key(|(order, _, _)| *order);
            found.extend(
                buttons
                    .into_iter()
                    .map(|(_, option, e)| FocusableElement::with_option(e, FocusAction::PpChoice, option)),
            );
        }
    }
    found
}

/// Secondary visibility state of the scene.
pub fn watch_snapshot(surface: &SceneSurface, ui: &Query<&UiElement>) -> WatchSnapshot {
    WatchSnapshot {
        results_open: surface.results_open,
        question_open: surface.question_open,
        results_next_visible: surface
            .modal
            .results_next
            .and_then(|e| ui.get(e).ok())
            .is_some_and(|u| u.visible),
    }
}

/// Poll the active scene and rediscover the focus list when it changed.
pub fn focus_poll_system(
    time: Res<WorldTime>,
    mut engine: ResMut<FocusEngine>,
    current: Res<CurrentScene>,
    mut surface: ResMut<SceneSurface>,
    ui: Query<&UiElement>,
    freeform: Query<(Entity, &FreeformOption)>,
    choices: Query<(Entity, &ChoiceButton)>,
) {
    if !engine.tick(time.delta) {
        return;
    }
    let watch = watch_snapshot(&surface, &ui);
    let content_changed = surface.take_content_changed();
    if engine.needs_rediscovery(current.generation(), watch, content_changed) {
        let elements = discover(current.kind(), &surface, &ui, &freeform, &choices);
        debug!(
            "scene '{}' exposes {} focusable elements",
            current.id(),
            elements.len()
        );
        engine.rebuild(elements);
    }
}

fn run_callback(world: &mut World, name: &str, global: bool) -> Result<(), ActivationError> {
    let id = world
        .get_resource::<SceneSurface>()
        .and_then(|surface| {
            if global {
                surface.global_callback(name)
            } else {
                surface.callback(name)
            }
        })
        .ok_or_else(|| ActivationError::MissingCallback(name.to_string()))?;

    world
        .run_system(id)
        .map_err(|e| ActivationError::SystemRun(e.to_string()))?
        .map_err(|reason| ActivationError::CallbackFailed {
            name: name.to_string(),
            reason,
        })
}

fn emulate_input(
    world: &mut World,
    element: &FocusableElement,
    phase: PointerPhase,
) -> Result<(), ActivationError> {
    if world.get::<Clickable>(element.handle).is_none() {
        return Err(ActivationError::NoInputSignal(element.action.tag()));
    }
    world.trigger(ElementInputEvent {
        element: element.handle,
        phase,
    });
    Ok(())
}

/// Dispatch the focused element's action. An empty list is a no-op.
pub fn activate_focused(world: &mut World) -> Result<(), ActivationError> {
    let Some(element) = world
        .get_resource::<FocusEngine>()
        .and_then(|engine| engine.focused().copied())
    else {
        return Ok(());
    };
    activate_element(world, element)
}

/// Dispatch the action of the slot `entity` is registered in, without
/// moving focus. Used for clicks on buttons outside the focus list.
pub fn activate_slot(world: &mut World, entity: Entity) -> Result<(), ActivationError> {
    let Some(slot) = world
        .get_resource::<SceneSurface>()
        .and_then(|surface| surface.slot_of(entity))
    else {
        return Ok(());
    };
    activate_element(world, FocusableElement::new(entity, slot.action()))
}

fn activate_element(world: &mut World, element: FocusableElement) -> Result<(), ActivationError> {
    if !world
        .get::<UiElement>(element.handle)
        .is_some_and(UiElement::is_live)
    {
        return Err(ActivationError::StaleElement(element.action.tag()));
    }
    debug!("activating '{}'", element.action.tag());

    match element.action {
        FocusAction::Play
        | FocusAction::ChooseFf
        | FocusAction::ChoosePp
        | FocusAction::Home
        | FocusAction::Replay
        | FocusAction::Resume
        | FocusAction::Restart
        | FocusAction::Level1
        | FocusAction::Level2
        | FocusAction::Level3 => run_callback(world, element.action.tag(), false),
        FocusAction::Mute => run_callback(world, "mute", true),
        FocusAction::Next => {
            if world
                .get_resource::<SceneSurface>()
                .is_some_and(|s| s.callback("next").is_some())
            {
                run_callback(world, "next", false)
            } else {
                emulate_input(world, &element, PointerPhase::Up)
            }
        }
        FocusAction::Pause => {
            play_fx(world, BLOOP_SFX);
            let current = world
                .get_resource::<CurrentScene>()
                .map(|c| c.id().to_string());
            if let Some(mut selection) = world.get_resource_mut::<GameSelection>() {
                selection.last_scene = current;
            }
            if let Some(mut next) = world.get_resource_mut::<NextScene>() {
                next.set(PAUSE_SCENE);
            }
            Ok(())
        }
        FocusAction::FfOption => emulate_input(world, &element, PointerPhase::Down),
        FocusAction::FfFixIt => {
            play_fx(world, BLOOP_SFX);
            run_callback(world, "fix_it", false)
        }
        FocusAction::FfItsOk => {
            play_fx(world, BLOOP_SFX);
            run_callback(world, "its_ok", false)
        }
        FocusAction::FfNext => {
            play_fx(world, BLOOP_SFX);
            run_callback(world, "close_result", false)
        }
        FocusAction::PpChoice => {
            let option = element
                .option_index
                .ok_or(ActivationError::NoInputSignal(element.action.tag()))?;
            if let Some(mut selection) = world.get_resource_mut::<GameSelection>() {
                selection.choose(option);
            }
            play_fx(world, BLOOP_SFX);
            if let Some(mut next) = world.get_resource_mut::<NextScene>() {
                next.set(RAIN_SCENE);
            }
            Ok(())
        }
    }
}

/// Activation boundary: run [`activate_focused`] and log any failure.
pub fn activate_and_log(world: &mut World) {
    log_activation(activate_focused(world));
}

/// Activation boundary for [`activate_slot`].
pub fn activate_slot_and_log(world: &mut World, entity: Entity) {
    log_activation(activate_slot(world, entity));
}

fn log_activation(result: Result<(), ActivationError>) {
    match result {
        Ok(()) => {}
        Err(e @ ActivationError::StaleElement(_)) => debug!("activation skipped: {}", e),
        Err(e) => warn!("activation failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::persistent::Persistent;
    use crate::resources::scenesurface::CallbackResult;

    #[derive(Resource, Default)]
    struct Calls(Vec<&'static str>);

    fn play_cb(mut calls: ResMut<Calls>) -> CallbackResult {
        calls.0.push("play");
        Ok(())
    }

    fn failing_cb() -> CallbackResult {
        Err("boom".to_string())
    }

    fn base_world() -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(FocusEngine::new(0.1));
        world.insert_resource(CurrentScene::new());
        world.insert_resource(NextScene::new());
        world.insert_resource(SceneSurface::new());
        world.insert_resource(GameSelection::default());
        world.insert_resource(Calls::default());
        world
    }

    fn poll(world: &mut World) {
        world.resource_mut::<WorldTime>().delta = 0.2;
        let mut schedule = Schedule::default();
        schedule.add_systems(focus_poll_system);
        schedule.run(world);
    }

    #[test]
    fn test_slots_discovered_in_fixed_order() {
        let mut world = base_world();
        world.resource_mut::<CurrentScene>().set("Title", SceneKind::Linear);
        let mute = world.spawn(UiElement::new(40.0, 40.0)).id();
        let play = world.spawn(UiElement::new(80.0, 80.0)).id();
        let hidden = world.spawn(UiElement::new(80.0, 80.0).hidden()).id();
        {
            let mut surface = world.resource_mut::<SceneSurface>();
            surface.set_slot(Slot::Mute, mute);
            surface.set_slot(Slot::Play, play);
            surface.set_slot(Slot::Home, hidden);
        }
        poll(&mut world);
        let engine = world.resource::<FocusEngine>();
        let actions: Vec<FocusAction> = engine.elements().iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![FocusAction::Play, FocusAction::Mute]);
    }

    #[test]
    fn test_find_and_fix_exposes_one_branch() {
        let mut world = base_world();
        world
            .resource_mut::<CurrentScene>()
            .set("FFGameState", SceneKind::FindAndFix);
        let opt_b = world
            .spawn((UiElement::new(50.0, 50.0), FreeformOption { index: 1 }))
            .id();
        let opt_a = world
            .spawn((UiElement::new(50.0, 50.0), FreeformOption { index: 0 }))
            .id();
        let mut disabled = UiElement::new(50.0, 50.0);
        disabled.enabled = false;
        world.spawn((disabled, FreeformOption { index: 2 }));
        let fix = world.spawn(UiElement::new(60.0, 30.0)).id();
        let ok = world.spawn(UiElement::new(60.0, 30.0)).id();
        let mute = world.spawn(UiElement::new(40.0, 40.0)).id();
        let pause = world.spawn(UiElement::new(40.0, 40.0)).id();
        {
            let mut surface = world.resource_mut::<SceneSurface>();
            surface.modal.fix_it = Some(fix);
            surface.modal.its_ok = Some(ok);
            surface.set_slot(Slot::Mute, mute);
            surface.set_slot(Slot::Pause, pause);
        }

        poll(&mut world);
        let handles: Vec<Entity> = world
            .resource::<FocusEngine>()
            .elements()
            .iter()
            .map(|e| e.handle)
            .collect();
        assert_eq!(handles, vec![opt_a, opt_b]);

        world.resource_mut::<SceneSurface>().question_open = true;
        poll(&mut world);
        let actions: Vec<FocusAction> = world
            .resource::<FocusEngine>()
            .elements()
            .iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, vec![FocusAction::FfFixIt, FocusAction::FfItsOk]);
        assert_eq!(
            world.resource::<FocusEngine>().focused().map(|e| e.action),
            Some(FocusAction::FfFixIt)
        );
    }

    #[test]
    fn test_choice_buttons_in_display_order() {
        let mut world = base_world();
        world
            .resource_mut::<CurrentScene>()
            .set("PPQuestionState", SceneKind::ChoiceList);
        let mute = world.spawn(UiElement::new(40.0, 40.0)).id();
        world.resource_mut::<SceneSurface>().set_slot(Slot::Mute, mute);
        world.spawn((
            UiElement::new(100.0, 40.0),
            ChoiceButton { order: 1, option_index: 0 },
        ));
        world.spawn((
            UiElement::new(100.0, 40.0),
            ChoiceButton { order: 0, option_index: 2 },
        ));
        poll(&mut world);
        let options: Vec<Option<usize>> = world
            .resource::<FocusEngine>()
            .elements()
            .iter()
            .map(|e| e.option_index)
            .collect();
        assert_eq!(options, vec![Some(2), Some(0)]);
    }

    #[test]
    fn test_unchanged_scene_keeps_focus() {
        let mut world = base_world();
        world.resource_mut::<CurrentScene>().set("Title", SceneKind::Linear);
        let play = world.spawn(UiElement::new(80.0, 80.0)).id();
        let mute = world.spawn(UiElement::new(40.0, 40.0)).id();
        world.resource_mut::<SceneSurface>().set_slot(Slot::Play, play);
        world.resource_mut::<SceneSurface>().set_slot(Slot::Mute, mute);
        poll(&mut world);
        world.resource_mut::<FocusEngine>().move_linear(true);
        poll(&mut world);
        assert_eq!(world.resource::<FocusEngine>().index(), 1);

        world.resource_mut::<SceneSurface>().signal_content_changed();
        poll(&mut world);
        assert_eq!(world.resource::<FocusEngine>().index(), 0);
    }

    #[test]
    fn test_activation_runs_named_callback() {
        let mut world = base_world();
        world.resource_mut::<CurrentScene>().set("Title", SceneKind::Linear);
        let play = world.spawn(UiElement::new(80.0, 80.0)).id();
        let cb = world.register_system(play_cb);
        world.resource_mut::<SceneSurface>().set_slot(Slot::Play, play);
        world.resource_mut::<SceneSurface>().register_callback("play", cb);
        poll(&mut world);
        activate_focused(&mut world).expect("play activates");
        assert_eq!(world.resource::<Calls>().0, vec!["play"]);
    }

    #[test]
    fn test_activation_faults_are_isolated() {
        let mut world = base_world();
        world.resource_mut::<CurrentScene>().set("Title", SceneKind::Linear);
        let play = world.spawn(UiElement::new(80.0, 80.0)).id();
        let replay = world.spawn(UiElement::new(80.0, 80.0)).id();
        let cb = world.register_system(failing_cb);
        world.resource_mut::<SceneSurface>().set_slot(Slot::Play, play);
        world.resource_mut::<SceneSurface>().set_slot(Slot::Replay, replay);
        world.resource_mut::<SceneSurface>().register_callback("play", cb);
        poll(&mut world);

        let err = activate_focused(&mut world).expect_err("callback fails");
        assert!(matches!(err, ActivationError::CallbackFailed { .. }));
        world.resource_mut::<FocusEngine>().move_linear(true);
        let err = activate_focused(&mut world).expect_err("no replay callback");
        assert!(matches!(err, ActivationError::MissingCallback(ref n) if n == "replay"));
        activate_and_log(&mut world);
        assert_eq!(world.resource::<FocusEngine>().index(), 1);
        assert_eq!(world.resource::<FocusEngine>().len(), 2);
    }

    #[test]
    fn test_pause_remembers_scene_and_requests_pause() {
        let mut world = base_world();
        world
            .resource_mut::<CurrentScene>()
            .set("FFGameState", SceneKind::FindAndFix);
        let pause = world.spawn((UiElement::new(40.0, 40.0), Persistent)).id();
        world.resource_mut::<SceneSurface>().set_slot(Slot::Pause, pause);
        poll(&mut world);
        assert!(world.resource::<FocusEngine>().is_empty());
        activate_slot(&mut world, pause).expect("pause activates");
        assert!(world.resource::<FocusEngine>().is_empty());
        assert_eq!(
            world.resource::<GameSelection>().last_scene.as_deref(),
            Some("FFGameState")
        );
        assert_eq!(
            world.resource::<NextScene>().get(),
            &crate::resources::scene::NextScenes::Pending(PAUSE_SCENE.to_string())
        );
    }

    #[test]
    fn test_choice_updates_selection() {
        let mut world = base_world();
        world
            .resource_mut::<CurrentScene>()
            .set("PPQuestionState", SceneKind::ChoiceList);
        world.resource_mut::<GameSelection>().score_locked = true;
        world.resource_mut::<GameSelection>().option_order = vec![1, 0];
        world.spawn((
            UiElement::new(100.0, 40.0),
            ChoiceButton { order: 0, option_index: 1 },
        ));
        poll(&mut world);
        activate_focused(&mut world).expect("choice activates");
        let selection = world.resource::<GameSelection>();
        assert_eq!(selection.chosen_option, Some(1));
        assert!(!selection.score_locked);
        assert!(selection.option_order.is_empty());
    }

    #[test]
    fn test_stale_focus_is_skipped() {
        let mut world = base_world();
        world.resource_mut::<CurrentScene>().set("Title", SceneKind::Linear);
        let play = world.spawn(UiElement::new(80.0, 80.0)).id();
        world.resource_mut::<SceneSurface>().set_slot(Slot::Play, play);
        poll(&mut world);
        world.get_mut::<UiElement>(play).expect("spawned").visible = false;
        assert!(matches!(
            activate_focused(&mut world),
            Err(ActivationError::StaleElement(_))
        ));
    }

    #[test]
    fn test_unregistered_entity_slot_activation_is_noop() {
        let mut world = base_world();
        let stray = world.spawn(UiElement::new(40.0, 40.0)).id();
        assert!(activate_slot(&mut world, stray).is_ok());
        assert_eq!(
            world.resource::<NextScene>().get(),
            &crate::resources::scene::NextScenes::Unchanged
        );
    }

    #[test]
    fn test_empty_list_activation_is_noop() {
        let mut world = base_world();
        assert!(activate_focused(&mut world).is_ok());
    }
}
