//! Pointer input.
//!
//! [`update_pointer_state`] maps the mouse into render-target pixels.
//! [`pointer_click_system`] hit-tests a press against, in order, the ADA
//! affordance, the overlay panel (while open) and the topmost live scene
//! element. A scene element that is in the focus list takes focus and is
//! activated exactly as a keyboard press would. A slot button outside the
//! list (the corner buttons of modal scenes) is activated without taking
//! focus. Other clickable elements get raw [`ElementInputEvent`]s.
use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::{MouseButton, Vector2};

use crate::components::focusable::Clickable;
use crate::components::overlay::{AdaAffordance, ControlLegend, OverlayPart, OverlayRow};
use crate::components::scale::Scale;
use crate::components::screenposition::ScreenPosition;
use crate::components::uielement::UiElement;
use crate::components::zindex::ZIndex;
use crate::events::focus::{ElementInputEvent, PointerPhase};
use crate::events::overlay::{OverlayCommand, OverlayCommandKind};
use crate::resources::accessibility::OverlayState;
use crate::resources::focus::FocusEngine;
use crate::resources::input::PointerState;
use crate::resources::scenesurface::SceneSurface;
use crate::resources::screensize::ScreenSize;
use crate::resources::windowsize::WindowSize;
use crate::systems::focus::{activate_and_log, activate_slot_and_log};

type SceneElements<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static UiElement,
        &'static ScreenPosition,
        Option<&'static Scale>,
        Option<&'static ZIndex>,
        Has<Clickable>,
    ),
    (
        Without<OverlayPart>,
        Without<AdaAffordance>,
        Without<ControlLegend>,
    ),
>;

pub fn update_pointer_state(
    mut pointer: ResMut<PointerState>,
    rl: NonSend<raylib::RaylibHandle>,
    window: Res<WindowSize>,
    screen: Res<ScreenSize>,
) {
    let mouse = rl.get_mouse_position();
    pointer.pos = window.window_to_game_pos(mouse, screen.w as u32, screen.h as u32);
    pointer.pressed = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
    pointer.released = rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT);
}

/// Overlay command raised by clicking `part`, if it is clickable.
pub fn overlay_command_for_part(part: OverlayPart) -> Option<OverlayCommandKind> {
    match part {
        OverlayPart::RowToggle(OverlayRow::Narration) => Some(OverlayCommandKind::ToggleNarration),
        OverlayPart::RowToggle(OverlayRow::ColorVision) => {
            Some(OverlayCommandKind::CycleColorVision)
        }
        OverlayPart::RowToggle(OverlayRow::HighContrast) => {
            Some(OverlayCommandKind::ToggleHighContrast)
        }
        OverlayPart::CloseButton => Some(OverlayCommandKind::Close),
        _ => None,
    }
}

fn hits(ui: &UiElement, pos: &ScreenPosition, scale: Option<&Scale>, point: Vector2) -> bool {
    ui.is_live() && ui.contains(pos.pos, scale.copied().unwrap_or_default().scale, point)
}

/// Topmost interactive scene element under `point`.
fn topmost(elements: &SceneElements, point: Vector2) -> Option<(Entity, bool)> {
    elements
        .iter()
        .filter(|(_, ui, pos, scale, _, _)| ui.is_interactive() && hits(ui, pos, *scale, point))
        .max_by_key(|(_, _, _, _, z, _)| z.copied().unwrap_or_default())
        .map(|(entity, _, _, _, _, clickable)| (entity, clickable))
}

#[allow(clippy::too_many_arguments)]
pub fn pointer_click_system(
    pointer: Res<PointerState>,
    overlay: Res<OverlayState>,
    mut engine: ResMut<FocusEngine>,
    surface: Option<Res<SceneSurface>>,
    mut commands: Commands,
    affordances: Query<(&UiElement, &ScreenPosition, Option<&Scale>), With<AdaAffordance>>,
    parts: Query<(&OverlayPart, &UiElement, &ScreenPosition, Option<&ZIndex>)>,
    elements: SceneElements,
) {
    if !pointer.pressed && !pointer.released {
        return;
    }
    let point = pointer.pos;

    if pointer.pressed
        && affordances
            .iter()
            .any(|(ui, pos, scale)| hits(ui, pos, scale, point))
    {
        commands.trigger(OverlayCommand::new(OverlayCommandKind::Toggle));
        return;
    }

    if overlay.is_open {
        if !pointer.pressed {
            return;
        }
        let clicked = parts
            .iter()
            .filter(|(part, ui, pos, _)| part.is_clickable() && hits(ui, pos, None, point))
            .max_by_key(|(_, _, _, z)| z.copied().unwrap_or_default())
            .and_then(|(part, _, _, _)| overlay_command_for_part(*part));
        if let Some(kind) = clicked {
            commands.trigger(OverlayCommand::new(kind));
        } else {
            debug!("overlay open, ignoring scene click");
        }
        return;
    }

    let Some((entity, clickable)) = topmost(&elements, point) else {
        return;
    };
    if pointer.pressed && engine.focus_handle(entity) {
        commands.queue(activate_and_log);
        return;
    }
    if pointer.pressed && surface.is_some_and(|s| s.slot_of(entity).is_some()) {
        commands.queue(move |world: &mut World| activate_slot_and_log(world, entity));
        return;
    }
    if !clickable || engine.elements().iter().any(|e| e.handle == entity) {
        return;
    }
    let phase = if pointer.pressed {
        PointerPhase::Down
    } else {
        PointerPhase::Up
    };
    commands.trigger(ElementInputEvent {
        element: entity,
        phase,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::focus::{FocusAction, FocusableElement};
    use crate::resources::scenesurface::{CallbackResult, Slot};
    use bevy_ecs::observer::{Observer, On};

    #[derive(Resource, Default)]
    struct Seen {
        overlay: Vec<OverlayCommandKind>,
        element: Vec<(Entity, PointerPhase)>,
        muted: usize,
    }

    fn record_overlay(trigger: On<OverlayCommand>, mut seen: ResMut<Seen>) {
        seen.overlay.push(trigger.event().kind);
    }

    fn record_element(trigger: On<ElementInputEvent>, mut seen: ResMut<Seen>) {
        let ev = trigger.event();
        seen.element.push((ev.element, ev.phase));
    }

    fn world_with(open: bool) -> World {
        let mut world = World::new();
        let mut overlay = OverlayState::default();
        overlay.is_open = open;
        world.insert_resource(overlay);
        world.insert_resource(FocusEngine::default());
        world.insert_resource(Seen::default());
        world.spawn(Observer::new(record_overlay));
        world.spawn(Observer::new(record_element));
        world.flush();
        world
    }

    fn click(world: &mut World, x: f32, y: f32) {
        world.insert_resource(PointerState {
            pos: Vector2 { x, y },
            pressed: true,
            released: false,
        });
        let mut schedule = Schedule::default();
        schedule.add_systems(pointer_click_system);
        schedule.run(world);
        world.flush();
    }

    #[test]
    fn test_affordance_toggles_overlay() {
        let mut world = world_with(false);
        world.spawn((
            UiElement::new(40.0, 40.0),
            ScreenPosition::new(30.0, 600.0),
            AdaAffordance::Icon,
        ));
        click(&mut world, 35.0, 605.0);
        assert_eq!(world.resource::<Seen>().overlay, vec![OverlayCommandKind::Toggle]);
    }

    #[test]
    fn test_open_overlay_swallows_scene_clicks() {
        let mut world = world_with(true);
        world.spawn((
            UiElement::new(100.0, 100.0),
            ScreenPosition::new(500.0, 300.0),
            Clickable,
        ));
        world.spawn((
            UiElement::new(15.0, 15.0).with_anchor(0.0, 0.0),
            ScreenPosition::new(40.0, 400.0),
            OverlayPart::RowToggle(OverlayRow::HighContrast),
        ));
        click(&mut world, 500.0, 300.0);
        assert!(world.resource::<Seen>().element.is_empty());
        click(&mut world, 45.0, 405.0);
        assert_eq!(
            world.resource::<Seen>().overlay,
            vec![OverlayCommandKind::ToggleHighContrast]
        );
    }

    #[test]
    fn test_unlisted_clickable_gets_down_signal() {
        let mut world = world_with(false);
        let region = world
            .spawn((
                UiElement::new(100.0, 100.0),
                ScreenPosition::new(500.0, 300.0),
                Clickable,
            ))
            .id();
        click(&mut world, 510.0, 290.0);
        assert_eq!(
            world.resource::<Seen>().element,
            vec![(region, PointerPhase::Down)]
        );
    }

    #[test]
    fn test_listed_element_takes_focus() {
        let mut world = world_with(false);
        let first = world
            .spawn((UiElement::new(50.0, 50.0), ScreenPosition::new(100.0, 100.0)))
            .id();
        let second = world
            .spawn((UiElement::new(50.0, 50.0), ScreenPosition::new(300.0, 100.0)))
            .id();
        world.resource_mut::<FocusEngine>().rebuild(vec![
            FocusableElement::new(first, FocusAction::Home),
            FocusableElement::new(second, FocusAction::Replay),
        ]);
        click(&mut world, 300.0, 100.0);
        assert_eq!(world.resource::<FocusEngine>().index(), 1);
    }

    fn record_mute(mut seen: ResMut<Seen>) -> CallbackResult {
        seen.muted += 1;
        Ok(())
    }

    #[test]
    fn test_slot_outside_list_activates_without_focus() {
        let mut world = world_with(false);
        let mute = world
            .spawn((UiElement::new(40.0, 40.0), ScreenPosition::new(1200.0, 60.0)))
            .id();
        let cb = world.register_system(record_mute);
        let mut surface = SceneSurface::new();
        surface.set_slot(Slot::Mute, mute);
        surface.register_global_callback("mute", cb);
        world.insert_resource(surface);

        click(&mut world, 1200.0, 60.0);
        assert_eq!(world.resource::<Seen>().muted, 1);
        assert!(world.resource::<FocusEngine>().is_empty());
        assert!(world.resource::<Seen>().element.is_empty());
    }

    #[test]
    fn test_row_toggles_map_to_commands() {
        assert_eq!(
            overlay_command_for_part(OverlayPart::RowToggle(OverlayRow::Narration)),
            Some(OverlayCommandKind::ToggleNarration)
        );
        assert_eq!(overlay_command_for_part(OverlayPart::Title), None);
    }
}
