//! Accessibility overlay controller.
//!
//! [`spawn_overlay`] creates the ADA affordance, the control legend and the
//! hidden panel once at startup, all [`Persistent`]. Keyboard shortcuts and
//! pointer clicks raise [`OverlayCommand`]s that [`overlay_command_observer`]
//! applies to [`OverlayState`], the narrator and the panel rows.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;
use raylib::prelude::Color;

use crate::components::overlay::{AdaAffordance, ControlLegend, OverlayPart, OverlayRow};
use crate::components::persistent::Persistent;
use crate::components::screenposition::ScreenPosition;
use crate::components::uielement::UiElement;
use crate::components::zindex::{AFFORDANCE_Z, OVERLAY_Z, ZIndex};
use crate::events::audio::AudioCmd;
use crate::events::overlay::{OverlayCommand, OverlayCommandKind};
use crate::resources::accessibility::{ColorVisionMode, OverlayState};
use crate::resources::audio::BLOOP_SFX;
use crate::resources::gameconfig::GameConfig;
use crate::resources::narration::{Narrator, SpeakOptions};
use crate::resources::screensize::ScreenSize;

pub const OVERLAY_GREEN: Color = Color::new(0x28, 0xA7, 0x45, 255);
pub const ACTIVE_RED: Color = Color::new(0xFF, 0x44, 0x44, 255);
pub const INACTIVE_GRAY: Color = Color::new(0x66, 0x66, 0x66, 255);

pub const OPENED_ANNOUNCEMENT: &str = "Accessibility menu opened. Use T for text to speech, C for colorblind support, H for high contrast";
pub const CLOSED_ANNOUNCEMENT: &str = "Accessibility menu closed";

const LEGEND_TEXT: &str = "Arrows: move   Enter/Space: select   \\: accessibility menu";

/// Whether `row` is currently switched on.
pub fn row_active(state: &OverlayState, row: OverlayRow) -> bool {
    match row {
        OverlayRow::Narration => state.speech_enabled,
        OverlayRow::ColorVision => state.color_vision.is_active(),
        OverlayRow::HighContrast => state.high_contrast,
    }
}

/// Status text shown at the right end of `row`.
pub fn row_status(state: &OverlayState, row: OverlayRow) -> String {
    match row {
        OverlayRow::ColorVision => state.color_vision.name().to_string(),
        _ if row_active(state, row) => "ON".to_string(),
        _ => "OFF".to_string(),
    }
}

/// Re-render the toggle box and status text of one row.
fn refresh_row(state: &OverlayState, row: OverlayRow, parts: &mut Query<(&OverlayPart, &mut UiElement)>) {
    let active = row_active(state, row);
    for (part, mut ui) in parts.iter_mut() {
        match *part {
            OverlayPart::RowToggle(r) if r == row => {
                ui.fill = if active { ACTIVE_RED } else { Color::BLACK };
            }
            OverlayPart::RowStatus(r) if r == row => {
                ui.label = Some(row_status(state, row));
                ui.text_color = if active { ACTIVE_RED } else { INACTIVE_GRAY };
            }
            _ => {}
        }
    }
}

fn set_panel_visible(visible: bool, parts: &mut Query<(&OverlayPart, &mut UiElement)>) {
    for (_, mut ui) in parts.iter_mut() {
        ui.visible = visible;
    }
}

fn announce(narrator: &mut Option<ResMut<Narrator>>, text: &str) {
    if let Some(narrator) = narrator.as_mut() {
        narrator.speak(text, SpeakOptions::default());
    }
}

fn color_vision_announcement(mode: ColorVisionMode) -> String {
    if mode.is_active() {
        format!("Colorblind support: {}", mode.name())
    } else {
        "Colorblind support disabled".to_string()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn overlay_command_observer(
    trigger: On<OverlayCommand>,
    mut state: ResMut<OverlayState>,
    mut narrator: Option<ResMut<Narrator>>,
    mut audio: Option<ResMut<Messages<AudioCmd>>>,
    mut config: Option<ResMut<GameConfig>>,
    mut parts: Query<(&OverlayPart, &mut UiElement)>,
    mut legends: Query<&mut UiElement, (With<ControlLegend>, Without<OverlayPart>)>,
) {
    let kind = trigger.event().kind;
    let changed_row = match kind {
        OverlayCommandKind::Toggle | OverlayCommandKind::Close => {
            if kind == OverlayCommandKind::Close && !state.is_open {
                return;
            }
            let open = state.toggle_open();
            set_panel_visible(open, &mut parts);
            announce(
                &mut narrator,
                if open { OPENED_ANNOUNCEMENT } else { CLOSED_ANNOUNCEMENT },
            );
            info!("accessibility menu {}", if open { "opened" } else { "closed" });
            None
        }
        OverlayCommandKind::ToggleNarration => {
            let wanted = state.toggle_speech();
            if let Some(narrator) = narrator.as_mut() {
                narrator.set_enabled(wanted);
                state.speech_enabled = narrator.is_enabled();
            }
            if state.speech_enabled {
                announce(&mut narrator, "Text to speech enabled");
            }
            info!("text to speech {}", if state.speech_enabled { "on" } else { "off" });
            Some(OverlayRow::Narration)
        }
        OverlayCommandKind::CycleColorVision => {
            let mode = state.cycle_color_vision();
            for mut legend in legends.iter_mut() {
                legend.fill = mode.legend_background();
            }
            announce(&mut narrator, &color_vision_announcement(mode));
            info!("color vision {} filter={}", mode.name(), state.filter().css());
            Some(OverlayRow::ColorVision)
        }
        OverlayCommandKind::ToggleHighContrast => {
            let on = state.toggle_high_contrast();
            announce(
                &mut narrator,
                if on { "High contrast enabled" } else { "High contrast disabled" },
            );
            info!("high contrast {} filter={}", on, state.filter().css());
            Some(OverlayRow::HighContrast)
        }
    };

    if let Some(row) = changed_row {
        refresh_row(&state, row, &mut parts);
        if let Some(config) = config.as_mut() {
            config.store_preferences(&state);
        }
    }
    if let Some(audio) = audio.as_mut() {
        audio.write(AudioCmd::PlayFx {
            id: BLOOP_SFX.to_string(),
        });
    }
}

/// Spawn the ADA affordance, the control legend and the (hidden) panel.
pub fn spawn_overlay(world: &mut World) {
    let (w, h) = world
        .get_resource::<ScreenSize>()
        .map(|s| (s.w as f32, s.h as f32))
        .unwrap_or((1280.0, 720.0));
    let state = world
        .get_resource::<OverlayState>()
        .cloned()
        .unwrap_or_default();
    let green_fill = Color::new(0x28, 0xA7, 0x45, 230);

    world.spawn((
        UiElement::new(40.0, 40.0)
            .with_round(true)
            .with_fill(green_fill)
            .with_label("ADA")
            .with_text_style(Color::WHITE, 14),
        ScreenPosition::fraction(0.03, 0.89, w, h),
        ZIndex(AFFORDANCE_Z),
        AdaAffordance::Icon,
        Persistent,
    ));
    world.spawn((
        UiElement::new(90.0, 16.0)
            .with_fill(Color::BLANK)
            .with_label("ADA Menu")
            .with_text_style(OVERLAY_GREEN, 14),
        ScreenPosition::new(0.03 * w, 0.89 * h + 30.0),
        ZIndex(AFFORDANCE_Z),
        AdaAffordance::Label,
        Persistent,
    ));
    world.spawn((
        UiElement::new(w, 28.0)
            .with_anchor(0.5, 1.0)
            .with_fill(state.color_vision.legend_background())
            .with_label(LEGEND_TEXT)
            .with_text_style(Color::WHITE, 14),
        ScreenPosition::new(0.5 * w, h),
        ZIndex(AFFORDANCE_Z - 1),
        ControlLegend,
        Persistent,
    ));

    let panel = |part: OverlayPart, ui: UiElement, pos: ScreenPosition, z: i32| {
        (ui.hidden(), pos, ZIndex(OVERLAY_Z + z), part, Persistent)
    };

    let (px, py, pw, ph) = (0.02 * w, 0.55 * h, 0.28 * w, 0.28 * h);
    world.spawn(panel(
        OverlayPart::Background,
        UiElement::new(pw, ph)
            .with_anchor(0.0, 0.0)
            .with_fill(Color::new(0, 0, 0, 230)),
        ScreenPosition::new(px, py),
        0,
    ));
    world.spawn(panel(
        OverlayPart::Border,
        UiElement::new(pw, ph)
            .with_anchor(0.0, 0.0)
            .with_fill(Color::BLANK)
            .with_text_style(OVERLAY_GREEN, 2),
        ScreenPosition::new(px, py),
        1,
    ));
    world.spawn(panel(
        OverlayPart::Title,
        UiElement::new(0.2 * w, 24.0)
            .with_anchor(0.5, 0.0)
            .with_fill(Color::BLANK)
            .with_label("Accessibility")
            .with_text_style(Color::WHITE, 20),
        ScreenPosition::fraction(0.16, 0.57, w, h),
        2,
    ));

    for (row, (toggle_y, text_y)) in OverlayRow::ALL
        .into_iter()
        .zip([(0.61, 0.618), (0.67, 0.678), (0.73, 0.738)])
    {
        let active = row_active(&state, row);
        world.spawn(panel(
            OverlayPart::RowToggle(row),
            UiElement::new(15.0, 15.0)
                .with_anchor(0.0, 0.0)
                .with_fill(if active { ACTIVE_RED } else { Color::BLACK }),
            ScreenPosition::fraction(0.04, toggle_y, w, h),
            2,
        ));
        world.spawn(panel(
            OverlayPart::RowLabel(row),
            UiElement::new(0.18 * w, 16.0)
                .with_anchor(0.0, 0.5)
                .with_fill(Color::BLANK)
                .with_label(row.label())
                .with_text_style(Color::WHITE, 14),
            ScreenPosition::fraction(0.065, text_y, w, h),
            2,
        ));
        world.spawn(panel(
            OverlayPart::RowStatus(row),
            UiElement::new(0.08 * w, 16.0)
                .with_anchor(1.0, 0.5)
                .with_fill(Color::BLANK)
                .with_label(row_status(&state, row))
                .with_text_style(if active { ACTIVE_RED } else { INACTIVE_GRAY }, 14),
            ScreenPosition::fraction(0.27, text_y, w, h),
            2,
        ));
    }

    world.spawn(panel(
        OverlayPart::CloseButton,
        UiElement::new(30.0, 30.0)
            .with_round(true)
            .with_fill(Color::new(0x44, 0x44, 0x44, 255)),
        ScreenPosition::fraction(0.27, 0.57, w, h),
        3,
    ));
    world.spawn(panel(
        OverlayPart::CloseText,
        UiElement::new(30.0, 30.0)
            .with_fill(Color::BLANK)
            .with_label("X")
            .with_text_style(Color::WHITE, 16),
        ScreenPosition::fraction(0.27, 0.57, w, h),
        4,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::observer::Observer;

    fn setup() -> World {
        let mut world = World::new();
        world.insert_resource(ScreenSize { w: 1000, h: 500 });
        world.insert_resource(OverlayState::default());
        world.insert_resource(Messages::<AudioCmd>::default());
        spawn_overlay(&mut world);
        world.spawn(Observer::new(overlay_command_observer));
        world.flush();
        world
    }

    fn send(world: &mut World, kind: OverlayCommandKind) {
        world.trigger(OverlayCommand::new(kind));
        world.flush();
    }

    fn part(world: &mut World, wanted: OverlayPart) -> UiElement {
        world
            .query::<(&OverlayPart, &UiElement)>()
            .iter(world)
            .find(|(p, _)| **p == wanted)
            .map(|(_, ui)| ui.clone())
            .expect("overlay part spawned")
    }

    #[test]
    fn test_panel_starts_hidden_and_toggles() {
        let mut world = setup();
        assert!(!part(&mut world, OverlayPart::Background).visible);
        send(&mut world, OverlayCommandKind::Toggle);
        assert!(world.resource::<OverlayState>().is_open);
        assert!(part(&mut world, OverlayPart::CloseButton).visible);
        assert!(part(&mut world, OverlayPart::RowLabel(OverlayRow::HighContrast)).visible);
        send(&mut world, OverlayCommandKind::Close);
        assert!(!world.resource::<OverlayState>().is_open);
        assert!(!part(&mut world, OverlayPart::Title).visible);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut world = setup();
        send(&mut world, OverlayCommandKind::Close);
        assert!(!world.resource::<OverlayState>().is_open);
        let sounds = world
            .resource_mut::<Messages<AudioCmd>>()
            .drain()
            .count();
        assert_eq!(sounds, 0);
    }

    #[test]
    fn test_high_contrast_row_rerenders() {
        let mut world = setup();
        send(&mut world, OverlayCommandKind::ToggleHighContrast);
        let toggle = part(&mut world, OverlayPart::RowToggle(OverlayRow::HighContrast));
        assert_eq!(toggle.fill, ACTIVE_RED);
        let status = part(&mut world, OverlayPart::RowStatus(OverlayRow::HighContrast));
        assert_eq!(status.label.as_deref(), Some("ON"));
        assert_eq!(status.text_color, ACTIVE_RED);
        send(&mut world, OverlayCommandKind::ToggleHighContrast);
        let status = part(&mut world, OverlayPart::RowStatus(OverlayRow::HighContrast));
        assert_eq!(status.label.as_deref(), Some("OFF"));
        assert_eq!(status.text_color, INACTIVE_GRAY);
    }

    #[test]
    fn test_color_vision_row_shows_mode_and_legend_follows() {
        let mut world = setup();
        send(&mut world, OverlayCommandKind::CycleColorVision);
        let status = part(&mut world, OverlayPart::RowStatus(OverlayRow::ColorVision));
        assert_eq!(status.label.as_deref(), Some("Deuteranopia"));
        let legend = world
            .query_filtered::<&UiElement, With<ControlLegend>>()
            .single(&world)
            .map(|ui| ui.fill)
            .expect("one legend");
        assert_eq!(legend, ColorVisionMode::Deuteranopia.legend_background());
    }

    #[test]
    fn test_narration_toggle_without_backend_stays_off() {
        let mut world = setup();
        world.insert_resource(Narrator::unavailable());
        send(&mut world, OverlayCommandKind::ToggleNarration);
        // default speech_enabled = true, toggled off
        assert!(!world.resource::<OverlayState>().speech_enabled);
        send(&mut world, OverlayCommandKind::ToggleNarration);
        assert!(!world.resource::<OverlayState>().speech_enabled);
        let status = part(&mut world, OverlayPart::RowStatus(OverlayRow::Narration));
        assert_eq!(status.label.as_deref(), Some("OFF"));
    }

    #[test]
    fn test_toggles_are_persisted_to_config() {
        let mut world = setup();
        world.insert_resource(GameConfig::new());
        send(&mut world, OverlayCommandKind::ToggleHighContrast);
        send(&mut world, OverlayCommandKind::CycleColorVision);
        let config = world.resource::<GameConfig>();
        assert!(config.high_contrast);
        assert_eq!(config.color_vision, ColorVisionMode::Deuteranopia);
    }

    #[test]
    fn test_color_vision_announcements() {
        assert_eq!(
            color_vision_announcement(ColorVisionMode::Protanopia),
            "Colorblind support: Protanopia"
        );
        assert_eq!(
            color_vision_announcement(ColorVisionMode::Off),
            "Colorblind support disabled"
        );
    }
}
