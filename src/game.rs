//! Demo scenes.
//!
//! Each scene is a setup system registered in the [`SceneRegistry`] by
//! [`register_scenes`]. A setup spawns its elements (non-persistent, so the
//! next transition removes them), fills the [`SceneSurface`] slots, registers
//! the scene callbacks the focus engine dispatches to, and queues the scene's
//! narration text.
//!
//! Callbacks registered from a setup live on non-persistent system entities
//! and are torn down with the scene. The `mute` callback is global and
//! registered once at startup.

use bevy_ecs::observer::{Observer, On};
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use log::{debug, info};
use raylib::prelude::{Color, Vector2};

use crate::components::focusable::{ChoiceButton, Clickable, FreeformOption, RevealAfter};
use crate::components::persistent::Persistent;
use crate::components::scale::Scale;
use crate::components::screenposition::ScreenPosition;
use crate::components::tween::{LoopMode, TweenScale};
use crate::components::uielement::UiElement;
use crate::components::zindex::ZIndex;
use crate::events::audio::AudioCmd;
use crate::events::focus::{ElementInputEvent, PointerPhase};
use crate::resources::audio::BLOOP_SFX;
use crate::resources::narration::{Narrator, SpeakOptions};
use crate::resources::scene::{GameSelection, NextScene, SceneKind, SceneRegistry};
use crate::resources::scenesurface::{CallbackResult, SceneSurface, Slot};
use crate::resources::screensize::ScreenSize;
use crate::systems::focus::{PAUSE_SCENE, RAIN_SCENE};

pub const TITLE_SCENE: &str = "Title";
pub const CHOOSE_GAME_SCENE: &str = "ChooseGame";
pub const LEVEL_SELECT_SCENE: &str = "PPLevelSelect";
pub const QUESTION_SCENE: &str = "PPQuestionState";
pub const FIND_AND_FIX_SCENE: &str = "FFGameState";

const BUTTON_BLUE: Color = Color::new(40, 120, 200, 255);
const SPEECH_BOX: Color = Color::new(250, 250, 240, 255);
const TEXT_DARK: Color = Color::new(30, 30, 30, 255);
const MODAL_BG: Color = Color::new(20, 20, 28, 235);
const SPOT_FILL: Color = Color::new(255, 255, 255, 40);
const SPOT_FOUND: Color = Color::new(0x28, 0xA7, 0x45, 110);

/// Delay before the results box "next" button shows up.
const RESULTS_NEXT_DELAY: f32 = 0.5;
/// Delay of the question prompt narration.
const QUESTION_NARRATION_DELAY: f32 = 0.5;

/// One pollute-or-protect question per level.
pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    /// Option id that protects the waterways.
    pub best: usize,
}

pub const QUESTIONS: [Question; 3] = [
    Question {
        prompt: "Your family is washing the car.",
        options: &["Wash it on the grass", "Wash it in the street"],
        best: 0,
    },
    Question {
        prompt: "You just finished walking the dog.",
        options: &[
            "Bag the waste and put it in the trash",
            "Leave it on the sidewalk",
            "Hose it into the gutter",
        ],
        best: 0,
    },
    Question {
        prompt: "There is leftover paint after a project.",
        options: &[
            "Pour it down the storm drain",
            "Take it to a hazardous waste drop-off",
            "Leave the open cans in the yard",
        ],
        best: 1,
    },
];

/// A hotspot of the find-and-fix picture.
pub struct Spot {
    /// Center and size in screen fractions.
    pub rect: (f32, f32, f32, f32),
    /// Whether the spot is a stormwater problem that needs fixing.
    pub problem: bool,
    pub description: &'static str,
}

pub const SPOTS: [Spot; 5] = [
    Spot {
        rect: (0.2, 0.45, 0.16, 0.08),
        problem: true,
        description: "Trash is piling up next to the storm drain.",
    },
    Spot {
        rect: (0.5, 0.35, 0.08, 0.2),
        problem: false,
        description: "A rain barrel collects water from the gutter.",
    },
    Spot {
        rect: (0.72, 0.6, 0.2, 0.07),
        problem: true,
        description: "Oil is leaking from the parked car.",
    },
    Spot {
        rect: (0.35, 0.7, 0.08, 0.12),
        problem: true,
        description: "Pet waste was left on the lawn.",
    },
    Spot {
        rect: (0.85, 0.4, 0.09, 0.09),
        problem: false,
        description: "A tree shades the yard and soaks up rain.",
    },
];

type AudioOut<'w> = Option<ResMut<'w, Messages<AudioCmd>>>;

fn bloop(audio: &mut AudioOut) {
    if let Some(audio) = audio.as_mut() {
        audio.write(AudioCmd::PlayFx {
            id: BLOOP_SFX.to_string(),
        });
    }
}

fn narrate(narrator: &mut Option<ResMut<Narrator>>, text: &str, delay: Option<f32>) {
    if let Some(narrator) = narrator.as_mut() {
        narrator.speak_game_text(text, SpeakOptions::default(), delay);
    }
}

fn screen(size: &ScreenSize) -> (f32, f32) {
    (size.w as f32, size.h as f32)
}

fn round_button(tex: &str, label: &str, diameter: f32) -> UiElement {
    UiElement::new(diameter, diameter)
        .with_texture(tex)
        .with_label(label)
        .with_round(true)
        .with_fill(BUTTON_BLUE)
        .with_text_style(Color::WHITE, 16)
}

fn rect_button(label: &str, width: f32, height: f32) -> UiElement {
    UiElement::new(width, height)
        .with_label(label)
        .with_fill(BUTTON_BLUE)
        .with_text_style(Color::WHITE, 18)
}

fn speech_box(text: &str, width: f32, height: f32) -> UiElement {
    UiElement::new(width, height)
        .with_label(text)
        .with_fill(SPEECH_BOX)
        .with_text_style(TEXT_DARK, 18)
}

/// Slow scale pulse scene buttons carry.
fn breathing(to: f32) -> TweenScale {
    TweenScale::new(
        Vector2 { x: 1.0, y: 1.0 },
        Vector2 { x: to, y: to },
        0.6,
    )
    .with_loop_mode(LoopMode::PingPong)
}

/// Mute button in the top right corner and, optionally, the pause button.
fn spawn_corner_buttons(
    commands: &mut Commands,
    surface: &mut SceneSurface,
    (w, h): (f32, f32),
    with_pause: bool,
) {
    let mute = commands
        .spawn((
            round_button("button_sound", "Sound", 56.0),
            ScreenPosition::fraction(0.95, 0.08, w, h),
        ))
        .id();
    surface.set_slot(Slot::Mute, mute);
    if with_pause {
        let pause = commands
            .spawn((
                round_button("button_pause", "II", 72.0),
                ScreenPosition::fraction(0.892, 0.185, w, h),
                Scale::uniform(0.75),
            ))
            .id();
        surface.set_slot(Slot::Pause, pause);
    }
}

/// Callback that plays the bloop sound and requests `scene`.
fn goto(
    scene: &'static str,
) -> impl FnMut(ResMut<NextScene>, Option<ResMut<Messages<AudioCmd>>>) -> CallbackResult {
    move |mut next: ResMut<NextScene>, mut audio: Option<ResMut<Messages<AudioCmd>>>| {
        bloop(&mut audio);
        next.set(scene);
        Ok(())
    }
}

/// Global mute toggle. The mute state lives in the system's local.
pub fn toggle_mute(
    mut muted: Local<bool>,
    mut audio: Option<ResMut<Messages<AudioCmd>>>,
) -> CallbackResult {
    *muted = !*muted;
    let audio = audio
        .as_mut()
        .ok_or_else(|| "audio is not set up".to_string())?;
    audio.write(AudioCmd::SetMuted { muted: *muted });
    info!("sound {}", if *muted { "muted" } else { "unmuted" });
    Ok(())
}

// ---------------------------------------------------------------------------
// Title, game choice, pause, level select
// ---------------------------------------------------------------------------

pub fn setup_title(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    commands.spawn((
        UiElement::new(0.6 * w, 0.18 * h)
            .with_label("PROFESSOR PREVENTS")
            .with_fill(Color::BLANK)
            .with_text_style(Color::WHITE, 48),
        ScreenPosition::fraction(0.5, 0.25, w, h),
    ));
    let play = commands
        .spawn((
            round_button("button_play", "Play", 120.0),
            ScreenPosition::fraction(0.5, 0.6, w, h),
            Scale::default(),
            breathing(0.9),
        ))
        .id();
    surface.set_slot(Slot::Play, play);
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), false);

    let play_cb = commands.register_system(goto(CHOOSE_GAME_SCENE));
    surface.register_callback("play", play_cb);

    narrate(
        &mut narrator,
        "Professor Prevents. Help keep our stormwater clean. Press play to start.",
        None,
    );
}

pub fn setup_choose_game(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    let text = "Which game do you want to play? Find and Fix, or Pollute or Protect?";
    commands.spawn((
        speech_box(text, 0.36 * w, 0.2 * h),
        ScreenPosition::fraction(0.2, 0.66, w, h),
    ));
    let ff = commands
        .spawn((
            rect_button("Find and Fix", 0.3 * w, 0.18 * h).with_texture("button_ff"),
            ScreenPosition::fraction(0.25, 0.22, w, h),
            Scale::default(),
            breathing(0.9),
        ))
        .id();
    let pp = commands
        .spawn((
            rect_button("Pollute or Protect", 0.3 * w, 0.18 * h).with_texture("button_pp"),
            ScreenPosition::fraction(0.75, 0.22, w, h),
            Scale::default(),
            breathing(0.9),
        ))
        .id();
    surface.set_slot(Slot::ChooseFf, ff);
    surface.set_slot(Slot::ChoosePp, pp);
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), true);

    let ff_cb = commands.register_system(goto(FIND_AND_FIX_SCENE));
    let pp_cb = commands.register_system(goto(LEVEL_SELECT_SCENE));
    surface.register_callback("ff", ff_cb);
    surface.register_callback("pp", pp_cb);

    narrate(&mut narrator, text, None);
}

fn resume_last_scene(
    selection: Res<GameSelection>,
    mut next: ResMut<NextScene>,
    mut audio: Option<ResMut<Messages<AudioCmd>>>,
) -> CallbackResult {
    let scene = selection
        .last_scene
        .clone()
        .ok_or_else(|| "no scene to resume".to_string())?;
    bloop(&mut audio);
    next.set(scene);
    Ok(())
}

fn restart_game(
    mut selection: ResMut<GameSelection>,
    mut next: ResMut<NextScene>,
    mut audio: Option<ResMut<Messages<AudioCmd>>>,
) -> CallbackResult {
    *selection = GameSelection::default();
    bloop(&mut audio);
    next.set(CHOOSE_GAME_SCENE);
    Ok(())
}

/// Pause menu, a 2×2 grid: Resume, Restart / Home, Mute.
pub fn setup_pause(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    commands.spawn((
        UiElement::new(0.4 * w, 0.1 * h)
            .with_label("Paused")
            .with_fill(Color::BLANK)
            .with_text_style(Color::WHITE, 40),
        ScreenPosition::fraction(0.5, 0.2, w, h),
    ));
    let grid = [
        (Slot::Resume, "button_play", "Resume", 0.4, 0.4),
        (Slot::Restart, "button_replay", "Restart", 0.6, 0.4),
        (Slot::Home, "button_home", "Home", 0.4, 0.65),
        (Slot::Mute, "button_sound", "Sound", 0.6, 0.65),
    ];
    for (slot, tex, label, fx, fy) in grid {
        let id = commands
            .spawn((
                round_button(tex, label, 100.0),
                ScreenPosition::fraction(fx, fy, w, h),
            ))
            .id();
        surface.set_slot(slot, id);
    }

    let resume_cb = commands.register_system(resume_last_scene);
    let restart_cb = commands.register_system(restart_game);
    let home_cb = commands.register_system(goto(TITLE_SCENE));
    surface.register_callback("resume", resume_cb);
    surface.register_callback("restart", restart_cb);
    surface.register_callback("home", home_cb);

    narrate(
        &mut narrator,
        "Game paused. Resume, restart, go home, or turn the sound off.",
        None,
    );
}

fn choose_level(
    level: u8,
) -> impl FnMut(ResMut<GameSelection>, ResMut<NextScene>, Option<ResMut<Messages<AudioCmd>>>) -> CallbackResult
{
    move |mut selection: ResMut<GameSelection>,
          mut next: ResMut<NextScene>,
          mut audio: Option<ResMut<Messages<AudioCmd>>>| {
        selection.level = level;
        selection.option_order.clear();
        bloop(&mut audio);
        next.set(QUESTION_SCENE);
        Ok(())
    }
}

pub fn setup_level_select(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    let text = "Pollute or Protect. Choose a level.";
    commands.spawn((
        speech_box(text, 0.3 * w, 0.16 * h),
        ScreenPosition::fraction(0.49, 0.22, w, h),
    ));
    let levels = [
        (Slot::Level1, "Level 1", 0.475, "level1", 1u8),
        (Slot::Level2, "Level 2", 0.655, "level2", 2),
        (Slot::Level3, "Level 3", 0.835, "level3", 3),
    ];
    for (slot, label, fx, name, level) in levels {
        let id = commands
            .spawn((
                rect_button(label, 0.15 * w, 0.2 * h),
                ScreenPosition::fraction(fx, 0.6, w, h),
                Scale::default(),
                breathing(0.95),
            ))
            .id();
        surface.set_slot(slot, id);
        let cb = commands.register_system(choose_level(level));
        surface.register_callback(name, cb);
    }
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), true);

    narrate(&mut narrator, text, None);
}

// ---------------------------------------------------------------------------
// Pollute or protect
// ---------------------------------------------------------------------------

/// Question for the selected level; levels out of range fall back to the first.
pub fn question_for(level: u8) -> &'static Question {
    let index = usize::from(level.max(1) - 1).min(QUESTIONS.len() - 1);
    &QUESTIONS[index]
}

/// Narrated question prompt.
pub fn question_prompt(question: &Question) -> String {
    format!(
        "Question. {} Choose the best option to protect our waterways. {} options available. Use arrow keys to navigate.",
        question.prompt,
        question.options.len()
    )
}

pub fn setup_question(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut selection: ResMut<GameSelection>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    let question = question_for(selection.level);
    let count = question.options.len();

    if selection.option_order.len() != count {
        let mut order: Vec<usize> = (0..count).collect();
        fastrand::shuffle(&mut order);
        debug!("option order {:?}", order);
        selection.option_order = order;
    }

    commands.spawn((
        speech_box(question.prompt, 0.6 * w, 0.14 * h),
        ScreenPosition::fraction(0.45, 0.15, w, h),
    ));

    let button_width = w * if count == 3 { 0.33 } else { 0.42 };
    for (order, &option) in selection.option_order.iter().enumerate() {
        let x = 0.5 * w - button_width * (count as f32 - 1.0) * 0.5 + button_width * order as f32;
        commands.spawn((
            rect_button(question.options[option], button_width * 0.9, 0.2 * h)
                .with_text_style(Color::WHITE, 16),
            ScreenPosition::new(x, 0.68 * h),
            Scale::default(),
            breathing(0.95),
            ChoiceButton {
                order,
                option_index: option,
            },
        ));
    }
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), true);

    narrate(
        &mut narrator,
        &question_prompt(question),
        Some(QUESTION_NARRATION_DELAY),
    );
}

pub fn setup_rain(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut selection: ResMut<GameSelection>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    let question = question_for(selection.level);
    let protected = selection.chosen_option == Some(question.best);
    if protected && !selection.score_locked {
        selection.score += 1;
    }
    selection.score_locked = true;

    let text = if protected {
        "Great choice! When it rains, only clean water flows into the storm drain."
    } else {
        "Oh no! The rain washed pollution into the storm drain and out to the creek."
    };
    commands.spawn((
        speech_box(text, 0.36 * w, 0.2 * h),
        ScreenPosition::fraction(0.8, 0.4, w, h),
    ));
    commands.spawn((
        UiElement::new(0.3 * w, 0.06 * h)
            .with_label(format!("Score: {}", selection.score))
            .with_fill(Color::BLANK)
            .with_text_style(Color::WHITE, 24),
        ScreenPosition::fraction(0.2, 0.1, w, h),
    ));
    let next = commands
        .spawn((
            rect_button("Next", 0.14 * w, 0.09 * h),
            ScreenPosition::fraction(0.5, 0.85, w, h),
        ))
        .id();
    let home = commands
        .spawn((
            round_button("button_home", "Home", 72.0),
            ScreenPosition::fraction(0.08, 0.12, w, h),
        ))
        .id();
    surface.set_slot(Slot::Next, next);
    surface.set_slot(Slot::Home, home);
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), true);

    let next_cb = commands.register_system(goto(LEVEL_SELECT_SCENE));
    let home_cb = commands.register_system(goto(TITLE_SCENE));
    surface.register_callback("next", next_cb);
    surface.register_callback("home", home_cb);

    narrate(&mut narrator, text, None);
}

// ---------------------------------------------------------------------------
// Find and fix
// ---------------------------------------------------------------------------

/// Progress of the find-and-fix picture.
#[derive(Resource, Debug, Clone, Default)]
pub struct FindAndFixRound {
    pub found: Vec<bool>,
    /// Spot whose question box is open.
    pub selected: Option<usize>,
}

impl FindAndFixRound {
    pub fn new() -> Self {
        Self {
            found: vec![false; SPOTS.len()],
            selected: None,
        }
    }

    /// Every problem spot has been fixed.
    pub fn complete(&self) -> bool {
        SPOTS
            .iter()
            .zip(&self.found)
            .all(|(spot, found)| !spot.problem || *found)
    }
}

/// Which modal box an element belongs to.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfModal {
    Question,
    Results,
}

/// Text element of the results box.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ResultsText;

/// "Next" button shown once the picture is complete.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FfFinish;

type ModalParts<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static FfModal,
        &'static mut UiElement,
        Has<ResultsText>,
    ),
>;

/// Show or hide one modal box. The results "next" button is revealed after
/// a short delay instead of immediately.
fn set_modal(
    which: FfModal,
    open: bool,
    surface: &mut SceneSurface,
    parts: &mut ModalParts,
    commands: &mut Commands,
) {
    for (entity, modal, mut ui, _) in parts.iter_mut() {
        if *modal != which {
            continue;
        }
        if open && Some(entity) == surface.modal.results_next {
            ui.visible = false;
            commands.entity(entity).insert(RevealAfter::new(RESULTS_NEXT_DELAY));
        } else {
            ui.visible = open;
        }
    }
    match which {
        FfModal::Question => surface.question_open = open,
        FfModal::Results => surface.results_open = open,
    }
}

#[allow(clippy::too_many_arguments)]
fn answer_spot(
    fix: bool,
    round: &mut FindAndFixRound,
    surface: &mut SceneSurface,
    parts: &mut ModalParts,
    spots: &mut Query<(&FreeformOption, &mut UiElement), Without<FfModal>>,
    commands: &mut Commands,
    narrator: &mut Option<ResMut<Narrator>>,
) -> CallbackResult {
    let index = round
        .selected
        .take()
        .ok_or_else(|| "no spot selected".to_string())?;
    let spot = SPOTS
        .get(index)
        .ok_or_else(|| format!("spot {} out of range", index))?;

    let correct = spot.problem == fix;
    let text = if correct {
        if let Some(found) = round.found.get_mut(index) {
            *found = true;
        }
        for (option, mut ui) in spots.iter_mut() {
            if option.index == index {
                ui.enabled = false;
                ui.fill = SPOT_FOUND;
            }
        }
        format!("Correct! {}", spot.description)
    } else {
        "Not quite. Take another look.".to_string()
    };

    for (_, _, mut ui, is_text) in parts.iter_mut() {
        if is_text {
            ui.label = Some(text.clone());
        }
    }
    set_modal(FfModal::Question, false, surface, parts, commands);
    set_modal(FfModal::Results, true, surface, parts, commands);
    if let Some(narrator) = narrator.as_mut() {
        narrator.speak(&text, SpeakOptions::default());
    }
    Ok(())
}

fn ff_fix_it(
    mut commands: Commands,
    mut round: ResMut<FindAndFixRound>,
    mut surface: ResMut<SceneSurface>,
    mut parts: ModalParts,
    mut spots: Query<(&FreeformOption, &mut UiElement), Without<FfModal>>,
    mut narrator: Option<ResMut<Narrator>>,
) -> CallbackResult {
    answer_spot(
        true,
        &mut round,
        &mut surface,
        &mut parts,
        &mut spots,
        &mut commands,
        &mut narrator,
    )
}

fn ff_its_ok(
    mut commands: Commands,
    mut round: ResMut<FindAndFixRound>,
    mut surface: ResMut<SceneSurface>,
    mut parts: ModalParts,
    mut spots: Query<(&FreeformOption, &mut UiElement), Without<FfModal>>,
    mut narrator: Option<ResMut<Narrator>>,
) -> CallbackResult {
    answer_spot(
        false,
        &mut round,
        &mut surface,
        &mut parts,
        &mut spots,
        &mut commands,
        &mut narrator,
    )
}

fn ff_close_result(
    mut commands: Commands,
    round: Res<FindAndFixRound>,
    mut surface: ResMut<SceneSurface>,
    mut parts: ModalParts,
    finish: Query<Entity, With<FfFinish>>,
    mut narrator: Option<ResMut<Narrator>>,
) -> CallbackResult {
    set_modal(FfModal::Results, false, &mut surface, &mut parts, &mut commands);
    if round.complete() {
        for entity in finish.iter() {
            commands.entity(entity).insert(RevealAfter::new(RESULTS_NEXT_DELAY));
        }
        if let Some(narrator) = narrator.as_mut() {
            narrator.speak(
                "You found every problem! Press next to continue.",
                SpeakOptions::default(),
            );
        }
    }
    surface.signal_content_changed();
    Ok(())
}

/// Native pointer signals of the find-and-fix scene.
///
/// A down signal on a spot opens the question box; an up signal on the
/// finish button leaves the scene.
#[allow(clippy::too_many_arguments)]
pub fn ff_pointer_observer(
    trigger: On<ElementInputEvent>,
    mut commands: Commands,
    spots: Query<&FreeformOption>,
    finish: Query<(), With<FfFinish>>,
    mut round: ResMut<FindAndFixRound>,
    mut surface: ResMut<SceneSurface>,
    mut parts: ModalParts,
    mut next: ResMut<NextScene>,
    mut narrator: Option<ResMut<Narrator>>,
    mut audio: Option<ResMut<Messages<AudioCmd>>>,
) {
    let event = trigger.event();
    match event.phase {
        PointerPhase::Down => {
            let Ok(spot) = spots.get(event.element) else {
                return;
            };
            if surface.question_open || surface.results_open {
                return;
            }
            bloop(&mut audio);
            round.selected = Some(spot.index);
            set_modal(FfModal::Question, true, &mut surface, &mut parts, &mut commands);
            if let Some(narrator) = narrator.as_mut() {
                narrator.speak(
                    "Is this a stormwater problem? Choose Fix it, or It's OK.",
                    SpeakOptions::default(),
                );
            }
        }
        PointerPhase::Up => {
            if finish.contains(event.element) {
                bloop(&mut audio);
                next.set(CHOOSE_GAME_SCENE);
            }
        }
    }
}

pub fn setup_find_and_fix(
    mut commands: Commands,
    mut surface: ResMut<SceneSurface>,
    size: Res<ScreenSize>,
    mut narrator: Option<ResMut<Narrator>>,
) {
    let (w, h) = screen(&size);
    commands.insert_resource(FindAndFixRound::new());

    commands.spawn((
        UiElement::new(0.9 * w, 0.7 * h)
            .with_texture("ff_scene")
            .with_fill(Color::new(90, 140, 90, 255)),
        ScreenPosition::fraction(0.5, 0.5, w, h),
        ZIndex(-1),
    ));
    for (index, spot) in SPOTS.iter().enumerate() {
        let (fx, fy, fw, fh) = spot.rect;
        commands.spawn((
            UiElement::new(fw * w, fh * h).with_fill(SPOT_FILL),
            ScreenPosition::fraction(fx, fy, w, h),
            FreeformOption { index },
            Clickable,
        ));
    }

    let modal = |which: FfModal, ui: UiElement, fx: f32, fy: f32| {
        (ui.hidden(), ScreenPosition::fraction(fx, fy, w, h), ZIndex(50), which)
    };

    commands.spawn(modal(
        FfModal::Question,
        UiElement::new(0.5 * w, 0.35 * h).with_fill(MODAL_BG),
        0.5,
        0.5,
    ));
    commands.spawn(modal(
        FfModal::Question,
        UiElement::new(0.45 * w, 0.08 * h)
            .with_label("Is this a stormwater problem?")
            .with_fill(Color::BLANK)
            .with_text_style(Color::WHITE, 22),
        0.5,
        0.42,
    ));
    let fix_it = commands
        .spawn(modal(FfModal::Question, rect_button("Fix it", 140.0, 44.0), 0.4, 0.58))
        .id();
    let its_ok = commands
        .spawn(modal(FfModal::Question, rect_button("It's OK", 140.0, 44.0), 0.6, 0.58))
        .id();

    commands.spawn(modal(
        FfModal::Results,
        UiElement::new(0.5 * w, 0.35 * h).with_fill(MODAL_BG),
        0.5,
        0.5,
    ));
    commands.spawn((
        modal(
            FfModal::Results,
            UiElement::new(0.45 * w, 0.08 * h)
                .with_fill(Color::BLANK)
                .with_text_style(Color::WHITE, 20),
            0.5,
            0.42,
        ),
        ResultsText,
    ));
    let results_next = commands
        .spawn(modal(FfModal::Results, rect_button("Next", 140.0, 44.0), 0.5, 0.6))
        .id();
    surface.modal.fix_it = Some(fix_it);
    surface.modal.its_ok = Some(its_ok);
    surface.modal.results_next = Some(results_next);

    let finish = commands
        .spawn((
            rect_button("Next", 0.14 * w, 0.09 * h).hidden(),
            ScreenPosition::fraction(0.5, 0.92, w, h),
            Clickable,
            FfFinish,
        ))
        .id();
    surface.set_slot(Slot::Next, finish);
    spawn_corner_buttons(&mut commands, &mut surface, (w, h), true);

    let fix_cb = commands.register_system(ff_fix_it);
    let ok_cb = commands.register_system(ff_its_ok);
    let close_cb = commands.register_system(ff_close_result);
    surface.register_callback("fix_it", fix_cb);
    surface.register_callback("its_ok", ok_cb);
    surface.register_callback("close_result", close_cb);
    let observer = commands.spawn(Observer::new(ff_pointer_observer)).id();
    surface.adopt_observer(observer);

    narrate(
        &mut narrator,
        "Find and Fix. Look for stormwater problems in the picture. Select each spot and decide whether it needs fixing.",
        None,
    );
}

/// Register every scene setup and the global `mute` callback.
pub fn register_scenes(world: &mut World) {
    let scenes: [(&str, SceneKind, SystemId); 7] = [
        (TITLE_SCENE, SceneKind::Linear, world.register_system(setup_title)),
        (
            CHOOSE_GAME_SCENE,
            SceneKind::Linear,
            world.register_system(setup_choose_game),
        ),
        (PAUSE_SCENE, SceneKind::PauseGrid, world.register_system(setup_pause)),
        (
            LEVEL_SELECT_SCENE,
            SceneKind::Linear,
            world.register_system(setup_level_select),
        ),
        (
            QUESTION_SCENE,
            SceneKind::ChoiceList,
            world.register_system(setup_question),
        ),
        (RAIN_SCENE, SceneKind::Linear, world.register_system(setup_rain)),
        (
            FIND_AND_FIX_SCENE,
            SceneKind::FindAndFix,
            world.register_system(setup_find_and_fix),
        ),
    ];

    // Registered systems are entities; keep them across scene teardown.
    let mut registry = SceneRegistry::new();
    for (name, kind, id) in scenes {
        world.entity_mut(id.entity()).insert(Persistent);
        registry.insert(name, kind, id);
    }
    world.insert_resource(registry);

    let mute = world.register_system(toggle_mute);
    world.entity_mut(mute.entity()).insert(Persistent);
    world
        .get_resource_or_insert_with(SceneSurface::new)
        .register_global_callback("mute", mute);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_lookup_clamps_level() {
        assert_eq!(question_for(0).options.len(), 2);
        assert_eq!(question_for(2).options.len(), 3);
        assert_eq!(question_for(9).best, 1);
    }

    #[test]
    fn test_prompt_counts_options() {
        let prompt = question_prompt(question_for(2));
        assert!(prompt.contains("3 options available"));
        assert!(prompt.starts_with("Question. You just finished walking the dog."));
    }

    #[test]
    fn test_round_completes_when_problems_found() {
        let mut round = FindAndFixRound::new();
        assert!(!round.complete());
        for (found, spot) in round.found.iter_mut().zip(SPOTS.iter()) {
            *found = spot.problem;
        }
        assert!(round.complete());
    }

    #[test]
    fn test_best_options_exist() {
        for q in QUESTIONS.iter() {
            assert!(q.best < q.options.len());
        }
    }
}
