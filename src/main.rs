//! Stormwater game entry point.
//!
//! A small educational game about stormwater pollution, built on:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** for entity-component-system architecture
//!
//! Every scene is fully playable from the keyboard: a focus engine discovers
//! the interactive elements the active scene exposes, draws a glowing
//! indicator around the focused one and dispatches Enter/Space to its action.
//! An accessibility overlay (`\` or the ADA button) toggles narration, a
//! color-vision filter and high contrast.
//!
//! # Main Loop
//!
//! 1. Load `config.ini`, open the window, create the render target and the
//!    color filter shader
//! 2. Insert resources, start the audio and narration threads
//! 3. Register scenes, observers and systems, enter the start scene
//! 4. Each frame: input, pointer, tweens, reveal timers, focus poll,
//!    indicator, narration and audio bridges, scene transitions, render
//! 5. On exit save preferences and join the background threads
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --start-scene ChooseGame
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};

use stormwatergame::components::persistent::Persistent;
use stormwatergame::events::audio::AudioCmd;
use stormwatergame::events::scene::{SceneChangedEvent, observe_scene_change_event};
use stormwatergame::game::{TITLE_SCENE, register_scenes};
use stormwatergame::resources::audio::{BLOOP_SFX, setup_audio, shutdown_audio};
use stormwatergame::resources::filtershader::ColorFilterShader;
use stormwatergame::resources::focus::FocusEngine;
use stormwatergame::resources::gameconfig::GameConfig;
use stormwatergame::resources::input::{InputState, PointerState};
use stormwatergame::resources::narration::{open_backend, setup_narration, shutdown_narration};
use stormwatergame::resources::rendertarget::RenderTarget;
use stormwatergame::resources::scene::{CurrentScene, GameSelection, NextScene};
use stormwatergame::resources::scenesurface::SceneSurface;
use stormwatergame::resources::screensize::ScreenSize;
use stormwatergame::resources::windowsize::WindowSize;
use stormwatergame::resources::worldtime::WorldTime;
use stormwatergame::systems::audio::{
    forward_audio_cmds, log_audio_messages, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use stormwatergame::systems::focus::focus_poll_system;
use stormwatergame::systems::indicator::focus_indicator_system;
use stormwatergame::systems::input::{route_input_observer, update_input_state};
use stormwatergame::systems::narration::{
    apply_narration_messages, poll_narration_messages, tick_narration,
    update_bevy_narration_messages,
};
use stormwatergame::systems::overlay::{overlay_command_observer, spawn_overlay};
use stormwatergame::systems::pointer::{pointer_click_system, update_pointer_state};
use stormwatergame::systems::render::render_system;
use stormwatergame::systems::reveal::reveal_system;
use stormwatergame::systems::scene::check_pending_scene;
use stormwatergame::systems::time::update_world_time;
use stormwatergame::systems::tween::{tween_alpha_system, tween_scale_system};

/// Professor Prevents: the stormwater game.
#[derive(Parser)]
#[command(version, about = "Stormwater game with keyboard focus navigation and an accessibility overlay")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene entered at startup.
    #[arg(long, value_name = "NAME", default_value = TITLE_SCENE)]
    start_scene: String,

    /// Start with narration switched off for this session.
    #[arg(long)]
    mute_narration: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // --------------- Configuration ---------------
    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }

    // --------------- Raylib window ---------------
    let mut builder = raylib::init();
    builder
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("Professor Prevents");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);

    let render_target =
        RenderTarget::new(&mut rl, &thread, config.render_width, config.render_height)
            .expect("Failed to create render target");
    let filter_shader = match ColorFilterShader::load() {
        Ok(shader) => Some(shader),
        Err(e) => {
            warn!("color filter unavailable: {}", e);
            None
        }
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    // ScreenSize is the fixed render resolution scenes lay out against.
    world.insert_resource(ScreenSize {
        w: config.render_width as i32,
        h: config.render_height as i32,
    });
    world.insert_resource(WindowSize {
        w: rl.get_screen_width(),
        h: rl.get_screen_height(),
    });
    world.insert_resource(InputState::default());
    world.insert_resource(PointerState::default());
    world.insert_resource(FocusEngine::new(config.poll_interval_secs()));
    world.insert_resource(CurrentScene::new());
    world.insert_resource(NextScene::new());
    world.insert_resource(SceneSurface::new());
    world.insert_resource(GameSelection::default());

    let mut overlay = config.overlay_state();
    if cli.mute_narration {
        overlay.speech_enabled = false;
    }
    let narration_on = overlay.speech_enabled;
    world.insert_resource(overlay);

    setup_audio(&mut world);
    world
        .resource_mut::<Messages<AudioCmd>>()
        .write(AudioCmd::LoadFx {
            id: BLOOP_SFX.to_string(),
            path: "./assets/audio/bloop.wav".to_string(),
        });
    setup_narration(
        &mut world,
        Some(open_backend(config.speech_engine)),
        config.voice.clone(),
        narration_on,
        config.scene_delay_secs(),
    );
    world.insert_resource(config);

    world.insert_non_send_resource(render_target);
    if let Some(shader) = filter_shader {
        world.insert_non_send_resource(shader);
    }
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    // --------------- Scenes, overlay and observers ---------------
    register_scenes(&mut world);
    spawn_overlay(&mut world);

    world.spawn((Observer::new(observe_scene_change_event), Persistent));
    world.spawn((Observer::new(route_input_observer), Persistent));
    world.spawn((Observer::new(overlay_command_observer), Persistent));
    // Ensure the observers are registered before we run any systems that may trigger events.
    world.flush();

    world.resource_mut::<NextScene>().set(cli.start_scene);
    world.trigger(SceneChangedEvent {});
    world.flush();

    // --------------- Schedule ---------------
    let mut update = Schedule::default();
    update.add_systems(update_input_state);
    update.add_systems(update_pointer_state);
    update.add_systems(
        pointer_click_system
            .after(update_pointer_state)
            .after(update_input_state),
    );
    update.add_systems((tween_alpha_system, tween_scale_system));
    update.add_systems(reveal_system);
    update.add_systems(
        focus_poll_system
            .after(reveal_system)
            .after(pointer_click_system),
    );
    update.add_systems(focus_indicator_system.after(focus_poll_system));
    update.add_systems(
        // narration systems must be together
        (
            poll_narration_messages,
            update_bevy_narration_messages,
            apply_narration_messages,
            tick_narration,
        )
            .chain()
            .after(pointer_click_system),
    );
    update.add_systems(
        // audio systems must be together
        (
            // First, advance AudioCmd messages and forward them to the audio thread
            update_bevy_audio_cmds,
            forward_audio_cmds,
            // Then, pull audio thread messages and advance them
            poll_audio_messages,
            update_bevy_audio_messages,
            log_audio_messages,
        )
            .chain()
            .after(pointer_click_system),
    );
    update.add_systems(check_pending_scene.after(focus_indicator_system));
    update.add_systems(
        render_system
            .after(focus_indicator_system)
            .after(tween_alpha_system)
            .after(tween_scale_system),
    );

    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers();
    }

    if let Err(e) = world.resource::<GameConfig>().save_to_file() {
        warn!("{}", e);
    }
    shutdown_narration(&mut world);
    shutdown_audio(&mut world);
}
