//! Speech narration: text cleanup, voices, the [`Narrator`] resource and the
//! bridge to the background narration thread.
//!
//! Use [`setup_narration`] once during initialization. It spawns the thread,
//! inserts [`NarrationBridge`], [`Narrator`] and `Messages<NarrationMessage>`.
//! Call [`shutdown_narration`] during teardown.

pub mod backend;
pub mod command;
pub mod narrator;
pub mod text;
pub mod voice;

pub use backend::{ConsoleSpeech, NarrationError, SpeechBackend};
pub use command::{CommandSpeech, SpeechEngine, open_backend};
pub use narrator::{NarrationStatus, Narrator};
pub use text::clean_text;
pub use voice::{SpeakOptions, Voice, VoiceSettings, select_voice};

use crate::events::narration::{NarrationCmd, NarrationMessage};
use crate::systems::narration::narration_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{info, warn};

/// Bridge between the ECS world and the narration thread.
#[derive(Resource)]
pub struct NarrationBridge {
    pub tx_cmd: Sender<NarrationCmd>,
    pub rx_msg: Receiver<NarrationMessage>,
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the narration thread around `backend` and register the resources.
///
/// With no backend the narrator is inserted in its unavailable form and no
/// thread is started.
pub fn setup_narration(
    world: &mut World,
    backend: Option<Box<dyn SpeechBackend>>,
    settings: VoiceSettings,
    enabled: bool,
    game_text_delay: f32,
) {
    world.insert_resource(Messages::<NarrationMessage>::default());

    let Some(backend) = backend else {
        warn!("no speech backend available, narration disabled");
        world.insert_resource(Narrator::unavailable());
        return;
    };

    let mut settings = settings;
    let voices = backend.voices();
    let chosen = select_voice(&voices).cloned();
    let has_voice = chosen.is_some();
    if settings.voice.is_none() {
        settings.voice = chosen.as_ref().map(|v| v.name.clone());
    }
    info!(
        "narration backend '{}' with voice {:?}",
        backend.name(),
        settings.voice
    );

    let (tx_cmd, rx_cmd) = unbounded::<NarrationCmd>();
    let (tx_msg, rx_msg) = unbounded::<NarrationMessage>();
    let handle = std::thread::spawn(move || narration_thread(backend, rx_cmd, tx_msg));

    let mut narrator =
        Narrator::new(tx_cmd.clone(), settings, has_voice).with_game_text_delay(game_text_delay);
    if !enabled {
        narrator.set_enabled(false);
    }

    world.insert_resource(narrator);
    world.insert_resource(NarrationBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
}

/// Stop the narration thread and join it.
pub fn shutdown_narration(world: &mut World) {
    if let Some(mut narrator) = world.get_resource_mut::<Narrator>() {
        narrator.stop();
    }
    if let Some(bridge) = world.remove_resource::<NarrationBridge>() {
        let _ = bridge.tx_cmd.send(NarrationCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
