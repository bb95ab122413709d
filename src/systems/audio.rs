//! Sound effects on a dedicated thread backed by Raylib.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the Raylib audio device
//!   and every loaded [`Sound`], and processes
//!   [`AudioCmd`](crate::events::audio::AudioCmd) messages.
//! - [`poll_audio_messages`] drains the thread's replies into the ECS
//!   mailbox; [`update_bevy_audio_messages`] advances it.
//! - [`forward_audio_cmds`] sends ECS-written commands across the channel.
//!
//! When no audio device can be opened the thread reports
//! [`AudioMessage::DeviceUnavailable`] and keeps draining commands so the
//! game runs silently.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use raylib::core::audio::{RaylibAudio, Sound};
use rustc_hash::FxHashMap;

pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Forward ECS `AudioCmd` messages to the audio thread.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // Send errors only happen after shutdown.
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Log replies worth surfacing.
pub fn log_audio_messages(mut reader: MessageReader<AudioMessage>) {
    for msg in reader.read() {
        match msg {
            AudioMessage::FxLoadFailed { id, error } => {
                warn!("sound '{}' failed to load: {}", id, error)
            }
            AudioMessage::DeviceUnavailable { error } => {
                warn!("audio disabled: {}", error)
            }
            other => debug!("audio: {:?}", other),
        }
    }
}

/// Entry point of the audio thread. Blocks until [`AudioCmd::Shutdown`].
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            let _ = tx_msg.send(AudioMessage::DeviceUnavailable {
                error: e.to_string(),
            });
            drain_silently(rx_cmd);
            return;
        }
    };

    info!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );

    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut muted = false;

    'run: loop {
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("[audio] fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    if muted {
                        continue;
                    }
                    match sounds.get(&id) {
                        Some(sound) => sound.play(),
                        None => debug!("[audio] fx '{}' not loaded", id),
                    }
                }
                AudioCmd::UnloadAllFx => {
                    sounds.clear();
                    let _ = tx_msg.send(AudioMessage::FxUnloadedAll);
                }
                AudioCmd::SetMuted { muted: want } => {
                    muted = want;
                    audio.set_master_volume(if muted { 0.0 } else { 1.0 });
                    info!("[audio] muted={}", muted);
                    let _ = tx_msg.send(AudioMessage::MuteChanged { muted });
                }
                AudioCmd::Shutdown => {
                    sounds.clear();
                    let _ = tx_msg.send(AudioMessage::FxUnloadedAll);
                    break 'run;
                }
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    info!(
        "[audio] thread exiting (id={:?})",
        std::thread::current().id()
    );
    // Sounds drop before `audio`.
    drop(sounds);
}

fn drain_silently(rx_cmd: Receiver<AudioCmd>) {
    for cmd in rx_cmd.iter() {
        if matches!(cmd, AudioCmd::Shutdown) {
            break;
        }
    }
}

/// Queue a sound effect from exclusive code. Silently skipped when audio is
/// not set up.
pub fn play_fx(world: &mut World, id: &str) {
    if let Some(mut msgs) = world.get_resource_mut::<Messages<AudioCmd>>() {
        msgs.write(AudioCmd::PlayFx { id: id.to_string() });
    }
}
