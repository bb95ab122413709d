//! Narration thread and the systems that bridge it with the ECS world.
//!
//! - [`narration_thread`] owns the [`SpeechBackend`] and processes
//!   [`NarrationCmd`]s, emitting [`NarrationMessage`]s.
//! - [`poll_narration_messages`] drains the thread's replies into
//!   `Messages<NarrationMessage>` and [`update_bevy_narration_messages`]
//!   advances the queue.
//! - [`apply_narration_messages`] feeds replies to the [`Narrator`] so the
//!   queue advances.
//! - [`tick_narration`] advances delayed scene narration.

use std::time::{Duration, Instant};

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::events::narration::{NarrationCmd, NarrationMessage, UtteranceId};
use crate::resources::narration::{NarrationBridge, Narrator, SpeechBackend};
use crate::resources::worldtime::WorldTime;

const NARRATION_POLL: Duration = Duration::from_millis(10);

/// Entry point of the narration thread. Blocks until
/// [`NarrationCmd::Shutdown`] arrives or the command channel closes.
pub fn narration_thread(
    mut backend: Box<dyn SpeechBackend>,
    rx_cmd: Receiver<NarrationCmd>,
    tx_msg: Sender<NarrationMessage>,
) {
    info!(
        "[narration] thread starting with backend '{}' (id={:?})",
        backend.name(),
        std::thread::current().id()
    );

    let mut current: Option<UtteranceId> = None;
    let mut last = Instant::now();

    'run: loop {
        loop {
            let cmd = match rx_cmd.try_recv() {
                Ok(cmd) => cmd,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => break 'run,
            };
            match cmd {
                NarrationCmd::Speak { id, text, settings } => {
                    if current.take().is_some() {
                        backend.cancel();
                    }
                    match backend.start(&text, &settings) {
                        Ok(()) => {
                            current = Some(id);
                            let _ = tx_msg.send(NarrationMessage::Started { id });
                        }
                        Err(e) => {
                            warn!("[narration] utterance #{} failed: {}", id, e);
                            let _ = tx_msg.send(NarrationMessage::Errored {
                                id,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                NarrationCmd::Cancel => {
                    if let Some(id) = current.take() {
                        debug!("[narration] cancel #{}", id);
                        backend.cancel();
                    }
                }
                NarrationCmd::Pause => backend.pause(),
                NarrationCmd::Resume => backend.resume(),
                NarrationCmd::Shutdown => {
                    backend.cancel();
                    break 'run;
                }
            }
        }

        let now = Instant::now();
        let elapsed = now - last;
        last = now;
        if let Some(id) = current
            && backend.poll_finished(elapsed)
        {
            current = None;
            let _ = tx_msg.send(NarrationMessage::Ended { id });
        }

        std::thread::sleep(NARRATION_POLL);
    }

    info!(
        "[narration] thread exiting (id={:?})",
        std::thread::current().id()
    );
}

/// Drain replies from the narration thread into the ECS mailbox.
pub fn poll_narration_messages(
    bridge: Option<Res<NarrationBridge>>,
    mut writer: MessageWriter<NarrationMessage>,
) {
    if let Some(bridge) = bridge {
        writer.write_batch(bridge.rx_msg.try_iter());
    }
}

pub fn update_bevy_narration_messages(mut msgs: ResMut<Messages<NarrationMessage>>) {
    msgs.update();
}

/// Let the narrator react to started/ended/errored replies.
pub fn apply_narration_messages(
    mut reader: MessageReader<NarrationMessage>,
    mut narrator: ResMut<Narrator>,
) {
    for msg in reader.read() {
        narrator.handle_message(msg);
    }
}

/// Advance delayed scene narration.
pub fn tick_narration(time: Res<WorldTime>, mut narrator: ResMut<Narrator>) {
    narrator.tick(time.delta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::narration::{ConsoleSpeech, VoiceSettings};
    use crossbeam_channel::unbounded;

    #[test]
    fn test_thread_reports_start_and_end() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        let handle =
            std::thread::spawn(move || narration_thread(Box::new(ConsoleSpeech::new()), rx_cmd, tx_msg));

        tx_cmd
            .send(NarrationCmd::Speak {
                id: 7,
                text: "ok".into(),
                settings: VoiceSettings::default(),
            })
            .expect("thread alive");
        let started = rx_msg
            .recv_timeout(Duration::from_secs(2))
            .expect("started reply");
        assert_eq!(started, NarrationMessage::Started { id: 7 });
        let ended = rx_msg
            .recv_timeout(Duration::from_secs(3))
            .expect("ended reply");
        assert_eq!(ended, NarrationMessage::Ended { id: 7 });

        tx_cmd.send(NarrationCmd::Shutdown).expect("thread alive");
        handle.join().expect("thread exits cleanly");
    }

    #[test]
    fn test_cancelled_utterance_never_ends() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        let handle =
            std::thread::spawn(move || narration_thread(Box::new(ConsoleSpeech::new()), rx_cmd, tx_msg));

        tx_cmd
            .send(NarrationCmd::Speak {
                id: 1,
                text: "a longer sentence that takes a while".into(),
                settings: VoiceSettings::default(),
            })
            .expect("thread alive");
        tx_cmd.send(NarrationCmd::Cancel).expect("thread alive");
        std::thread::sleep(Duration::from_millis(100));
        tx_cmd.send(NarrationCmd::Shutdown).expect("thread alive");
        handle.join().expect("thread exits cleanly");

        let replies: Vec<NarrationMessage> = rx_msg.try_iter().collect();
        assert!(!replies.contains(&NarrationMessage::Ended { id: 1 }));
    }
}
