//! Queue-based narration controller.
//!
//! The [`Narrator`] resource is the only entry point to speech. It keeps the
//! FIFO queue and the id of the utterance in flight on the main thread and
//! sends [`NarrationCmd`]s to the narration thread. Completion messages come
//! back through [`Narrator::handle_message`]; messages for anything other
//! than the utterance in flight are stale and ignored, so a cancelled
//! utterance can never advance the queue.
//!
//! When no backend was available at setup the narrator is created with
//! [`Narrator::unavailable`] and every call is a no-op.

use std::collections::VecDeque;

use crossbeam_channel::Sender;
use log::{debug, info, warn};

use super::text::clean_text;
use super::voice::{GAME_TEXT_RATE, SpeakOptions, VoiceSettings};
use crate::events::narration::{NarrationCmd, NarrationMessage, UtteranceId};
use bevy_ecs::prelude::Resource;

/// Delay before scene narration starts, letting the UI settle.
pub const DEFAULT_GAME_TEXT_DELAY: f32 = 0.3;

#[derive(Debug, Clone)]
struct Utterance {
    text: String,
    options: SpeakOptions,
}

#[derive(Debug, Clone)]
struct Delayed {
    remaining: f32,
    utterance: Utterance,
}

/// Snapshot returned by [`Narrator::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationStatus {
    pub enabled: bool,
    pub speaking: bool,
    pub queue_length: usize,
    pub has_voice: bool,
    pub supported: bool,
}

#[derive(Resource, Debug)]
pub struct Narrator {
    tx_cmd: Option<Sender<NarrationCmd>>,
    enabled: bool,
    settings: VoiceSettings,
    has_voice: bool,
    queue: VecDeque<Utterance>,
    in_flight: Option<UtteranceId>,
    started: bool,
    paused: bool,
    next_id: UtteranceId,
    delayed: Vec<Delayed>,
    game_text_delay: f32,
}

impl Narrator {
    pub fn new(tx_cmd: Sender<NarrationCmd>, settings: VoiceSettings, has_voice: bool) -> Self {
        Self {
            tx_cmd: Some(tx_cmd),
            enabled: true,
            settings,
            has_voice,
            queue: VecDeque::new(),
            in_flight: None,
            started: false,
            paused: false,
            next_id: 1,
            delayed: Vec::new(),
            game_text_delay: DEFAULT_GAME_TEXT_DELAY,
        }
    }

    /// Narrator for a platform without speech. Every call is a no-op.
    pub fn unavailable() -> Self {
        Self {
            tx_cmd: None,
            enabled: false,
            settings: VoiceSettings::default(),
            has_voice: false,
            queue: VecDeque::new(),
            in_flight: None,
            started: false,
            paused: false,
            next_id: 1,
            delayed: Vec::new(),
            game_text_delay: DEFAULT_GAME_TEXT_DELAY,
        }
    }

    pub fn with_game_text_delay(mut self, seconds: f32) -> Self {
        self.game_text_delay = seconds.max(0.0);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.tx_cmd.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// An utterance has been handed to the backend and not yet finished.
    pub fn is_speaking(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: VoiceSettings) {
        self.settings = settings;
    }

    fn active(&self) -> bool {
        self.enabled && self.tx_cmd.is_some()
    }

    fn send(&mut self, cmd: NarrationCmd) -> bool {
        let Some(tx) = self.tx_cmd.as_ref() else {
            return false;
        };
        if let Err(e) = tx.send(cmd) {
            warn!("narration thread is gone, disabling narration: {}", e);
            self.tx_cmd = None;
            self.in_flight = None;
            self.queue.clear();
            self.delayed.clear();
            return false;
        }
        true
    }

    /// Cancel anything in flight, drop the queue and speak `text` now.
    pub fn speak(&mut self, text: &str, options: SpeakOptions) {
        if !self.active() {
            return;
        }
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return;
        }
        self.stop();
        self.start(cleaned, &options);
    }

    /// Speak `text` after everything already queued.
    pub fn queue(&mut self, text: &str, options: SpeakOptions) {
        if !self.active() || text.trim().is_empty() {
            return;
        }
        self.queue.push_back(Utterance {
            text: text.to_string(),
            options,
        });
        if self.in_flight.is_none() {
            self.process_queue();
        }
    }

    fn process_queue(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        while let Some(next) = self.queue.pop_front() {
            let cleaned = clean_text(&next.text);
            if cleaned.is_empty() {
                continue;
            }
            self.start(cleaned, &next.options);
            break;
        }
    }

    fn start(&mut self, text: String, options: &SpeakOptions) {
        let id = self.next_id;
        self.next_id += 1;
        let settings = options.resolve(&self.settings);
        debug!("narration #{} -> {}", id, text);
        if self.send(NarrationCmd::Speak { id, text, settings }) {
            self.in_flight = Some(id);
            self.started = false;
            self.paused = false;
        }
    }

    /// Cancel the utterance in flight and drop the queue. Safe when idle.
    pub fn stop(&mut self) {
        if self.in_flight.take().is_some() {
            self.send(NarrationCmd::Cancel);
        }
        self.started = false;
        self.paused = false;
        self.queue.clear();
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn pause(&mut self) {
        if self.in_flight.is_some() && !self.paused && self.send(NarrationCmd::Pause) {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused && self.send(NarrationCmd::Resume) {
            self.paused = false;
        }
    }

    /// Flip narration on or off. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        let enabled = !self.enabled;
        self.set_enabled(enabled);
        self.enabled
    }

    /// Disabling stops speech and forgets everything pending; nothing is
    /// replayed when narration is enabled again.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && self.tx_cmd.is_none() {
            debug!("narration unavailable, ignoring enable");
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.stop();
            self.delayed.clear();
        }
        info!("Narration {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn status(&self) -> NarrationStatus {
        NarrationStatus {
            enabled: self.enabled,
            speaking: self.started && self.in_flight.is_some(),
            queue_length: self.queue.len(),
            has_voice: self.has_voice,
            supported: self.tx_cmd.is_some(),
        }
    }

    /// Speak scene text at the slower game rate once `delay` seconds have
    /// passed (default delay when `None`).
    pub fn speak_game_text(&mut self, text: &str, options: SpeakOptions, delay: Option<f32>) {
        if !self.active() {
            return;
        }
        let mut options = options;
        options.rate.get_or_insert(GAME_TEXT_RATE);
        self.delayed.push(Delayed {
            remaining: delay.unwrap_or(self.game_text_delay).max(0.0),
            utterance: Utterance {
                text: text.to_string(),
                options,
            },
        });
    }

    /// Number of delayed utterances still waiting for their timer.
    pub fn pending_delayed(&self) -> usize {
        self.delayed.len()
    }

    /// Advance delayed-speech timers and speak the ones that are due.
    pub fn tick(&mut self, dt: f32) {
        if self.delayed.is_empty() {
            return;
        }
        let mut due = Vec::new();
        self.delayed.retain_mut(|d| {
            d.remaining -= dt;
            if d.remaining <= 0.0 {
                due.push(d.utterance.clone());
                false
            } else {
                true
            }
        });
        for utterance in due {
            self.speak(&utterance.text, utterance.options);
        }
    }

    /// Apply a completion message from the narration thread.
    pub fn handle_message(&mut self, msg: &NarrationMessage) {
        match msg {
            NarrationMessage::Started { id } if self.in_flight == Some(*id) => {
                self.started = true;
            }
            NarrationMessage::Ended { id } if self.in_flight == Some(*id) => {
                self.finish();
            }
            NarrationMessage::Errored { id, error } if self.in_flight == Some(*id) => {
                warn!("narration #{} failed: {}", id, error);
                self.finish();
            }
            stale => debug!("ignoring stale narration message {:?}", stale),
        }
    }

    fn finish(&mut self) {
        self.in_flight = None;
        self.started = false;
        self.paused = false;
        self.process_queue();
    }
}
