//! Speech backends driven by the narration thread.
//!
//! A backend owns the platform speech engine. The narration thread calls it
//! from a single thread only; the main thread never touches it after setup.

use std::time::Duration;

use log::info;
use thiserror::Error;

use super::voice::{Voice, VoiceSettings};

#[derive(Debug, Error)]
pub enum NarrationError {
    /// No speech engine is available on this platform.
    #[error("speech backend unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected or aborted an utterance.
    #[error("speech backend failure: {0}")]
    Backend(String),
}

/// Minimal surface of a speech engine.
pub trait SpeechBackend: Send + 'static {
    fn name(&self) -> &str;

    /// Voices the engine can use.
    fn voices(&self) -> Vec<Voice>;

    /// Begin speaking `text`. Replaces anything currently being spoken.
    fn start(&mut self, text: &str, settings: &VoiceSettings) -> Result<(), NarrationError>;

    fn cancel(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Advance by `elapsed`. Returns `true` once when the current utterance
    /// has finished.
    fn poll_finished(&mut self, elapsed: Duration) -> bool;
}

/// Characters per second at rate 1.0.
const CONSOLE_CHARS_PER_SECOND: f32 = 15.0;
const CONSOLE_MIN_SECONDS: f32 = 0.3;

/// Backend that writes utterances to the log and paces them like speech.
///
/// Used where no platform speech engine is wired in; the narrator behaves
/// exactly as with a real engine (one utterance at a time, completion after a
/// plausible duration).
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    remaining: Option<f32>,
    paused: bool,
}

impl ConsoleSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds it takes to "say" `text` at `rate`.
    pub fn estimate(text: &str, rate: f32) -> f32 {
        let chars = text.chars().count() as f32;
        (chars / (CONSOLE_CHARS_PER_SECOND * rate.max(0.1))).max(CONSOLE_MIN_SECONDS)
    }
}

impl SpeechBackend for ConsoleSpeech {
    fn name(&self) -> &str {
        "console"
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Console", "en-US")]
    }

    fn start(&mut self, text: &str, settings: &VoiceSettings) -> Result<(), NarrationError> {
        info!("[narration] \"{}\"", text);
        self.remaining = Some(Self::estimate(text, settings.rate));
        self.paused = false;
        Ok(())
    }

    fn cancel(&mut self) {
        self.remaining = None;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn poll_finished(&mut self, elapsed: Duration) -> bool {
        if self.paused {
            return false;
        }
        match self.remaining.as_mut() {
            Some(remaining) => {
                *remaining -= elapsed.as_secs_f32();
                if *remaining <= 0.0 {
                    self.remaining = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_speech_finishes_once() {
        let mut speech = ConsoleSpeech::new();
        speech
            .start("hello there", &VoiceSettings::default())
            .expect("console speech never fails");
        assert!(!speech.poll_finished(Duration::from_millis(100)));
        assert!(speech.poll_finished(Duration::from_secs(5)));
        assert!(!speech.poll_finished(Duration::from_secs(5)));
    }

    #[test]
    fn test_paused_speech_does_not_advance() {
        let mut speech = ConsoleSpeech::new();
        speech
            .start("hi", &VoiceSettings::default())
            .expect("console speech never fails");
        speech.pause();
        assert!(!speech.poll_finished(Duration::from_secs(10)));
        speech.resume();
        assert!(speech.poll_finished(Duration::from_secs(10)));
    }

    #[test]
    fn test_cancel_reports_nothing() {
        let mut speech = ConsoleSpeech::new();
        speech
            .start("hi", &VoiceSettings::default())
            .expect("console speech never fails");
        speech.cancel();
        assert!(!speech.poll_finished(Duration::from_secs(10)));
    }
}
