//! Speech through the platform's command-line synthesizer.
//!
//! [`CommandSpeech`] runs `say` (macOS) or `espeak-ng`/`espeak` (Linux and
//! others) once per utterance and watches the child process for completion.
//! [`open_backend`] picks it when a synthesizer is on `PATH` and falls back
//! to [`ConsoleSpeech`] otherwise.

use std::env;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use log::{debug, info, warn};

use super::backend::{ConsoleSpeech, NarrationError, SpeechBackend};
use super::voice::{Voice, VoiceSettings};

/// Words per minute at rate 1.0, the default of both `say` and `espeak`.
const BASE_WPM: f32 = 175.0;

/// Which speech engine the narrator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechEngine {
    /// Platform synthesizer when one is installed, log-only otherwise.
    #[default]
    Auto,
    /// Log-only narration.
    Console,
}

impl SpeechEngine {
    pub fn from_config(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(SpeechEngine::Auto),
            "console" => Some(SpeechEngine::Console),
            _ => None,
        }
    }

    pub fn as_config(&self) -> &'static str {
        match self {
            SpeechEngine::Auto => "auto",
            SpeechEngine::Console => "console",
        }
    }
}

/// Command-line flavours the backend knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synthesizer {
    Say,
    Espeak,
}

impl Synthesizer {
    /// Programs tried in order, with the flavour each one speaks.
    pub const CANDIDATES: [(&'static str, Synthesizer); 3] = [
        ("say", Synthesizer::Say),
        ("espeak-ng", Synthesizer::Espeak),
        ("espeak", Synthesizer::Espeak),
    ];

    /// Arguments that speak `text` with `settings`.
    pub fn args(&self, text: &str, settings: &VoiceSettings) -> Vec<String> {
        let wpm = (BASE_WPM * settings.rate.clamp(0.1, 10.0)).round() as u32;
        match self {
            Synthesizer::Say => {
                let mut args = vec!["-r".to_string(), wpm.to_string()];
                if let Some(voice) = settings.voice.as_ref() {
                    args.push("-v".to_string());
                    args.push(voice.clone());
                }
                args.push("--".to_string());
                args.push(text.to_string());
                args
            }
            Synthesizer::Espeak => {
                // espeak pitch is 0..=99 around 50, amplitude 0..=200 around 100.
                let pitch = (settings.pitch.clamp(0.0, 2.0) * 50.0).round().min(99.0) as u32;
                let amplitude = (settings.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
                vec![
                    "-s".to_string(),
                    wpm.to_string(),
                    "-p".to_string(),
                    pitch.to_string(),
                    "-a".to_string(),
                    amplitude.to_string(),
                    "-v".to_string(),
                    espeak_voice(&settings.lang),
                    "--".to_string(),
                    text.to_string(),
                ]
            }
        }
    }
}

/// espeak names voices by lowercase language tag (`en-us`).
fn espeak_voice(lang: &str) -> String {
    let lang = lang.trim();
    if lang.is_empty() {
        "en-us".to_string()
    } else {
        lang.to_ascii_lowercase()
    }
}

fn on_path(program: &str) -> bool {
    env::var_os("PATH").is_some_and(|paths| {
        env::split_paths(&paths).any(|dir| Path::new(&dir).join(program).is_file())
    })
}

/// Backend that speaks each utterance through a synthesizer process.
///
/// Pausing stops the process; resuming speaks the interrupted utterance again
/// from the start.
#[derive(Debug)]
pub struct CommandSpeech {
    program: String,
    synth: Synthesizer,
    child: Option<Child>,
    /// Utterance to replay on resume.
    paused: Option<(String, VoiceSettings)>,
    current: Option<(String, VoiceSettings)>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, synth: Synthesizer) -> Self {
        Self {
            program: program.into(),
            synth,
            child: None,
            paused: None,
            current: None,
        }
    }

    /// First synthesizer found on `PATH`.
    pub fn detect() -> Option<Self> {
        Synthesizer::CANDIDATES
            .iter()
            .find(|(program, _)| on_path(program))
            .map(|(program, synth)| Self::new(*program, *synth))
    }

    fn spawn(&mut self, text: &str, settings: &VoiceSettings) -> Result<(), NarrationError> {
        let child = Command::new(&self.program)
            .args(self.synth.args(text, settings))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| NarrationError::Backend(format!("{}: {}", self.program, e)))?;
        self.child = Some(child);
        self.current = Some((text.to_string(), settings.clone()));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl SpeechBackend for CommandSpeech {
    fn name(&self) -> &str {
        &self.program
    }

    fn voices(&self) -> Vec<Voice> {
        // Both tools pick a sensible default voice on their own.
        Vec::new()
    }

    fn start(&mut self, text: &str, settings: &VoiceSettings) -> Result<(), NarrationError> {
        self.stop();
        self.paused = None;
        self.spawn(text, settings)
    }

    fn cancel(&mut self) {
        self.stop();
        self.paused = None;
        self.current = None;
    }

    fn pause(&mut self) {
        if self.child.is_some() {
            self.stop();
            self.paused = self.current.take();
        }
    }

    fn resume(&mut self) {
        if let Some((text, settings)) = self.paused.take()
            && let Err(e) = self.spawn(&text, &settings)
        {
            warn!("could not resume narration: {}", e);
        }
    }

    fn poll_finished(&mut self, _elapsed: Duration) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    debug!("{} exited with {}", self.program, status);
                }
                self.child = None;
                self.current = None;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("lost track of {}: {}", self.program, e);
                self.child = None;
                self.current = None;
                true
            }
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Speech backend for `engine`.
pub fn open_backend(engine: SpeechEngine) -> Box<dyn SpeechBackend> {
    if engine == SpeechEngine::Auto {
        if let Some(speech) = CommandSpeech::detect() {
            info!("speaking through '{}'", speech.program);
            return Box::new(speech);
        }
        info!("no speech synthesizer on PATH, narrating to the log");
    }
    Box::new(ConsoleSpeech::new())
}
