//! Voice settings and voice selection.

/// Voices tried first, in order, when picking the narration voice.
pub const PREFERRED_VOICES: [&str; 5] = [
    "Microsoft Zira - English (United States)",
    "Google US English",
    "Alex",
    "Samantha",
    "Victoria",
];

/// Rate used for scene narration, slightly slower than the default.
pub const GAME_TEXT_RATE: f32 = 0.8;

/// A voice offered by the speech backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Fully resolved settings for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: String,
    /// Voice name, `None` lets the backend choose.
    pub voice: Option<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
            lang: "en-US".to_string(),
            voice: None,
        }
    }
}

/// Per-utterance overrides. Unset fields fall back to the narrator defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakOptions {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub lang: Option<String>,
    pub voice: Option<String>,
}

impl SpeakOptions {
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn resolve(&self, defaults: &VoiceSettings) -> VoiceSettings {
        VoiceSettings {
            rate: self.rate.unwrap_or(defaults.rate).clamp(0.1, 10.0),
            pitch: self.pitch.unwrap_or(defaults.pitch).clamp(0.0, 2.0),
            volume: self.volume.unwrap_or(defaults.volume).clamp(0.0, 1.0),
            lang: self.lang.clone().unwrap_or_else(|| defaults.lang.clone()),
            voice: self.voice.clone().or_else(|| defaults.voice.clone()),
        }
    }
}

/// Pick the narration voice: a preferred voice by exact name, else the first
/// English voice, else the first voice at all.
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    PREFERRED_VOICES
        .iter()
        .find_map(|name| voices.iter().find(|v| v.name == *name))
        .or_else(|| {
            voices
                .iter()
                .find(|v| v.lang.starts_with("en") || v.lang.contains("US"))
        })
        .or_else(|| voices.first())
}
