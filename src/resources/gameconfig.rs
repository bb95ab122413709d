//! Game configuration resource.
//!
//! Settings loaded from an INI file. Missing files or keys keep the defaults,
//! so the game always starts.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 1280
//! height = 720
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//! vsync = true
//!
//! [focus]
//! poll_interval_ms = 100
//!
//! [narration]
//! enabled = true
//! engine = auto
//! rate = 0.9
//! pitch = 1.0
//! volume = 0.8
//! lang = en-US
//! scene_delay_ms = 300
//!
//! [accessibility]
//! color_vision = off
//! high_contrast = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::resources::accessibility::{ColorVisionMode, OverlayState};
use crate::resources::narration::{SpeechEngine, VoiceSettings};

const DEFAULT_RENDER_WIDTH: u32 = 1280;
const DEFAULT_RENDER_HEIGHT: u32 = 720;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_POLL_INTERVAL_MS: u32 = 100;
const DEFAULT_SCENE_DELAY_MS: u32 = 300;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub render_width: u32,
    pub render_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub vsync: bool,
    /// Focus rediscovery period in milliseconds.
    pub poll_interval_ms: u32,
    pub narration_enabled: bool,
    pub speech_engine: SpeechEngine,
    pub voice: VoiceSettings,
    /// Delay before scene narration, in milliseconds.
    pub scene_delay_ms: u32,
    pub color_vision: ColorVisionMode,
    pub high_contrast: bool,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            narration_enabled: true,
            speech_engine: SpeechEngine::Auto,
            voice: VoiceSettings::default(),
            scene_delay_ms: DEFAULT_SCENE_DELAY_MS,
            color_vision: ColorVisionMode::Off,
            high_contrast: false,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn poll_interval_secs(&self) -> f32 {
        self.poll_interval_ms.max(1) as f32 / 1000.0
    }

    pub fn scene_delay_secs(&self) -> f32 {
        self.scene_delay_ms as f32 / 1000.0
    }

    /// Accessibility state seeded from the saved preferences.
    pub fn overlay_state(&self) -> OverlayState {
        OverlayState::new(self.narration_enabled, self.color_vision, self.high_contrast)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [render]
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        // [window]
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [focus]
        if let Some(ms) = config.getuint("focus", "poll_interval_ms").ok().flatten() {
            self.poll_interval_ms = ms as u32;
        }

        // [narration]
        if let Some(enabled) = config.getbool("narration", "enabled").ok().flatten() {
            self.narration_enabled = enabled;
        }
        if let Some(engine) = config.get("narration", "engine") {
            match SpeechEngine::from_config(&engine) {
                Some(engine) => self.speech_engine = engine,
                None => warn!(
                    "unknown narration engine '{}', keeping {:?}",
                    engine, self.speech_engine
                ),
            }
        }
        if let Some(rate) = config.getfloat("narration", "rate").ok().flatten() {
            self.voice.rate = rate as f32;
        }
        if let Some(pitch) = config.getfloat("narration", "pitch").ok().flatten() {
            self.voice.pitch = pitch as f32;
        }
        if let Some(volume) = config.getfloat("narration", "volume").ok().flatten() {
            self.voice.volume = volume as f32;
        }
        if let Some(lang) = config.get("narration", "lang") {
            self.voice.lang = lang;
        }
        if let Some(ms) = config.getuint("narration", "scene_delay_ms").ok().flatten() {
            self.scene_delay_ms = ms as u32;
        }

        // [accessibility]
        if let Some(mode) = config.get("accessibility", "color_vision") {
            match ColorVisionMode::from_config(&mode) {
                Some(mode) => self.color_vision = mode,
                None => warn!("unknown color_vision '{}', keeping {:?}", mode, self.color_vision),
            }
        }
        if let Some(hc) = config.getbool("accessibility", "high_contrast").ok().flatten() {
            self.high_contrast = hc;
        }

        info!(
            "Loaded config: {}x{} render, {}x{} window, fps={}, narration={}, color_vision={}, high_contrast={}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.narration_enabled,
            self.color_vision.as_config(),
            self.high_contrast
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        config.set(
            "focus",
            "poll_interval_ms",
            Some(self.poll_interval_ms.to_string()),
        );

        config.set(
            "narration",
            "enabled",
            Some(self.narration_enabled.to_string()),
        );
        config.set(
            "narration",
            "engine",
            Some(self.speech_engine.as_config().to_string()),
        );
        config.set("narration", "rate", Some(self.voice.rate.to_string()));
        config.set("narration", "pitch", Some(self.voice.pitch.to_string()));
        config.set("narration", "volume", Some(self.voice.volume.to_string()));
        config.set("narration", "lang", Some(self.voice.lang.clone()));
        config.set(
            "narration",
            "scene_delay_ms",
            Some(self.scene_delay_ms.to_string()),
        );

        config.set(
            "accessibility",
            "color_vision",
            Some(self.color_vision.as_config().to_string()),
        );
        config.set(
            "accessibility",
            "high_contrast",
            Some(self.high_contrast.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Copy the live accessibility preferences so they are saved on exit.
    pub fn store_preferences(&mut self, state: &OverlayState) {
        self.narration_enabled = state.speech_enabled;
        self.color_vision = state.color_vision;
        self.high_contrast = state.high_contrast;
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut config = GameConfig::with_path("/definitely/not/here/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert!(config.narration_enabled);
        assert_eq!(config.color_vision, ColorVisionMode::Off);
    }

    #[test]
    fn test_time_helpers() {
        let config = GameConfig::new();
        assert!((config.poll_interval_secs() - 0.1).abs() < 1e-6);
        assert!((config.scene_delay_secs() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_overlay_state_from_preferences() {
        let mut config = GameConfig::new();
        config.color_vision = ColorVisionMode::Tritanopia;
        config.high_contrast = true;
        let state = config.overlay_state();
        assert_eq!(state.color_vision, ColorVisionMode::Tritanopia);
        assert!(state.high_contrast);
        assert!(!state.is_open);
    }
}
