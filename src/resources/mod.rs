//! ECS resources made available to systems.
//!
//! Overview
//! - `accessibility` – overlay state, color-vision modes and display filters
//! - `audio` – bridge and channels for the background audio thread
//! - `filtershader` – GPU shader applying the display filter
//! - `focus` – focus engine: focusable list, index, navigation tables
//! - `gameconfig` – INI-backed settings
//! - `input` – per-frame keyboard state of the keys the game reacts to
//! - `narration` – narrator queue, text cleanup, voices, narration thread bridge
//! - `rendertarget` – fixed-resolution framebuffer
//! - `scene` – current/next scene, scene registry and game selection
//! - `scenesurface` – named elements and callbacks a scene exposes to the focus engine
//! - `screensize` – render resolution in pixels
//! - `windowsize` – OS window size and letterbox mapping
//! - `worldtime` – simulation time and delta
pub mod accessibility;
pub mod audio;
pub mod filtershader;
pub mod focus;
pub mod gameconfig;
pub mod input;
pub mod narration;
pub mod rendertarget;
pub mod scene;
pub mod scenesurface;
pub mod screensize;
pub mod windowsize;
pub mod worldtime;
