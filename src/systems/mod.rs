//! Engine systems.
//!
//! This module groups all ECS systems that advance input, focus, narration
//! and rendering.
//!
//! Submodules overview
//! - [`audio`] – bridge with the audio thread (poll/update message queues)
//! - [`focus`] – focus poll, discovery and the activation boundary
//! - [`indicator`] – draw the focus glow around the focused element
//! - [`input`] – read the keyboard and route actions to focus or overlay
//! - [`narration`] – narration thread and its message bridge
//! - [`overlay`] – accessibility overlay panel and command observer
//! - [`pointer`] – mouse hit testing for overlay and scene elements
//! - [`render`] – draw the scene through the color filter using Raylib
//! - [`reveal`] – show elements once their reveal delay elapses
//! - [`scene`] – pending scene transitions and scene entry
//! - [`time`] – update simulation time and delta
//! - [`tween`] – animate opacity and scale over time

pub mod audio;
pub mod focus;
pub mod indicator;
pub mod input;
pub mod narration;
pub mod overlay;
pub mod pointer;
pub mod render;
pub mod reveal;
pub mod scene;
pub mod time;
pub mod tween;
