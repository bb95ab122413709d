//! Event types and observers.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`focus`] – pointer down/up signals targeted at scene elements
//! - [`input`] – logical key actions
//! - [`narration`] – commands and replies of the narration thread
//! - [`overlay`] – accessibility overlay commands
//! - [`scene`] – scene transition notification and its observer
pub mod audio;
pub mod focus;
pub mod input;
pub mod narration;
pub mod overlay;
pub mod scene;
