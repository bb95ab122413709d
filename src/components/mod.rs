//! ECS components for entities.
//!
//! Everything on screen is a screen-space [`uielement::UiElement`] placed by
//! a [`screenposition::ScreenPosition`] and optionally resized by a
//! [`scale::Scale`]. The remaining components tag elements for the focus
//! engine, the overlay and the render pass.
//!
//! Submodules overview:
//! - [`focusable`] – markers for option collections, clickables and delayed reveals
//! - [`focusglow`] – the focus indicator layer and its geometry
//! - [`opacity`] – whole-drawable alpha multiplier
//! - [`overlay`] – parts of the accessibility overlay panel
//! - [`persistent`] – marker for entities that survive scene changes
//! - [`scale`] – 2D scale factor
//! - [`screenposition`] – screen-space pivot position
//! - [`tween`] – animated interpolation of opacity and scale
//! - [`uielement`] – renderable, clickable element with liveness flags
//! - [`zindex`] – draw order and the fixed layers above scene content

pub mod focusable;
pub mod focusglow;
pub mod opacity;
pub mod overlay;
pub mod persistent;
pub mod scale;
pub mod screenposition;
pub mod tween;
pub mod uielement;
pub mod zindex;
