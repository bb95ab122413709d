//! Z-index component for render ordering.
//!
//! Elements are drawn in ascending [`ZIndex`] order. Scene content stays
//! below [`GLOW_Z`] so the focus indicator is always drawn on top of the
//! element it surrounds; the ADA affordance, the control legend and the
//! overlay panel sit above the glow.

use bevy_ecs::prelude::Component;

/// Layer of the focus glow.
pub const GLOW_Z: i32 = 100;
/// ADA affordance and control legend.
pub const AFFORDANCE_Z: i32 = 150;
/// Base layer of the overlay panel.
pub const OVERLAY_Z: i32 = 200;

/// Rendering order hint. Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
