//! Accessibility overlay parts.
//!
//! The overlay panel is spawned once at startup as a set of
//! [`Persistent`](super::persistent::Persistent) entities, each tagged with an
//! [`OverlayPart`]. Opening and closing the panel flips the `visible` flag on
//! their [`UiElement`](super::uielement::UiElement)s.
//!
//! The [`AdaAffordance`] marks the always-visible ADA toggle in the bottom
//! left corner (icon and label). [`ControlLegend`] marks the keyboard hint bar
//! whose background follows the color-vision mode.

use bevy_ecs::prelude::Component;

/// One of the three rows of the overlay panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayRow {
    Narration,
    ColorVision,
    HighContrast,
}

impl OverlayRow {
    pub const ALL: [OverlayRow; 3] = [
        OverlayRow::Narration,
        OverlayRow::ColorVision,
        OverlayRow::HighContrast,
    ];

    /// Label text shown next to the toggle box.
    pub fn label(&self) -> &'static str {
        match self {
            OverlayRow::Narration => "Text to Speech (T)",
            OverlayRow::ColorVision => "Colorblind Support (C)",
            OverlayRow::HighContrast => "High Contrast (H)",
        }
    }
}

/// Role of an overlay panel entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayPart {
    Background,
    Border,
    Title,
    /// Clickable toggle box of a row.
    RowToggle(OverlayRow),
    RowLabel(OverlayRow),
    /// `ON`/`OFF` or mode name of a row.
    RowStatus(OverlayRow),
    CloseButton,
    CloseText,
}

impl OverlayPart {
    /// Parts that react to pointer clicks while the panel is open.
    pub fn is_clickable(&self) -> bool {
        matches!(self, OverlayPart::RowToggle(_) | OverlayPart::CloseButton)
    }
}

/// Fixed-position affordance that toggles the overlay.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdaAffordance {
    Icon,
    Label,
}

/// Keyboard hint bar shown along the bottom of every scene.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ControlLegend;
