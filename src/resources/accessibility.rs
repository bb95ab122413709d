//! Accessibility overlay state and display filters.
//!
//! [`OverlayState`] is process-wide: it is inserted once at startup and
//! survives every scene change. Each mutation recomputes the
//! [`DisplayFilter`], a left-to-right chain of CSS-style filter primitives
//! that the render pass collapses into a single affine color matrix and hands
//! to the post-process shader.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Color;
use smallvec::SmallVec;

/// Color-vision assistance mode. Cycles Off → Deuteranopia → Protanopia →
/// Tritanopia → Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorVisionMode {
    #[default]
    Off,
    Deuteranopia,
    Protanopia,
    Tritanopia,
}

impl ColorVisionMode {
    pub fn next(self) -> Self {
        match self {
            ColorVisionMode::Off => ColorVisionMode::Deuteranopia,
            ColorVisionMode::Deuteranopia => ColorVisionMode::Protanopia,
            ColorVisionMode::Protanopia => ColorVisionMode::Tritanopia,
            ColorVisionMode::Tritanopia => ColorVisionMode::Off,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorVisionMode::Off => "Off",
            ColorVisionMode::Deuteranopia => "Deuteranopia",
            ColorVisionMode::Protanopia => "Protanopia",
            ColorVisionMode::Tritanopia => "Tritanopia",
        }
    }

    pub fn is_active(&self) -> bool {
        *self != ColorVisionMode::Off
    }

    /// Parse the config file spelling. Unknown values are `None`.
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "" => Some(ColorVisionMode::Off),
            "deuteranopia" => Some(ColorVisionMode::Deuteranopia),
            "protanopia" => Some(ColorVisionMode::Protanopia),
            "tritanopia" => Some(ColorVisionMode::Tritanopia),
            _ => None,
        }
    }

    pub fn as_config(&self) -> &'static str {
        match self {
            ColorVisionMode::Off => "off",
            ColorVisionMode::Deuteranopia => "deuteranopia",
            ColorVisionMode::Protanopia => "protanopia",
            ColorVisionMode::Tritanopia => "tritanopia",
        }
    }

    /// Background of the keyboard hint bar for this mode.
    pub fn legend_background(&self) -> Color {
        match self {
            ColorVisionMode::Off => Color::new(59, 57, 57, 255),
            ColorVisionMode::Deuteranopia => Color::new(59, 57, 57, 230),
            ColorVisionMode::Protanopia => Color::new(59, 57, 57, 242),
            ColorVisionMode::Tritanopia => Color::new(45, 45, 45, 242),
        }
    }

    /// Filter primitives for this mode, in application order.
    pub fn recipe(&self) -> &'static [FilterOp] {
        match self {
            ColorVisionMode::Off => &[],
            ColorVisionMode::Deuteranopia => &[
                FilterOp::Sepia(0.3),
                FilterOp::Saturate(1.2),
                FilterOp::HueRotate(10.0),
                FilterOp::Contrast(1.1),
            ],
            ColorVisionMode::Protanopia => &[
                FilterOp::Sepia(0.2),
                FilterOp::Saturate(1.3),
                FilterOp::HueRotate(20.0),
                FilterOp::Contrast(1.2),
            ],
            ColorVisionMode::Tritanopia => &[
                FilterOp::Sepia(0.1),
                FilterOp::Saturate(1.4),
                FilterOp::HueRotate(-10.0),
                FilterOp::Contrast(1.1),
                FilterOp::Brightness(1.1),
            ],
        }
    }
}

/// Appended to the mode recipe when high contrast is on.
pub const HIGH_CONTRAST_SUFFIX: [FilterOp; 2] =
    [FilterOp::Contrast(1.8), FilterOp::Brightness(1.2)];

/// A single CSS filter primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Sepia(f32),
    Saturate(f32),
    /// Degrees.
    HueRotate(f32),
    Contrast(f32),
    Brightness(f32),
}

impl FilterOp {
    /// Affine matrix implementing this primitive.
    pub fn matrix(&self) -> ColorMatrix {
        match *self {
            FilterOp::Sepia(amount) => {
                let k = 1.0 - amount.clamp(0.0, 1.0);
                ColorMatrix::linear([
                    [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                    [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                    [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                ])
            }
            FilterOp::Saturate(s) => ColorMatrix::linear([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            FilterOp::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                ColorMatrix::linear([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            FilterOp::Contrast(c) => {
                let offset = 0.5 - 0.5 * c;
                ColorMatrix {
                    rows: [
                        [c, 0.0, 0.0, offset],
                        [0.0, c, 0.0, offset],
                        [0.0, 0.0, c, offset],
                    ],
                }
            }
            FilterOp::Brightness(b) => {
                ColorMatrix::linear([[b, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, b]])
            }
        }
    }

    fn css(&self) -> String {
        match self {
            FilterOp::Sepia(v) => format!("sepia({v})"),
            FilterOp::Saturate(v) => format!("saturate({v})"),
            FilterOp::HueRotate(v) => format!("hue-rotate({v}deg)"),
            FilterOp::Contrast(v) => format!("contrast({v})"),
            FilterOp::Brightness(v) => format!("brightness({v})"),
        }
    }
}

/// Affine color transform on normalized RGB. Each row is
/// `[r, g, b, offset]` for one output channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub rows: [[f32; 4]; 3],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    pub fn identity() -> Self {
        Self::linear([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    fn linear(m: [[f32; 3]; 3]) -> Self {
        Self {
            rows: [
                [m[0][0], m[0][1], m[0][2], 0.0],
                [m[1][0], m[1][1], m[1][2], 0.0],
                [m[2][0], m[2][1], m[2][2], 0.0],
            ],
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let a = &self.rows;
        let b = &next.rows;
        let mut rows = [[0.0; 4]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().take(3).enumerate() {
                *cell = (0..3).map(|k| b[i][k] * a[k][j]).sum();
            }
            row[3] = (0..3).map(|k| b[i][k] * a[k][3]).sum::<f32>() + b[i][3];
        }
        ColorMatrix { rows }
    }

    /// Transform one normalized color, clamped to `[0, 1]`.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let r = &self.rows[i];
            *channel = (r[0] * rgb[0] + r[1] * rgb[1] + r[2] * rgb[2] + r[3]).clamp(0.0, 1.0);
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        let id = Self::identity();
        self.rows
            .iter()
            .flatten()
            .zip(id.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() < 1e-6)
    }
}

/// Composed display filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayFilter {
    pub ops: SmallVec<[FilterOp; 8]>,
}

impl DisplayFilter {
    /// Mode recipe, then the high contrast suffix when enabled.
    pub fn for_state(mode: ColorVisionMode, high_contrast: bool) -> Self {
        let mut ops: SmallVec<[FilterOp; 8]> = SmallVec::new();
        ops.extend_from_slice(mode.recipe());
        if high_contrast {
            ops.extend_from_slice(&HIGH_CONTRAST_SUFFIX);
        }
        Self { ops }
    }

    pub fn is_none(&self) -> bool {
        self.ops.is_empty()
    }

    /// Collapse the chain into one matrix.
    pub fn matrix(&self) -> ColorMatrix {
        self.ops
            .iter()
            .fold(ColorMatrix::identity(), |acc, op| acc.then(&op.matrix()))
    }

    /// CSS spelling, `none` when empty. Used in logs.
    pub fn css(&self) -> String {
        if self.ops.is_empty() {
            return "none".to_string();
        }
        self.ops
            .iter()
            .map(FilterOp::css)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Process-wide accessibility state.
#[derive(Resource, Debug, Clone)]
pub struct OverlayState {
    pub is_open: bool,
    pub speech_enabled: bool,
    pub color_vision: ColorVisionMode,
    pub high_contrast: bool,
    filter: DisplayFilter,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(true, ColorVisionMode::Off, false)
    }
}

impl OverlayState {
    pub fn new(speech_enabled: bool, color_vision: ColorVisionMode, high_contrast: bool) -> Self {
        Self {
            is_open: false,
            speech_enabled,
            color_vision,
            high_contrast,
            filter: DisplayFilter::for_state(color_vision, high_contrast),
        }
    }

    pub fn filter(&self) -> &DisplayFilter {
        &self.filter
    }

    fn recompute_filter(&mut self) {
        self.filter = DisplayFilter::for_state(self.color_vision, self.high_contrast);
    }

    /// Returns the new open state.
    pub fn toggle_open(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Returns the new speech state.
    pub fn toggle_speech(&mut self) -> bool {
        self.speech_enabled = !self.speech_enabled;
        self.speech_enabled
    }

    /// Returns the new mode.
    pub fn cycle_color_vision(&mut self) -> ColorVisionMode {
        self.color_vision = self.color_vision.next();
        self.recompute_filter();
        self.color_vision
    }

    /// Returns the new high contrast state.
    pub fn toggle_high_contrast(&mut self) -> bool {
        self.high_contrast = !self.high_contrast;
        self.recompute_filter();
        self.high_contrast
    }
}
