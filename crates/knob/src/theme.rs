use crate::error::KnobError;
use palette::{FromColor, Hsva, Srgba};

pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
pub const DISABLED_SATURATION_FACTOR: f64 = 0.5;
pub const DISABLED_BRIGHTNESS_FACTOR: f64 = 1.2;

/// System blue, the usual tint of a control with no theme override.
pub fn default_tint() -> Srgba<f64> {
    Srgba::new(0.0, 122.0 / 255.0, 1.0, 1.0)
}

pub fn transparent() -> Srgba<f64> {
    Srgba::new(0.0, 0.0, 0.0, 0.0)
}

/// Washed-out variant of `color` used while the control is disabled.
pub fn disabled_color(color: Srgba<f64>) -> Srgba<f64> {
    let mut hsv: Hsva<palette::encoding::Srgb, f64> = Hsva::from_color(color);
    hsv.saturation *= DISABLED_SATURATION_FACTOR;
    hsv.value = (hsv.value * DISABLED_BRIGHTNESS_FACTOR).min(1.0);
    Srgba::from_color(hsv)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobStyle {
    pub line_width: f64,
    pub tint: Srgba<f64>,
    pub background: Option<Srgba<f64>>,
}

impl Default for KnobStyle {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            tint: default_tint(),
            background: None,
        }
    }
}

impl KnobStyle {
    pub fn validate_line_width(width: f64) -> Result<f64, KnobError> {
        (width.is_finite() && width >= 0.0)
            .then_some(width)
            .ok_or(KnobError::InvalidLineWidth(width))
    }

    pub fn stroke(&self, enabled: bool) -> Srgba<f64> {
        if enabled {
            self.tint
        } else {
            disabled_color(self.tint)
        }
    }

    pub fn fill(&self, enabled: bool) -> Srgba<f64> {
        match self.background {
            Some(color) if enabled => color,
            Some(color) => disabled_color(color),
            None => transparent(),
        }
    }
}
