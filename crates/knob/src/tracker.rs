use crate::error::KnobError;
use crate::geometry::{Point, Vector, normalize};
use std::f64::consts::FRAC_PI_2;

/// Angle that maps to a reported value of zero after the `5π/2 - angle` remap.
const VALUE_ORIGIN: f64 = 5.0 * FRAC_PI_2;

/// Reported value (0 at 12 o'clock, clockwise) for an accumulated angle.
pub fn value_from_angle(angle: f64) -> f64 {
    normalize(VALUE_ORIGIN - angle)
}

/// Accumulated angle (counterclockwise from 3 o'clock) for a reported value.
pub fn angle_from_value(value: f64) -> f64 {
    normalize(VALUE_ORIGIN - value)
}

/// Outcome of one gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Counterclockwise change applied to the angle, in `[0, 2π)`.
    pub delta: f64,
    /// Reported value after the step.
    pub value: f64,
}

/// Accumulates pointer motion around a centre into an angle in `[0, 2π)`.
///
/// Only the change between consecutive samples is measured, so a drag that
/// crosses the 12 o'clock reference keeps moving smoothly instead of jumping
/// by a full turn. Motion of more than half a turn between two samples is
/// ambiguous and resolves counterclockwise.
#[derive(Debug, Clone)]
pub struct AngleTracker {
    last_vector: Option<Vector>,
    angle: f64,
}

impl Default for AngleTracker {
    fn default() -> Self {
        Self {
            last_vector: None,
            angle: FRAC_PI_2,
        }
    }
}

impl AngleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f64) -> Result<Self, KnobError> {
        let mut tracker = Self::default();
        tracker.set_value(value)?;
        Ok(tracker)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn value(&self) -> f64 {
        value_from_angle(self.angle)
    }

    pub fn set_value(&mut self, value: f64) -> Result<(), KnobError> {
        if !value.is_finite() {
            return Err(KnobError::NonFiniteValue(value));
        }
        self.angle = angle_from_value(value);
        Ok(())
    }

    pub fn is_tracking(&self) -> bool {
        self.last_vector.is_some()
    }

    pub fn begin_gesture(&mut self, pointer: Point, center: Point) {
        let vector = pointer - center;
        self.last_vector = (!vector.is_degenerate()).then_some(vector);
        if self.last_vector.is_none() {
            log::trace!("Gesture started on the centre, waiting for a direction");
        }
    }

    pub fn continue_gesture(&mut self, pointer: Point, center: Point) -> Rotation {
        let current = pointer - center;

        // no direction at the centre: keep the previous baseline
        if current.is_degenerate() {
            log::trace!("Ignoring degenerate pointer sample {:?}", pointer);
            return Rotation {
                delta: 0.0,
                value: self.value(),
            };
        }

        let delta = self
            .last_vector
            .map(|last| current.angle_from(&last))
            .unwrap_or(0.0);

        self.angle = normalize(self.angle + delta);
        self.last_vector = Some(current);

        Rotation {
            delta,
            value: self.value(),
        }
    }

    pub fn end_gesture(&mut self) {
        self.last_vector = None;
    }
}
