use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum KnobError {
    #[error("Knob value must be finite, got {0}")]
    NonFiniteValue(f64),
    #[error("Line width must be finite and non-negative, got {0}")]
    InvalidLineWidth(f64),
}
