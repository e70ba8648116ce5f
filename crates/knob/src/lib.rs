pub mod control;
pub mod error;
pub mod geometry;
pub mod render;
pub mod theme;
pub mod tracker;

pub use control::{Control, Knob, KnobEvent};
pub use error::KnobError;
pub use geometry::{Point, Rect, Vector};
pub use render::{Boundary, Indicator, RenderState};
pub use theme::KnobStyle;
pub use tracker::{AngleTracker, Rotation};
