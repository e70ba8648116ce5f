use crate::geometry::{Point, Rect};
use crate::theme::KnobStyle;
use palette::Srgba;

/// Outer circle of the knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center: Point,
    pub radius: f64,
    pub line_width: f64,
    pub stroke: Srgba<f64>,
    pub fill: Srgba<f64>,
}

impl Boundary {
    /// Largest circle whose stroke fits inside `bounds`, centred even when the
    /// bounds are not square.
    pub fn fit(bounds: &Rect, line_width: f64) -> (Point, f64) {
        let (mut dx, mut dy) = (line_width / 2.0, line_width / 2.0);
        if bounds.width > bounds.height {
            dx += (bounds.width - bounds.height) / 2.0;
        } else if bounds.height > bounds.width {
            dy += (bounds.height - bounds.width) / 2.0;
        }
        let oval = bounds.inset(dx, dy);
        (bounds.center(), oval.short_side() / 2.0)
    }
}

/// Tick mark pointing at the current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    /// End near the boundary.
    pub start: Point,
    /// End towards the centre.
    pub end: Point,
    pub line_width: f64,
    pub stroke: Srgba<f64>,
}

impl Indicator {
    pub fn segment(bounds: &Rect, line_width: f64, angle: f64) -> (Point, Point) {
        // keep the tick inside the boundary stroke
        let side = (bounds.short_side() - 2.0 * line_width).max(0.0);
        let center = bounds.center();
        (
            center.polar_offset(side / 2.0, angle),
            center.polar_offset(side / 3.0, angle),
        )
    }
}

/// Everything a painter needs to draw the knob. Recomputed as a whole
/// whenever bounds, angle, enabled state or style change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub boundary: Boundary,
    pub indicator: Indicator,
}

impl RenderState {
    pub fn compute(bounds: &Rect, angle: f64, enabled: bool, style: &KnobStyle) -> Self {
        let stroke = style.stroke(enabled);
        let (center, radius) = Boundary::fit(bounds, style.line_width);
        let (start, end) = Indicator::segment(bounds, style.line_width, angle);

        Self {
            boundary: Boundary {
                center,
                radius,
                line_width: style.line_width,
                stroke,
                fill: style.fill(enabled),
            },
            indicator: Indicator {
                start,
                end,
                line_width: style.line_width,
                stroke,
            },
        }
    }
}
