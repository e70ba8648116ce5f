use std::f64::consts::{PI, TAU};
use std::ops::Sub;

/// Reduces an angle into `[0, 2π)`.
pub fn normalize(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if r >= TAU { 0.0 } else { r }
}

/// Shortest unsigned distance between two angles on the circle, in `[0, π]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along `angle`, with screen y pointing down.
    pub fn polar_offset(&self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y - radius * angle.sin())
    }
}

impl Sub for Point {
    type Output = Vector;

    /// Vector from `rhs` to `self`.
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// A vector with no usable direction: zero length or a non-finite component.
    pub fn is_degenerate(&self) -> bool {
        !(self.dx.is_finite() && self.dy.is_finite()) || self.length() == 0.0
    }

    /// Direction in a y-up frame, counterclockwise from the positive x axis.
    pub fn screen_angle(&self) -> f64 {
        (-self.dy).atan2(self.dx)
    }

    /// Counterclockwise angle from `other` to `self`, in `[0, 2π)`.
    pub fn angle_from(&self, other: &Vector) -> f64 {
        normalize(self.screen_angle() - other.screen_angle())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    pub fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn inset(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }
}
