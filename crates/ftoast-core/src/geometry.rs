#![forbid(unsafe_code)]

//! Geometric primitives in client (CSS pixel) coordinates.

use core::ops::Sub;

/// A position in client coordinates.
///
/// Origin at the top-left of the viewport, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to this point.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Self) -> Vector {
        Vector::new(self.x - origin.x, self.y - origin.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        self.delta_from(rhs)
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise absolute value.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Multiply both components by `factor`.
    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Largest absolute component.
    #[inline]
    #[must_use]
    pub fn max_abs(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_from_subtracts_origin() {
        let origin = Point::new(10.0, 20.0);
        let p = Point::new(15.0, 5.0);
        assert_eq!(p.delta_from(origin), Vector::new(5.0, -15.0));
        assert_eq!(p - origin, Vector::new(5.0, -15.0));
    }

    #[test]
    fn abs_and_max_abs() {
        let v = Vector::new(-3.0, 2.0);
        assert_eq!(v.abs(), Vector::new(3.0, 2.0));
        assert_eq!(v.max_abs(), 3.0);
    }
}
