use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A pair of per-axis values: a position, a velocity or a displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Largest absolute component.
    pub fn max_abs(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    /// Apply `f` to each axis independently.
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
        }
    }

    /// Combine two coordinates axis by axis.
    pub fn zip_with(self, other: Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        Self {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
        }
    }
}

impl Add for Coord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Coord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for Coord {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Neg for Coord {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_per_axis() {
        let a = Coord::new(1.0, -2.0);
        let b = Coord::new(0.5, 4.0);
        assert_eq!(a + b, Coord::new(1.5, 2.0));
        assert_eq!(a - b, Coord::new(0.5, -6.0));
        assert_eq!(a * 2.0, Coord::new(2.0, -4.0));
        assert_eq!(-a, Coord::new(-1.0, 2.0));
    }

    #[test]
    fn max_abs_picks_dominant_axis() {
        assert_eq!(Coord::new(0.1, -0.3).max_abs(), 0.3);
        assert_eq!(Coord::ZERO.max_abs(), 0.0);
    }
}
