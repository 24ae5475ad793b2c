// Copyright @yucwang 2026

use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;

/// Alternating 0/1 cells of side `period`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Checkerboard {
    pub period: Float,
    pub volumetric: bool,
}

impl Checkerboard {
    pub fn new(period: Float, volumetric: bool) -> Self {
        Self { period, volumetric }
    }
}

impl MaterialMap for Checkerboard {
    fn eval(&self, at: &MaterialCoords) -> Float {
        let p = at.position(self.volumetric);
        let cells: i64 = p.iter().map(|c| (c / self.period).floor() as i64).sum();
        if cells.rem_euclid(2) == 0 {
            0.0
        } else {
            1.0
        }
    }
}

/// Concentric 0/1 rings of width `period / 2` around the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bullseye {
    pub period: Float,
    pub volumetric: bool,
}

impl Bullseye {
    pub fn new(period: Float, volumetric: bool) -> Self {
        Self { period, volumetric }
    }
}

impl MaterialMap for Bullseye {
    fn eval(&self, at: &MaterialCoords) -> Float {
        let r = at.position(self.volumetric).norm() / self.period;
        if r - r.floor() < 0.5 {
            0.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{Vector2f, Vector3f};

    fn at(u: Float, v: Float, p: Vector3f) -> MaterialCoords {
        MaterialCoords::new(Vector2f::new(u, v), p, 550.0)
    }

    #[test]
    fn test_checkerboard_surface() {
        let map = Checkerboard::new(0.5, false);
        let origin = Vector3f::zeros();
        assert_eq!(map.eval(&at(0.1, 0.1, origin)), 0.0);
        assert_eq!(map.eval(&at(0.6, 0.1, origin)), 1.0);
        assert_eq!(map.eval(&at(0.6, 0.6, origin)), 0.0);
        assert_eq!(map.eval(&at(-0.1, 0.1, origin)), 1.0);
        // Surface maps ignore the volume coordinates.
        assert_eq!(map.eval(&at(0.1, 0.1, Vector3f::repeat(0.7))), 0.0);
    }

    #[test]
    fn test_checkerboard_volumetric() {
        let map = Checkerboard::new(1.0, true);
        assert_eq!(map.eval(&at(0.0, 0.0, Vector3f::new(0.5, 0.5, 0.5))), 0.0);
        assert_eq!(map.eval(&at(0.0, 0.0, Vector3f::new(0.5, 0.5, 1.5))), 1.0);
        assert_eq!(map.eval(&at(0.0, 0.0, Vector3f::new(1.5, 1.5, 1.5))), 1.0);
    }

    #[test]
    fn test_bullseye_rings() {
        let map = Bullseye::new(2.0, false);
        let origin = Vector3f::zeros();
        assert_eq!(map.eval(&at(0.5, 0.0, origin)), 0.0);
        assert_eq!(map.eval(&at(0.0, 1.5, origin)), 1.0);
        assert_eq!(map.eval(&at(2.5, 0.0, origin)), 0.0);
        assert_eq!(Bullseye::new(2.0, true).eval(&at(0.0, 0.0, Vector3f::new(0.0, 0.0, 1.5))), 1.0);
    }
}
