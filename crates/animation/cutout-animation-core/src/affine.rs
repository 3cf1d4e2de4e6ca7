#![allow(dead_code)]
//! Row-major 2x3 affine transform, the shape canvas-style backends consume.

use serde::{Deserialize, Serialize};

/// Coefficients `[m00, m01, m02, m10, m11, m12]` mapping
/// `x' = m00*x + m01*y + m02`, `y' = m10*x + m11*y + m12`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine2D {
    m: [f32; 6],
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Post-multiply a translation.
    pub fn translate(&mut self, x: f32, y: f32) {
        self.m[2] += self.m[0] * x + self.m[1] * y;
        self.m[5] += self.m[3] * x + self.m[4] * y;
    }

    /// Post-multiply a rotation in radians.
    pub fn rotate(&mut self, radians: f32) {
        let (s, c) = radians.sin_cos();
        let f0 = self.m[0] * c + self.m[1] * s;
        let f1 = -self.m[0] * s + self.m[1] * c;
        let f3 = self.m[3] * c + self.m[4] * s;
        let f4 = -self.m[3] * s + self.m[4] * c;
        self.m[0] = f0;
        self.m[1] = f1;
        self.m[3] = f3;
        self.m[4] = f4;
    }

    /// Post-multiply an axis-aligned scale.
    pub fn scale(&mut self, x: f32, y: f32) {
        self.m[0] *= x;
        self.m[3] *= x;
        self.m[1] *= y;
        self.m[4] *= y;
    }

    /// Transform a point.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.m[0] * x + self.m[1] * y + self.m[2],
            self.m[3] * x + self.m[4] * y + self.m[5],
        )
    }

    pub fn coefficients(&self) -> [f32; 6] {
        self.m
    }
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn operations_compose_in_local_space() {
        let mut t = Affine2D::IDENTITY;
        t.translate(10.0, 0.0);
        t.scale(2.0, 2.0);
        // the scale applies after the translation, in translated space
        assert!(close(t.apply(1.0, 0.0), (12.0, 0.0)));
        assert!(close(t.apply(0.0, 3.0), (10.0, 6.0)));
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut t = Affine2D::IDENTITY;
        t.rotate(std::f32::consts::FRAC_PI_2);
        assert!(close(t.apply(1.0, 0.0), (0.0, 1.0)));
        assert!(close(t.apply(0.0, 1.0), (-1.0, 0.0)));
    }

    #[test]
    fn translation_follows_prior_rotation() {
        let mut t = Affine2D::IDENTITY;
        t.rotate(std::f32::consts::FRAC_PI_2);
        t.translate(5.0, 0.0);
        assert!(close(t.apply(0.0, 0.0), (0.0, 5.0)));
    }
}
