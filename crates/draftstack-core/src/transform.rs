#![forbid(unsafe_code)]

//! Homogeneous 3D transforms for card stacking.
//!
//! A 4x4 matrix in row-vector convention: transformed = point * matrix, so
//! `a.concat(b)` applies `a` first, then `b`. Translation lives in the
//! fourth row and the perspective term in `m[2][3]` (the "m34" slot).
//!
//! # Invariants
//!
//! - `identity().concat(t) == t` and `t.concat(identity()) == t`
//! - `decomposed_x_rotation` recovers the angle of any transform built as
//!   `rotation_x(a)` composed with all-axis uniform scale and perspective

use serde::{Deserialize, Serialize};

/// A 4x4 homogeneous transform matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Row-major elements; `m[row][col]`.
    pub m: [[f32; 4]; 4],
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// The identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Translation by (x, y, z).
    #[must_use]
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Axis-aligned scale.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            m: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Uniform scale in x and y (z unchanged).
    #[must_use]
    pub const fn uniform_scale(s: f32) -> Self {
        Self::scale(s, s, 1.0)
    }

    /// Rotation about the x axis by `radians`. Positive angles tip the top
    /// edge away from the viewer.
    #[must_use]
    pub fn rotation_x(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, cos, sin, 0.0],
                [0.0, -sin, cos, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Perspective projection with eye distance `divisor` (sets m34 to
    /// `-1/divisor`).
    #[must_use]
    pub fn perspective(divisor: f32) -> Self {
        let mut t = Self::identity();
        t.m[2][3] = -1.0 / divisor;
        t
    }

    /// Compose: apply `self`, then `other`.
    #[must_use]
    pub fn concat(&self, other: &Transform3D) -> Transform3D {
        let mut out = [[0.0f32; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[row][k] * other.m[k][col];
                }
                *cell = sum;
            }
        }
        Transform3D { m: out }
    }

    /// Check against the exact identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Recover the x-axis rotation angle in radians.
    ///
    /// Valid for transforms built from `rotation_x` composed with
    /// translation, perspective, and scale that is uniform across all
    /// three axes (the card-stack transform); those leave the second row
    /// scaled by a common positive factor. An x/y-only scale such as
    /// [`Transform3D::uniform_scale`] skews the recovered angle.
    #[must_use]
    pub fn decomposed_x_rotation(&self) -> f32 {
        self.m[1][2].atan2(self.m[1][1])
    }

    /// Element-wise linear interpolation. `t` is clamped to [0, 1].
    ///
    /// Adequate for the short animated segments used here; not a polar
    /// decomposition.
    #[must_use]
    pub fn lerp(a: &Transform3D, b: &Transform3D, t: f32) -> Transform3D {
        let t = t.clamp(0.0, 1.0);
        let mut m = a.m;
        for (row, row_vals) in m.iter_mut().enumerate() {
            for (col, cell) in row_vals.iter_mut().enumerate() {
                *cell += (b.m[row][col] - *cell) * t;
            }
        }
        Transform3D { m }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn identity_is_neutral_under_concat() {
        let t = Transform3D::translation(3.0, -2.0, 1.0).concat(&Transform3D::rotation_x(0.5));
        assert_eq!(Transform3D::identity().concat(&t), t);
        assert_eq!(t.concat(&Transform3D::identity()), t);
        assert!(Transform3D::identity().is_identity());
        assert!(!t.is_identity());
    }

    #[test]
    fn perspective_sets_m34() {
        let p = Transform3D::perspective(1500.0);
        assert_close(p.m[2][3], -1.0 / 1500.0);
    }

    #[test]
    fn decompose_pure_rotation() {
        for angle in [-1.2_f32, -0.5, 0.0, 0.3, 1.0] {
            let t = Transform3D::rotation_x(angle);
            assert_close(t.decomposed_x_rotation(), angle);
        }
    }

    #[test]
    fn decompose_survives_scale_and_perspective() {
        // The full card-stack chain: the scale must cover all three axes
        // for the angle to survive.
        let angle = -45.0_f32.to_radians();
        let t = Transform3D::translation(0.0, 250.0, 0.0)
            .concat(&Transform3D::rotation_x(angle))
            .concat(&Transform3D::scale(0.97, 0.97, 0.97))
            .concat(&Transform3D::perspective(1500.0));
        assert_close(t.decomposed_x_rotation(), angle);
    }

    #[test]
    fn xy_only_scale_skews_decomposition() {
        let angle = -45.0_f32.to_radians();
        let t = Transform3D::rotation_x(angle).concat(&Transform3D::uniform_scale(0.97));
        let recovered = t.decomposed_x_rotation();
        assert!((recovered - angle).abs() > 0.01, "recovered {recovered}");
        assert_close(recovered, angle.sin().atan2(0.97 * angle.cos()));
    }

    #[test]
    fn translation_lives_in_fourth_row() {
        let t = Transform3D::translation(5.0, 7.0, 9.0);
        assert_eq!(t.m[3][0], 5.0);
        assert_eq!(t.m[3][1], 7.0);
        assert_eq!(t.m[3][2], 9.0);
    }

    #[test]
    fn concat_order_applies_left_first() {
        // Translate then scale halves the translation; scale then translate
        // keeps it intact.
        let translate = Transform3D::translation(10.0, 0.0, 0.0);
        let scale = Transform3D::uniform_scale(0.5);
        let a = translate.concat(&scale);
        let b = scale.concat(&translate);
        assert_close(a.m[3][0], 5.0);
        assert_close(b.m[3][0], 10.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Transform3D::identity();
        let b = Transform3D::uniform_scale(0.5);
        assert_eq!(Transform3D::lerp(&a, &b, 0.0), a);
        assert_eq!(Transform3D::lerp(&a, &b, 1.0), b);
        let mid = Transform3D::lerp(&a, &b, 0.5);
        assert_close(mid.m[0][0], 0.75);
    }
}
