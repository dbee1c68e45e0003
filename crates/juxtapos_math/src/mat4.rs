//! 4x4 Matrix utilities
//!
//! The same matrix type serves two roles: a 4D linear transform applied to
//! hypercube vertices before the W projection, and the usual homogeneous 3D
//! view-projection transform applied after it.

use serde::{Deserialize, Serialize};

/// 4x4 matrix type (column-major, `m[column][row]`)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a rotation matrix in a specific 2D plane within 4D space.
///
/// # Arguments
/// * `angle` - Rotation angle in radians
/// * `p1`, `p2` - Indices of the axes forming the rotation plane (0=X, 1=Y, 2=Z, 3=W)
///
/// A positive angle turns axis `p1` towards axis `p2`.
///
/// # Example
/// ```
/// use juxtapos_math::mat4::plane_rotation;
/// // Spin the tesseract through its YW plane
/// let spin = plane_rotation(0.5, 1, 3);
/// ```
pub fn plane_rotation(angle: f32, p1: usize, p2: usize) -> Mat4 {
    let cs = angle.cos();
    let sn = angle.sin();

    let mut m = IDENTITY;

    m[p1][p1] = cs;
    m[p2][p2] = cs;
    m[p1][p2] = sn;
    m[p2][p1] = -sn;

    m
}

/// The 6 rotation planes in 4D space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPlane {
    XY,
    XZ,
    YZ,
    XW,
    YW,
    ZW,
}

impl RotationPlane {
    /// Axis indices spanning the plane (0=X, 1=Y, 2=Z, 3=W)
    pub fn axes(self) -> (usize, usize) {
        match self {
            RotationPlane::XY => (0, 1),
            RotationPlane::XZ => (0, 2),
            RotationPlane::YZ => (1, 2),
            RotationPlane::XW => (0, 3),
            RotationPlane::YW => (1, 3),
            RotationPlane::ZW => (2, 3),
        }
    }

    /// Rotation by `angle` radians in this plane
    pub fn rotation(self, angle: f32) -> Mat4 {
        let (p1, p2) = self.axes();
        plane_rotation(angle, p1, p2)
    }
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a 4-vector by a 4x4 matrix (column-major)
///
/// result = M * v
pub fn transform(m: Mat4, v: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    fn mat_approx_eq(a: Mat4, b: Mat4) -> bool {
        a.iter().zip(b.iter()).all(|(ca, cb)| vec_approx_eq(*ca, *cb))
    }

    #[test]
    fn test_identity() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(vec_approx_eq(transform(IDENTITY, v), v));
    }

    #[test]
    fn test_plane_rotation_yw() {
        use std::f32::consts::FRAC_PI_2;

        let m = plane_rotation(FRAC_PI_2, 1, 3);

        let y = [0.0, 1.0, 0.0, 0.0];
        let result = transform(m, y);
        assert!(vec_approx_eq(result, [0.0, 0.0, 0.0, 1.0]),
            "Y should become W, got {:?}", result);

        let w = [0.0, 0.0, 0.0, 1.0];
        let result = transform(m, w);
        assert!(vec_approx_eq(result, [0.0, -1.0, 0.0, 0.0]),
            "W should become -Y, got {:?}", result);

        // X and Z untouched
        let xz = [1.0, 0.0, 1.0, 0.0];
        assert!(vec_approx_eq(transform(m, xz), xz));
    }

    #[test]
    fn test_rotation_plane_axes() {
        assert_eq!(RotationPlane::YW.axes(), (1, 3));
        assert!(mat_approx_eq(RotationPlane::ZW.rotation(0.3), plane_rotation(0.3, 2, 3)));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let m = RotationPlane::XW.rotation(1.234);
        let v = [1.0, -1.0, 1.0, -1.0];
        let r = transform(m, v);
        let len = |a: [f32; 4]| a.iter().map(|c| c * c).sum::<f32>();
        assert!((len(v) - len(r)).abs() < EPSILON);
    }

    #[test]
    fn test_mul_identity() {
        let a = plane_rotation(0.5, 0, 1);
        assert!(mat_approx_eq(a, mul(IDENTITY, a)));
        assert!(mat_approx_eq(a, mul(a, IDENTITY)));
    }

    #[test]
    fn test_mul_composition() {
        use std::f32::consts::FRAC_PI_4;

        // Two 45° rotations should equal one 90° rotation
        let r45 = plane_rotation(FRAC_PI_4, 1, 3);
        let r90 = plane_rotation(FRAC_PI_4 * 2.0, 1, 3);

        let composed = mul(r45, r45);

        let v = [0.0, 1.0, 0.0, 0.0];
        let result1 = transform(composed, v);
        let result2 = transform(r90, v);

        assert!(vec_approx_eq(result1, result2),
            "Composed: {:?}, Direct: {:?}", result1, result2);
    }

    #[test]
    fn test_mul_order_applies_right_first() {
        let scale_x: Mat4 = [
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let rot = plane_rotation(std::f32::consts::FRAC_PI_2, 0, 1);

        // rotate X onto Y, then scaling X does nothing to it
        let r = transform(mul(scale_x, rot), [1.0, 0.0, 0.0, 0.0]);
        assert!(vec_approx_eq(r, [0.0, 1.0, 0.0, 0.0]), "got {:?}", r);
    }
}
