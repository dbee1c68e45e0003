//! 3D camera applied after the W projection
//!
//! Matrices are column-major (`m[column][row]`) and map view depth to wgpu's
//! 0..1 clip range, near plane at 0.

use juxtapos_math::{mat4, Mat4};

/// Fixed camera looking at the projected hypercube
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewCamera {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Up hint, normalised when the view matrix is built
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            eye: [0.0, 2.5, 2.5],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, -1.0],
            fov_y: 90.0,
            near: 0.5,
            far: 8.0,
        }
    }
}

impl ViewCamera {
    pub fn view_matrix(&self) -> Mat4 {
        look_at_matrix(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        perspective_matrix(self.fov_y.to_radians(), aspect, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        mat4::mul(self.projection_matrix(aspect), self.view_matrix())
    }
}

/// Right-handed perspective projection with 0..1 depth
pub fn perspective_matrix(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, far * near * nf, 0.0],
    ]
}

/// Right-handed look-at view matrix
pub fn look_at_matrix(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> Mat4 {
    let f = normalize([
        target[0] - eye[0],
        target[1] - eye[1],
        target[2] - eye[2],
    ]);
    let s = normalize(cross(f, normalize(up)));
    let u = cross(s, f);

    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
