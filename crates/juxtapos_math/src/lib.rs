//! Juxtapos Mathematics Library
//!
//! Matrix helpers and the combinatorial geometry of D-dimensional hypercubes.
//!
//! ## Core Types
//!
//! - [`Mat4`] - 4x4 column-major matrix used for model and view-projection transforms
//! - [`RotationPlane`] - one of the six coordinate planes of 4D space
//! - [`WProjection`] - perspective divide along the W axis (4D -> 3D)
//!
//! ## Geometry
//!
//! - [`insert_bit`] - splice a bit into an index at a given position
//! - [`hypercube`] - vertices, edges and triangulated faces of the D-cube

pub mod bits;
pub mod hypercube;
pub mod mat4;
pub mod projection;

pub use bits::insert_bit;
pub use hypercube::{FaceGroup, Hypercube, QUAD_CORNER_PATTERN};
pub use mat4::{Mat4, RotationPlane, IDENTITY};
pub use projection::WProjection;
