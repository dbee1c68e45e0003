//! Hypercube Rendering Library
//!
//! This crate provides the wgpu-based pipeline for drawing a projected
//! hypercube with order-independent transparency via depth peeling.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`framebuffer::FramebufferPair`] - Ping-ponged offscreen color + depth targets
//! - [`pipeline::PeelSchedule`] - The per-frame peel/composite step sequence
//! - [`pipeline::DepthPeelRenderer`] - Executes the schedule against the framebuffers
//! - [`vertex_schema::VertexSchema`] - Declarative vertex layouts
//! - [`camera::ViewCamera`] - 3D camera applied after the W projection
//!
//! Geometry comes from `juxtapos_math::Hypercube`.

pub mod camera;
pub mod context;
pub mod framebuffer;
pub mod pipeline;
pub mod vertex_schema;

pub use juxtapos_math::{Hypercube, Mat4, RotationPlane, WProjection};

pub use camera::ViewCamera;
pub use framebuffer::{supported_sample_count, FramebufferError, FramebufferPair, Viewport};
pub use pipeline::{DepthPeelRenderer, FrameParams, PeelMesh, PeelRendererError, PeelSettings};
