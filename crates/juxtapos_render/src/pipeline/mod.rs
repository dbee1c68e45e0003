//! Rendering pipeline components
//!
//! The depth peeling pipeline, its per-frame step sequence and the GPU data
//! types it consumes.

pub mod blend;
pub mod mesh;
pub mod peel_renderer;
pub mod schedule;
pub mod types;

pub use blend::{composite_layers, source_over};
pub use mesh::{PeelMesh, QuadMesh};
pub use peel_renderer::{
    DepthPeelRenderer, FrameParams, PeelRendererError, PeelSettings, FAR_DEPTH, PEEL_CLEAR_DEPTH,
};
pub use schedule::{PeelSchedule, PeelStep, TargetSlot};
pub use types::{position_gradient_color, HyperVertex, PeelUniforms, QuadVertex};
