//! Perspective projection along the W axis
//!
//! The vertex shader performs the same computation; this CPU version lets the
//! host reason about where projected geometry lands.

use serde::{Deserialize, Serialize};

/// 4D -> 3D perspective divide: `p.xyz / (p.w * scale + offset)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WProjection {
    /// Factor applied to W before the divide
    pub scale: f32,
    /// Distance added after scaling, must keep the divisor positive
    pub offset: f32,
}

impl Default for WProjection {
    fn default() -> Self {
        Self {
            scale: 0.5,
            offset: 1.5,
        }
    }
}

impl WProjection {
    pub fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    /// Divisor for a point with the given W
    #[inline]
    pub fn divisor(&self, w: f32) -> f32 {
        w * self.scale + self.offset
    }

    /// Whether every W in `[-extent, extent]` maps to a positive divisor
    pub fn is_valid_for(&self, extent: f32) -> bool {
        self.divisor(extent) > 0.0 && self.divisor(-extent) > 0.0
    }

    /// Project a 4D point to 3D
    pub fn project(&self, p: [f32; 4]) -> [f32; 3] {
        let s = self.divisor(p[3]);
        [p[0] / s, p[1] / s, p[2] / s]
    }
}
