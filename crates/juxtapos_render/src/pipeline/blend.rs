//! CPU reference for the composite blend
//!
//! The composite pipeline uses `wgpu::BlendState::ALPHA_BLENDING`; these
//! functions compute the same result so rendered output can be checked
//! against a closed form.

/// Blend `src` over `dst` (straight alpha)
///
/// `rgb = src.rgb * src.a + dst.rgb * (1 - src.a)`,
/// `a = src.a + dst.a * (1 - src.a)`
pub fn source_over(dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
    let a = src[3];
    [
        src[0] * a + dst[0] * (1.0 - a),
        src[1] * a + dst[1] * (1.0 - a),
        src[2] * a + dst[2] * (1.0 - a),
        a + dst[3] * (1.0 - a),
    ]
}

/// Composite `layers` over `background` in order, first layer at the bottom
pub fn composite_layers(background: [f32; 4], layers: &[[f32; 4]]) -> [f32; 4] {
    layers.iter().fold(background, |dst, &src| source_over(dst, src))
}
