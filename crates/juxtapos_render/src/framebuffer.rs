//! Offscreen render targets for depth peeling
//!
//! [`FramebufferPair`] owns two targets, each with an RGBA color attachment and
//! a depth attachment sized to the viewport. Either target can be the draw
//! destination of a pass, and either attachment can be bound as a sampled input
//! of a later pass.

use std::fmt;

use crate::pipeline::schedule::TargetSlot;

/// Color attachment format of the peel targets
pub const PEEL_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth attachment format of the peel targets
pub const PEEL_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Size of the output surface in pixels, both dimensions non-zero
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// `None` if either dimension is zero (e.g. a minimized window)
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Framebuffer creation error
#[derive(Debug)]
pub enum FramebufferError {
    /// Requested size exceeds the device's 2D texture limit
    TooLarge {
        viewport: Viewport,
        max_dimension: u32,
    },
    /// The device rejected an attachment
    Attachment {
        attachment: &'static str,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        message: String,
    },
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::TooLarge { viewport, max_dimension } => write!(
                f,
                "Framebuffer size {} exceeds device limit of {} pixels",
                viewport, max_dimension
            ),
            FramebufferError::Attachment { attachment, format, viewport, message } => write!(
                f,
                "Failed to create {} attachment ({:?}, {}): {}",
                attachment, format, viewport, message
            ),
        }
    }
}

impl std::error::Error for FramebufferError {}

/// Bind group layouts for reading target attachments in a shader
///
/// Both expose a single texture at binding 0, read with `textureLoad`. Depth is
/// bound as unfilterable float rather than as a depth texture so the peel shader
/// also translates to GLSL.
pub struct AttachmentLayouts {
    pub color: wgpu::BindGroupLayout,
    pub depth: wgpu::BindGroupLayout,
}

impl AttachmentLayouts {
    pub fn new(device: &wgpu::Device, samples: u32) -> Self {
        let layout = |label: &str| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: samples > 1,
                    },
                    count: None,
                }],
            })
        };

        Self {
            color: layout("Peel Color Input Layout"),
            depth: layout("Peel Depth Input Layout"),
        }
    }
}

/// What a target pass does with its attachments on load
#[derive(Clone, Copy, Debug)]
pub struct TargetClear {
    pub color: wgpu::Color,
    pub depth: f32,
}

/// Create one attachment inside its own error scopes
///
/// A rejected texture is reported under `attachment` with its format and size.
pub(crate) fn create_attachment(
    device: &wgpu::Device,
    attachment: &'static str,
    format: wgpu::TextureFormat,
    viewport: Viewport,
    samples: u32,
    usage: wgpu::TextureUsages,
) -> Result<(wgpu::Texture, wgpu::TextureView), FramebufferError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(attachment),
        size: viewport.extent(),
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(out_of_memory) {
        Some(error) => Err(FramebufferError::Attachment {
            attachment,
            format,
            viewport,
            message: error.to_string(),
        }),
        None => Ok((texture, view)),
    }
}

/// One color + depth render target
#[allow(dead_code)] // Textures must outlive their views and bind groups
struct RenderTarget {
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    color_input: wgpu::BindGroup,
    depth_input: wgpu::BindGroup,
}

impl RenderTarget {
    fn new(
        device: &wgpu::Device,
        layouts: &AttachmentLayouts,
        viewport: Viewport,
        samples: u32,
        slot: TargetSlot,
    ) -> Result<Self, FramebufferError> {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;

        let (color_label, depth_label) = match slot {
            TargetSlot::Zero => ("peel color 0", "peel depth 0"),
            TargetSlot::One => ("peel color 1", "peel depth 1"),
        };

        let (color_texture, color_view) =
            create_attachment(device, color_label, PEEL_COLOR_FORMAT, viewport, samples, usage)?;
        let (depth_texture, depth_view) =
            create_attachment(device, depth_label, PEEL_DEPTH_FORMAT, viewport, samples, usage)?;

        let input = |label: &str, layout: &wgpu::BindGroupLayout, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                }],
            })
        };
        let color_input = input("Peel Color Input", &layouts.color, &color_view);
        let depth_input = input("Peel Depth Input", &layouts.depth, &depth_view);

        Ok(Self {
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            color_input,
            depth_input,
        })
    }
}

/// Two ping-ponged color + depth targets sized to the viewport
pub struct FramebufferPair {
    targets: [RenderTarget; 2],
    viewport: Viewport,
    samples: u32,
}

impl FramebufferPair {
    /// Create both targets with `samples` samples per pixel
    ///
    /// Failure is fatal to startup: the peel loop cannot run without both.
    pub fn new(
        device: &wgpu::Device,
        layouts: &AttachmentLayouts,
        viewport: Viewport,
        samples: u32,
    ) -> Result<Self, FramebufferError> {
        check_size(device, viewport)?;

        let targets = [
            RenderTarget::new(device, layouts, viewport, samples, TargetSlot::Zero)?,
            RenderTarget::new(device, layouts, viewport, samples, TargetSlot::One)?,
        ];

        log::debug!("Created peel framebuffers at {} ({}x MSAA)", viewport, samples);

        Ok(Self { targets, viewport, samples })
    }

    /// Recreate both targets at a new size
    ///
    /// Returns `Ok(false)` without touching the GPU if the size is unchanged.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        layouts: &AttachmentLayouts,
        viewport: Viewport,
    ) -> Result<bool, FramebufferError> {
        if viewport == self.viewport {
            return Ok(false);
        }

        *self = Self::new(device, layouts, viewport, self.samples)?;
        Ok(true)
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Begin a render pass drawing into `slot`, clearing both attachments
    pub fn bind_as_target<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        slot: TargetSlot,
        clear: TargetClear,
        label: &str,
    ) -> wgpu::RenderPass<'e> {
        let target = &self.targets[slot.index()];

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.depth),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Expose `slot`'s depth attachment at bind group `group`
    pub fn bind_depth_as_input(&self, pass: &mut wgpu::RenderPass<'_>, slot: TargetSlot, group: u32) {
        pass.set_bind_group(group, &self.targets[slot.index()].depth_input, &[]);
    }

    /// Expose `slot`'s color attachment at bind group `group`
    pub fn bind_color_as_input(&self, pass: &mut wgpu::RenderPass<'_>, slot: TargetSlot, group: u32) {
        pass.set_bind_group(group, &self.targets[slot.index()].color_input, &[]);
    }
}

/// Multisampled stand-in for the output view, resolved into it after the frame
pub struct MultisampleOutput {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleOutput {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        samples: u32,
    ) -> Result<Self, FramebufferError> {
        check_size(device, viewport)?;
        let (texture, view) = create_attachment(
            device,
            "multisample output",
            format,
            viewport,
            samples,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )?;
        Ok(Self { _texture: texture, view })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

fn check_size(device: &wgpu::Device, viewport: Viewport) -> Result<(), FramebufferError> {
    let max_dimension = device.limits().max_texture_dimension_2d;
    if viewport.width() > max_dimension || viewport.height() > max_dimension {
        return Err(FramebufferError::TooLarge { viewport, max_dimension });
    }
    Ok(())
}

/// Largest usable sample count not above `requested`, falling back to 1
///
/// Multisampled peeling shades per sample, so the adapter must support sample
/// rate shading as well as `requested` samples in every one of `formats`.
pub fn supported_sample_count(
    adapter: &wgpu::Adapter,
    formats: &[wgpu::TextureFormat],
    requested: u32,
) -> u32 {
    if requested <= 1 {
        return 1;
    }

    let per_sample_shading = adapter
        .get_downlevel_capabilities()
        .flags
        .contains(wgpu::DownlevelFlags::MULTISAMPLED_SHADING);
    let formats_support = formats.iter().all(|&format| {
        adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(requested)
    });

    if per_sample_shading && formats_support {
        requested
    } else {
        log::warn!("{}x MSAA is not supported by this adapter, rendering without it", requested);
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rejects_zero() {
        assert!(Viewport::new(0, 600).is_none());
        assert!(Viewport::new(800, 0).is_none());
        assert!(Viewport::new(800, 600).is_some());
    }

    #[test]
    fn test_viewport_aspect() {
        let v = Viewport::new(1600, 800).unwrap();
        assert_eq!(v.aspect_ratio(), 2.0);
        assert_eq!(v.to_string(), "1600x800");
    }

    #[test]
    fn test_error_display_names_resource() {
        let viewport = Viewport::new(64, 32).unwrap();
        let err = FramebufferError::Attachment {
            attachment: "peel depth",
            format: PEEL_DEPTH_FORMAT,
            viewport,
            message: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("peel depth"));
        assert!(msg.contains("Depth32Float"));
        assert!(msg.contains("64x32"));

        let err = FramebufferError::TooLarge { viewport, max_dimension: 16 };
        assert!(err.to_string().contains("16"));
    }

    fn headless() -> Option<crate::context::HeadlessGpu> {
        pollster::block_on(crate::context::request_headless_device()).ok()
    }

    #[test]
    fn test_rejected_attachment_names_itself() {
        let Some(gpu) = headless() else { return };
        let viewport = Viewport::new(16, 16).unwrap();

        // No device accepts 3 samples per pixel
        let result = create_attachment(
            &gpu.device,
            "peel color 1",
            PEEL_COLOR_FORMAT,
            viewport,
            3,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        match result {
            Err(FramebufferError::Attachment { attachment, format, viewport: size, .. }) => {
                assert_eq!(attachment, "peel color 1");
                assert_eq!(format, PEEL_COLOR_FORMAT);
                assert_eq!(size, viewport);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("invalid attachment was accepted"),
        }

        let depth = create_attachment(
            &gpu.device,
            "peel depth 0",
            PEEL_DEPTH_FORMAT,
            viewport,
            3,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        match depth {
            Err(err) => {
                let msg = err.to_string();
                assert!(msg.contains("peel depth 0"));
                assert!(msg.contains("Depth32Float"));
            }
            Ok(_) => panic!("invalid attachment was accepted"),
        }
    }

    #[test]
    fn test_pair_reports_samples() {
        let Some(gpu) = headless() else { return };
        let viewport = Viewport::new(8, 8).unwrap();
        let layouts = AttachmentLayouts::new(&gpu.device, 1);

        let mut pair = FramebufferPair::new(&gpu.device, &layouts, viewport, 1).unwrap();
        assert_eq!(pair.samples(), 1);
        assert!(!pair.resize(&gpu.device, &layouts, viewport).unwrap());
        assert!(pair.resize(&gpu.device, &layouts, Viewport::new(4, 8).unwrap()).unwrap());
        assert_eq!(pair.viewport(), Viewport::new(4, 8).unwrap());
        assert_eq!(pair.samples(), 1);
    }

    #[test]
    fn test_single_sample_needs_no_support_check() {
        let Some(gpu) = headless() else { return };
        assert_eq!(supported_sample_count(&gpu.adapter, &[PEEL_COLOR_FORMAT], 1), 1);
        let four = supported_sample_count(&gpu.adapter, &[PEEL_COLOR_FORMAT, PEEL_DEPTH_FORMAT], 4);
        assert!(four == 1 || four == 4);
    }
}
