//! Depth-peeled transparent rendering
//!
//! Each frame walks a [`PeelSchedule`]: the output is cleared, then every peel
//! pass draws the faces into one of the two offscreen targets with a
//! greater-than depth test (keeping the farthest fragment not yet peeled) and
//! the result is immediately blended over the output. No triangle sorting is
//! involved; pixels with more overlapping layers than there are passes keep
//! only the farthest ones.
//!
//! With more than one sample per pixel the peel targets and the output are
//! multisampled, every pass is shaded per sample and the output is resolved into
//! the caller's view at the end of the frame.

use std::fmt;

use juxtapos_math::{Mat4, WProjection};

use super::mesh::{PeelMesh, QuadMesh};
use super::schedule::{PeelSchedule, PeelStep, TargetSlot};
use super::types::{HyperVertex, PeelUniforms, QuadVertex};
use crate::framebuffer::{
    AttachmentLayouts, FramebufferError, FramebufferPair, MultisampleOutput, TargetClear,
    Viewport, PEEL_COLOR_FORMAT, PEEL_DEPTH_FORMAT,
};
use crate::vertex_schema::VertexLayout;

/// Depth the prime step writes into the first read target
pub const FAR_DEPTH: f32 = 1.0;

/// Depth each peel target is cleared to before drawing
pub const PEEL_CLEAR_DEPTH: f32 = 0.0;

/// Bind group index of the uniforms in the peel and edge shaders
const UNIFORM_GROUP: u32 = 0;
/// Bind group index of the previous pass's depth in the peel shader
const PREV_DEPTH_GROUP: u32 = 1;
/// Bind group index of the layer color in the composite shader
const LAYER_GROUP: u32 = 0;

const PEEL_SHADER: &str = include_str!("../shaders/peel.wgsl");
const PEEL_LAYER: &str = include_str!("../shaders/peel_layer.wgsl");
const PEEL_LAYER_MSAA: &str = include_str!("../shaders/peel_layer_msaa.wgsl");
const COMPOSITE_SHADER: &str = include_str!("../shaders/composite.wgsl");
const COMPOSITE_MSAA: &str = include_str!("../shaders/composite_msaa.wgsl");

/// Renderer creation error
#[derive(Debug)]
pub enum PeelRendererError {
    Framebuffer(FramebufferError),
    /// The device rejected a shader module or pipeline
    Pipeline {
        name: &'static str,
        message: String,
    },
}

impl fmt::Display for PeelRendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeelRendererError::Framebuffer(e) => write!(f, "{}", e),
            PeelRendererError::Pipeline { name, message } => {
                write!(f, "Failed to create {}: {}", name, message)
            }
        }
    }
}

impl std::error::Error for PeelRendererError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PeelRendererError::Framebuffer(e) => Some(e),
            PeelRendererError::Pipeline { .. } => None,
        }
    }
}

impl From<FramebufferError> for PeelRendererError {
    fn from(e: FramebufferError) -> Self {
        PeelRendererError::Framebuffer(e)
    }
}

/// Static configuration of the renderer
#[derive(Clone, Copy, Debug)]
pub struct PeelSettings {
    /// Number of peel passes per frame (at least 1)
    pub passes: u32,
    /// Output clear color
    pub background: wgpu::Color,
    pub w_projection: WProjection,
    /// Multiplier applied to every face's vertex alpha
    pub face_opacity: f32,
    pub edge_color: [f32; 4],
    /// Samples per pixel of the peel targets and the output; the adapter must
    /// support it (see [`supported_sample_count`](crate::framebuffer::supported_sample_count))
    pub samples: u32,
}

impl Default for PeelSettings {
    fn default() -> Self {
        Self {
            passes: 8,
            background: wgpu::Color {
                r: 135.0 / 255.0,
                g: 206.0 / 255.0,
                b: 235.0 / 255.0,
                a: 1.0,
            },
            w_projection: WProjection::default(),
            face_opacity: 0.35,
            edge_color: [0.05, 0.05, 0.1, 0.8],
            samples: 1,
        }
    }
}

/// Per-frame inputs, immutable for the duration of the frame
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// 4D transform applied before the W projection
    pub model: Mat4,
    /// 3D view-projection applied after it
    pub view_proj: Mat4,
    /// Size of the output target; must match the framebuffers
    pub viewport: Viewport,
    /// Draw the wireframe over the composited image
    pub show_edges: bool,
}

/// Renders a [`PeelMesh`] with order-independent transparency
pub struct DepthPeelRenderer {
    peel_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    layouts: AttachmentLayouts,
    framebuffers: FramebufferPair,
    output_format: wgpu::TextureFormat,
    /// Present when `settings.samples > 1`
    multisample_output: Option<MultisampleOutput>,
    schedule: PeelSchedule,
    mesh: PeelMesh,
    quad: QuadMesh,
    settings: PeelSettings,
}

impl DepthPeelRenderer {
    /// Build pipelines and allocate both peel targets
    ///
    /// `output_format` is the format of the view later passed to
    /// [`render_frame`](Self::render_frame).
    ///
    /// # Panics
    /// If `settings.passes` is zero.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        viewport: Viewport,
        mesh: PeelMesh,
        settings: PeelSettings,
    ) -> Result<Self, PeelRendererError> {
        let samples = settings.samples;
        let schedule = PeelSchedule::new(settings.passes);
        let layouts = AttachmentLayouts::new(device, samples);
        let framebuffers = FramebufferPair::new(device, &layouts, viewport, samples)?;
        let multisample_output = multisample_output(device, output_format, viewport, samples)?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Peel Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<PeelUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Peel Uniform Buffer"),
            size: std::mem::size_of::<PeelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Peel Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let (peel_layer, composite_source) = if samples > 1 {
            (PEEL_LAYER_MSAA, COMPOSITE_MSAA)
        } else {
            (PEEL_LAYER, COMPOSITE_SHADER)
        };
        let peel_shader = validated(device, "Peel Shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Peel Shader"),
                source: wgpu::ShaderSource::Wgsl(format!("{}\n{}", PEEL_SHADER, peel_layer).into()),
            })
        })?;
        let composite_shader = validated(device, "Composite Shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Composite Shader"),
                source: wgpu::ShaderSource::Wgsl(composite_source.into()),
            })
        })?;

        let multisample = wgpu::MultisampleState {
            count: samples,
            ..Default::default()
        };

        let hyper_layout = VertexLayout::of::<HyperVertex>();
        let quad_layout = VertexLayout::of::<QuadVertex>();

        let peel_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Peel Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &layouts.depth],
            push_constant_ranges: &[],
        });

        // Greater-than test against a depth cleared to 0.0 keeps the farthest
        // fragment; the shader discards anything not nearer than the read depth
        let peel_pipeline = validated(device, "Peel Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Peel Pipeline"),
                layout: Some(&peel_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &peel_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[hyper_layout.buffer_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &peel_shader,
                    entry_point: Some("fs_peel"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: PEEL_COLOR_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Both sides of every face are visible through the others
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: PEEL_DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Greater,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample,
                multiview: None,
                cache: None,
            })
        })?;

        let composite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Composite Pipeline Layout"),
                bind_group_layouts: &[&layouts.color],
                push_constant_ranges: &[],
            });

        let composite_pipeline = validated(device, "Composite Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Composite Pipeline"),
                layout: Some(&composite_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &composite_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[quad_layout.buffer_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &composite_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: output_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample,
                multiview: None,
                cache: None,
            })
        })?;

        let edge_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Edge Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let edge_pipeline = validated(device, "Edge Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Edge Pipeline"),
                layout: Some(&edge_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &peel_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[hyper_layout.buffer_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &peel_shader,
                    entry_point: Some("fs_edge"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: output_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample,
                multiview: None,
                cache: None,
            })
        })?;

        log::info!(
            "Depth peel renderer: {} passes, {} face indices, output {:?} at {}, {}x MSAA",
            schedule.passes(),
            mesh.face_index_count(),
            output_format,
            viewport,
            samples,
        );

        Ok(Self {
            peel_pipeline,
            composite_pipeline,
            edge_pipeline,
            uniform_buffer,
            uniform_bind_group,
            layouts,
            framebuffers,
            output_format,
            multisample_output,
            schedule,
            mesh,
            quad: QuadMesh::new(device),
            settings,
        })
    }

    pub fn settings(&self) -> &PeelSettings {
        &self.settings
    }

    pub fn schedule(&self) -> &PeelSchedule {
        &self.schedule
    }

    pub fn viewport(&self) -> Viewport {
        self.framebuffers.viewport()
    }

    /// Recreate the peel targets for a new output size
    ///
    /// Returns `Ok(false)` if the size did not change.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        viewport: Viewport,
    ) -> Result<bool, FramebufferError> {
        let resized = self.framebuffers.resize(device, &self.layouts, viewport)?;
        if resized {
            self.multisample_output =
                multisample_output(device, self.output_format, viewport, self.settings.samples)?;
            log::debug!("Peel targets resized to {}", viewport);
        }
        Ok(resized)
    }

    /// Encode one complete frame into `encoder`, leaving the composited image in `target`
    ///
    /// # Panics
    /// If `frame.viewport` differs from the size the targets were created for;
    /// call [`resize`](Self::resize) first.
    pub fn render_frame(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &FrameParams,
    ) {
        assert_eq!(
            frame.viewport,
            self.framebuffers.viewport(),
            "frame viewport does not match the peel targets"
        );

        let uniforms = PeelUniforms::new(
            frame.model,
            frame.view_proj,
            self.settings.w_projection,
            self.settings.face_opacity,
            self.settings.edge_color,
        );
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        // Multisampled frames draw into the intermediate output and resolve at the end
        let output = match &self.multisample_output {
            Some(multisample) => multisample.view(),
            None => target,
        };

        for step in self.schedule.steps() {
            match *step {
                PeelStep::ClearOutput => {
                    let load = wgpu::LoadOp::Clear(self.settings.background);
                    output_pass(encoder, output, load, "Clear Output");
                }
                PeelStep::PrimeDepth { target: slot } => {
                    self.prime(encoder, slot);
                }
                PeelStep::Peel { write, read, .. } => {
                    self.peel(encoder, write, read);
                }
                PeelStep::Composite { source, .. } => {
                    self.composite(encoder, output, source);
                }
            }
        }

        if frame.show_edges {
            let mut pass = output_pass(encoder, output, wgpu::LoadOp::Load, "Edge Overlay");
            pass.set_pipeline(&self.edge_pipeline);
            pass.set_bind_group(UNIFORM_GROUP, &self.uniform_bind_group, &[]);
            self.mesh.draw_edges(&mut pass);
        }

        if self.multisample_output.is_some() {
            resolve_pass(encoder, output, target);
        }
    }

    fn prime(&self, encoder: &mut wgpu::CommandEncoder, slot: TargetSlot) {
        let clear = TargetClear {
            color: wgpu::Color::TRANSPARENT,
            depth: FAR_DEPTH,
        };
        // Clearing is the whole step
        let _pass = self.framebuffers.bind_as_target(encoder, slot, clear, "Peel Prime");
    }

    fn peel(&self, encoder: &mut wgpu::CommandEncoder, write: TargetSlot, read: TargetSlot) {
        let clear = TargetClear {
            color: wgpu::Color::TRANSPARENT,
            depth: PEEL_CLEAR_DEPTH,
        };
        let mut pass = self.framebuffers.bind_as_target(encoder, write, clear, "Peel Pass");
        pass.set_pipeline(&self.peel_pipeline);
        pass.set_bind_group(UNIFORM_GROUP, &self.uniform_bind_group, &[]);
        self.framebuffers.bind_depth_as_input(&mut pass, read, PREV_DEPTH_GROUP);
        self.mesh.draw_faces(&mut pass);
    }

    fn composite(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, source: TargetSlot) {
        let mut pass = output_pass(encoder, target, wgpu::LoadOp::Load, "Composite Pass");
        pass.set_pipeline(&self.composite_pipeline);
        self.framebuffers.bind_color_as_input(&mut pass, source, LAYER_GROUP);
        self.quad.draw(&mut pass);
    }
}

/// Run `create` inside error scopes, reporting a rejection under `name`
fn validated<T>(
    device: &wgpu::Device,
    name: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T, PeelRendererError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Internal);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = create();

    let validation = pollster::block_on(device.pop_error_scope());
    let internal = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(internal).or(out_of_memory) {
        Some(error) => Err(PeelRendererError::Pipeline {
            name,
            message: error.to_string(),
        }),
        None => Ok(value),
    }
}

fn multisample_output(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    viewport: Viewport,
    samples: u32,
) -> Result<Option<MultisampleOutput>, FramebufferError> {
    if samples > 1 {
        MultisampleOutput::new(device, format, viewport, samples).map(Some)
    } else {
        Ok(None)
    }
}

/// Resolve the multisampled output into the single-sample `target`
fn resolve_pass(encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView, target: &wgpu::TextureView) {
    let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Resolve Output"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: output,
            resolve_target: Some(target),
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
}

fn output_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}
