//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Hypercube upload and the depth peel renderer
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use juxtapos_math::{Hypercube, Mat4};
use juxtapos_render::{
    context::{ContextError, RenderContext},
    framebuffer::{PEEL_COLOR_FORMAT, PEEL_DEPTH_FORMAT},
    pipeline::position_gradient_color,
    supported_sample_count, DepthPeelRenderer, FrameParams, FramebufferError, PeelMesh,
    PeelRendererError, ViewCamera, Viewport,
};
use crate::config::AppConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Startup (and resize) failure of the render system
#[derive(Debug)]
pub enum RenderSystemError {
    Context(ContextError),
    Renderer(PeelRendererError),
    /// The window has no drawable area at startup
    ZeroViewport,
}

impl std::fmt::Display for RenderSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderSystemError::Context(e) => write!(f, "{}", e),
            RenderSystemError::Renderer(e) => write!(f, "{}", e),
            RenderSystemError::ZeroViewport => write!(f, "Window has zero size"),
        }
    }
}

impl std::error::Error for RenderSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderSystemError::Context(e) => Some(e),
            RenderSystemError::Renderer(e) => Some(e),
            RenderSystemError::ZeroViewport => None,
        }
    }
}

impl From<ContextError> for RenderSystemError {
    fn from(e: ContextError) -> Self {
        RenderSystemError::Context(e)
    }
}

impl From<PeelRendererError> for RenderSystemError {
    fn from(e: PeelRendererError) -> Self {
        RenderSystemError::Renderer(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    renderer: DepthPeelRenderer,
    camera: ViewCamera,
    /// Current drawable size, `None` while minimized
    viewport: Option<Viewport>,
    show_edges: bool,
}

impl RenderSystem {
    /// Create render system from window and config, uploading the hypercube
    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, RenderSystemError> {
        let fallback = Viewport::new(config.window.width, config.window.height);
        let context = pollster::block_on(RenderContext::new(window, config.window.vsync))?;
        let context_viewport = context.viewport();
        let viewport = context_viewport
            .or(fallback)
            .ok_or(RenderSystemError::ZeroViewport)?;

        let cube = Hypercube::new(config.geometry.dimension);
        let mesh = PeelMesh::from_hypercube(&context.device, &cube, &position_gradient_color);

        let mut settings = config.peel_settings();
        settings.samples = supported_sample_count(
            &context.adapter,
            &[context.config.format, PEEL_COLOR_FORMAT, PEEL_DEPTH_FORMAT],
            settings.samples,
        );

        let renderer = DepthPeelRenderer::new(
            &context.device,
            context.config.format,
            viewport,
            mesh,
            settings,
        )?;

        Ok(Self {
            context,
            renderer,
            camera: config.camera.to_camera(),
            viewport: context_viewport,
            show_edges: config.rendering.show_edges,
        })
    }

    /// Handle window resize
    ///
    /// A zero size (minimized window) suspends rendering until the next resize.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), FramebufferError> {
        self.viewport = Viewport::new(width, height);
        if let Some(viewport) = self.viewport {
            self.context
                .resize(winit::dpi::PhysicalSize::new(width, height));
            self.renderer.resize(&self.context.device, viewport)?;
        }
        Ok(())
    }

    /// Reconfigure the surface after it was lost
    pub fn recover_surface(&self) {
        self.context.reconfigure();
    }

    /// Toggle the wireframe overlay, returns the new state
    pub fn toggle_edges(&mut self) -> bool {
        self.show_edges = !self.show_edges;
        self.show_edges
    }

    /// Render a single frame with the given 4D model transform
    pub fn render_frame(&mut self, model: Mat4) -> Result<(), RenderError> {
        let Some(viewport) = self.viewport else {
            return Ok(());
        };

        let frame = FrameParams {
            model,
            view_proj: self.camera.view_projection(viewport.aspect_ratio()),
            viewport,
            show_edges: self.show_edges,
        };

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render_frame(&self.context.queue, &mut encoder, &view, &frame);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
    }

    #[test]
    fn test_system_error_wraps_source() {
        use std::error::Error;

        let err = RenderSystemError::from(ContextError::NoAdapter);
        assert_eq!(err.to_string(), "No suitable GPU adapter found");
        assert!(err.source().is_some());
        assert!(RenderSystemError::ZeroViewport.source().is_none());

        let err = RenderSystemError::from(PeelRendererError::Pipeline {
            name: "Edge Pipeline",
            message: "rejected".to_string(),
        });
        assert_eq!(err.to_string(), "Failed to create Edge Pipeline: rejected");
        assert!(err.source().is_some());
    }
}
