//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`JXT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use juxtapos_math::{RotationPlane, WProjection};
use juxtapos_render::{PeelSettings, ViewCamera};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Largest hypercube dimension the vertex layout can hold
pub const MAX_RENDER_DIMENSION: u32 = 4;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Hypercube configuration
    #[serde(default)]
    pub geometry: GeometryConfig,
    /// 4D -> 3D projection
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Model rotation
    #[serde(default)]
    pub spin: SpinConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`JXT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // JXT_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("JXT_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderer cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        if self.rendering.peel_passes == 0 {
            return Err(ConfigError::invalid("rendering.peel_passes must be at least 1"));
        }
        if self.geometry.dimension > MAX_RENDER_DIMENSION {
            return Err(ConfigError::invalid(format!(
                "geometry.dimension {} exceeds the maximum of {}",
                self.geometry.dimension, MAX_RENDER_DIMENSION
            )));
        }
        if self.projection.w_offset <= 0.0 {
            return Err(ConfigError::invalid("projection.w_offset must be positive"));
        }
        // Vertices sit at w = -1 or +1 (or 0 when padded)
        if !self.projection.to_projection().is_valid_for(1.0) {
            return Err(ConfigError::invalid(format!(
                "projection w_scale {} and w_offset {} put part of the hypercube behind the W eye",
                self.projection.w_scale, self.projection.w_offset
            )));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(ConfigError::invalid(format!(
                "camera.fov {} must be between 0 and 180 degrees",
                self.camera.fov
            )));
        }
        if !(0.0..=1.0).contains(&self.rendering.face_opacity) {
            return Err(ConfigError::invalid(format!(
                "rendering.face_opacity {} must be within [0, 1]",
                self.rendering.face_opacity
            )));
        }
        if !matches!(self.rendering.msaa_samples, 1 | 2 | 4 | 8 | 16) {
            return Err(ConfigError::invalid(format!(
                "rendering.msaa_samples {} must be 1, 2, 4, 8 or 16",
                self.rendering.msaa_samples
            )));
        }
        if self.camera.near >= self.camera.far {
            return Err(ConfigError::invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                self.camera.near, self.camera.far
            )));
        }
        Ok(())
    }

    /// Renderer settings derived from the rendering and projection sections
    pub fn peel_settings(&self) -> PeelSettings {
        let bg = self.rendering.background_color;
        PeelSettings {
            passes: self.rendering.peel_passes,
            background: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
            w_projection: self.projection.to_projection(),
            face_opacity: self.rendering.face_opacity,
            edge_color: self.rendering.edge_color,
            samples: self.rendering.msaa_samples,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Juxtapos".to_string(),
            width: 1025,
            height: 750,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position [x, y, z]
    pub eye: [f32; 3],
    /// Look-at target [x, y, z]
    pub target: [f32; 3],
    /// Up hint, normalised at use
    pub up: [f32; 3],
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = ViewCamera::default();
        Self {
            eye: camera.eye,
            target: camera.target,
            up: camera.up,
            fov: camera.fov_y,
            near: camera.near,
            far: camera.far,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> ViewCamera {
        ViewCamera {
            eye: self.eye,
            target: self.target,
            up: self.up,
            fov_y: self.fov,
            near: self.near,
            far: self.far,
        }
    }
}

/// Hypercube configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Dimension of the hypercube (at most 4; lower ones are zero-padded)
    pub dimension: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self { dimension: 4 }
    }
}

/// Perspective divide along W
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Factor applied to W
    pub w_scale: f32,
    /// Added after scaling; must be positive
    pub w_offset: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let projection = WProjection::default();
        Self {
            w_scale: projection.scale,
            w_offset: projection.offset,
        }
    }
}

impl ProjectionConfig {
    pub fn to_projection(&self) -> WProjection {
        WProjection::new(self.w_scale, self.w_offset)
    }
}

/// Model rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Plane of rotation
    pub plane: RotationPlane,
    /// Angular speed in radians per second
    pub speed: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            plane: RotationPlane::YW,
            speed: std::f32::consts::FRAC_PI_4,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Depth peel passes per frame
    pub peel_passes: u32,
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Alpha multiplier for the faces
    pub face_opacity: f32,
    /// Draw the wireframe on top
    pub show_edges: bool,
    /// Wireframe color [r, g, b, a]
    pub edge_color: [f32; 4],
    /// Samples per pixel; falls back to 1 if the adapter can't shade per sample
    pub msaa_samples: u32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            peel_passes: 8,
            // skyblue
            background_color: [135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0, 1.0],
            face_opacity: 0.35,
            show_edges: false,
            edge_color: [0.05, 0.05, 0.1, 0.8],
            msaa_samples: 4,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show the frame rate in the window title
    pub show_fps: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_fps: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
