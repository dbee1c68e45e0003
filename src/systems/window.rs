//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Seconds of frames averaged into one FPS reading
const FPS_WINDOW: f32 = 0.5;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Show the frame rate in the title
    pub fn update_title(&self, fps: u32) {
        self.window.set_title(&fps_title(&self.base_title, fps));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn fps_title(base: &str, fps: u32) -> String {
    format!("{} - {} FPS", base, fps)
}

/// Frame rate averaged over short windows
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of `dt` seconds, returns the latest reading
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= FPS_WINDOW {
            self.fps = (self.frames as f32 / self.elapsed).round() as u32;
            self.frames = 0;
            self.elapsed = 0.0;
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting() {
        // Can't test actual window without event loop
        assert_eq!(fps_title("Juxtapos", 60), "Juxtapos - 60 FPS");
    }

    #[test]
    fn test_fps_counter_averages() {
        let mut counter = FpsCounter::new();
        for _ in 0..3 {
            assert_eq!(counter.tick(0.125), 0);
        }
        // 4 frames at 8 Hz fill the half-second window
        assert_eq!(counter.tick(0.125), 8);
        assert_eq!(counter.fps(), 8);
        // Reading holds until the next window completes
        assert_eq!(counter.tick(0.25), 8);
        assert_eq!(counter.tick(0.25), 4);
    }

    #[test]
    fn test_window_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
