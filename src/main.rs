//! Juxtapos - transparent hypercube viewer
//!
//! Spins a tesseract in 4D and draws its projected faces with depth-peeled
//! transparency.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use juxtapos::config::AppConfig;
use juxtapos::input::{InputAction, InputMapper};
use juxtapos::systems::{FpsCounter, RenderError, RenderSystem, WindowSystem};
use juxtapos_input::SpinController;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
    spin: SpinController,
    fps: FpsCounter,
    last_frame: std::time::Instant,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let spin = SpinController::new(config.spin.plane, config.spin.speed);

        Self {
            config,
            window_system: None,
            render_system: None,
            spin,
            fps: FpsCounter::new(),
            last_frame: std::time::Instant::now(),
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window_system) = &self.window_system {
                    window_system.toggle_fullscreen();
                }
            }
            InputAction::ToggleEdges => {
                if let Some(render_system) = &mut self.render_system {
                    let enabled = render_system.toggle_edges();
                    log::info!("Edge overlay: {}", if enabled { "ON" } else { "OFF" });
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.spin.update(dt);
        let fps = self.fps.tick(dt);

        let (Some(window_system), Some(render_system)) =
            (&self.window_system, &mut self.render_system)
        else {
            return;
        };

        if self.config.debug.show_fps {
            window_system.update_title(fps);
        }

        match render_system.render_frame(self.spin.model_matrix()) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                log::warn!("Surface lost, reconfiguring");
                render_system.recover_surface();
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        window_system.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }

        let window_system = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window_system) => window_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        match RenderSystem::new(window_system.window().clone(), &self.config) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                log::error!("Failed to initialise rendering: {}", e);
                event_loop.exit();
                return;
            }
        }

        window_system.request_redraw();
        self.window_system = Some(window_system);
        self.last_frame = std::time::Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render_system) = &mut self.render_system {
                    if let Err(e) = render_system.resize(physical_size.width, physical_size.height) {
                        log::error!("{}", e);
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    } else {
                        self.spin.process_keyboard(key, event.state);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() {
    // Load configuration first: it carries the log level
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging, RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Juxtapos");
    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
