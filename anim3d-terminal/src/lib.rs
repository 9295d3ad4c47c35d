//! Terminal front end: renders animated models as ASCII art
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::{Point3, Vector3};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

use anim3d_core::{transform, Camera, Model};

pub mod error;
pub mod input;
pub mod options;
pub mod renderer;

pub use error::{Result, TerminalError};
pub use input::{InputAction, KeyBindings};
pub use options::{AppOptions, OptionsError};
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    model: Model,
    camera: Camera,
    renderer: AsciiRenderer,
    bindings: KeyBindings,
    options: AppOptions,
    running: bool,
    started: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: Model, options: AppOptions) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(model, options, width, height))
    }

    /// Build the app for a terminal of `width` x `height` cells
    pub fn with_size(model: Model, options: AppOptions, width: u16, height: u16) -> Self {
        let mut camera = Camera::new(width as u32, height as u32 * CELL_ASPECT);
        camera.position = Point3::from(options.camera.position);
        camera.target = Point3::from(options.camera.target);
        camera.fov = options.camera.fov_degrees.to_radians();
        camera.mode = options.camera.projection.into();

        let bindings = KeyBindings::new(&options.bindings);
        if bindings.is_empty() {
            log::warn!("no motion keys bound; only camera movement is available");
        } else {
            log::debug!("{} motion keys bound", bindings.len());
        }

        let now = Instant::now();
        Self {
            model,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            bindings,
            options,
            running: true,
            started: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!(
            "rendering {} triangles at {} fps",
            self.model.triangle_count(),
            self.options.fps
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_secs_f32(1.0 / self.options.fps.max(1) as f32);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            let window = now - self.last_fps_sample;
            if window.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / window.as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    /// React to one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(action) = self.bindings.action_for(&key) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.camera.resize(width as u32, height as u32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    pub fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.running = false,
            InputAction::Camera(direction) => {
                self.camera
                    .move_relative(direction, self.options.camera.move_speed);
            }
            InputAction::Motion(request) => self.model.scheduler.request(request),
        }
    }

    /// Seconds since the app started
    fn clock(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Evaluate the model at `now` and rasterize it into the renderer
    pub fn update(&mut self, now: f32) {
        let scale = Vector3::repeat(self.options.model_scale);
        let model_matrix = self.model.transform(now) * transform::scaling(&scale);

        self.renderer.clear();
        for mesh in &self.model.meshes {
            self.renderer.render_mesh(mesh, &model_matrix, &self.camera);
        }
    }

    fn render(&mut self) -> Result<()> {
        let now = self.clock();
        self.update(now);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        let position = self.model.scheduler.position();
        let status = format!(
            "anim3d | FPS {:.1} | t {:.1}s | queued {} | pos ({:.2}, {:.2}, {:.2}) | Q quit",
            self.fps,
            now,
            self.model.scheduler.pending(),
            position.x,
            position.y,
            position.z,
        );
        // Keep the status on one line
        let status: String = status.chars().take(self.renderer.width()).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim3d_core::{CameraMovement, Mesh, MotionRequest, ProjectionMode};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn app() -> TerminalApp {
        let model = Model::new(vec![Mesh::cube(1.0)]);
        TerminalApp::with_size(model, AppOptions::default(), 40, 20)
    }

    fn press(c: char) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_bound_key_queues_motion() {
        let mut app = app();
        app.handle_event(press('g'));
        assert!(!app.model().scheduler.is_idle());

        app.update(0.0);
        app.update(5.0);
        assert_eq!(
            app.model().scheduler.scale_factors(),
            Vector3::new(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn test_quit_key_stops_app() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_event(press('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_camera_keys_move_camera() {
        let mut app = app();
        let before = app.camera().position;
        app.apply(InputAction::Camera(CameraMovement::Forward));
        assert!(app.camera().position.z < before.z);
    }

    #[test]
    fn test_resize_updates_renderer() {
        let mut app = app();
        app.handle_event(Event::Resize(60, 30));
        app.update(0.0);
        assert!((app.camera().aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_option_selects_camera_mode() {
        let mut options = AppOptions::default();
        options.camera.projection = options::Projection::Orthographic;
        let app = TerminalApp::with_size(Model::new(vec![Mesh::cube(1.0)]), options, 40, 20);
        assert_eq!(app.camera().mode, ProjectionMode::Orthographic);
        assert_eq!(self::app().camera().mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_update_draws_model() {
        let mut app = app();
        app.apply(InputAction::Motion(MotionRequest::Translate {
            target: Vector3::new(0.25, 0.0, 0.0),
            duration: 1.0,
        }));
        app.update(0.0);
        app.update(1.0);
        assert_eq!(
            app.model().scheduler.position(),
            Vector3::new(0.25, 0.0, 0.0)
        );
        assert!(app.renderer.covered_cells() > 0);
    }
}
