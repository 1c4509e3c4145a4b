//! Scene builder and runner

use glam::Vec4;
use winit::dpi::PhysicalSize;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes};

use crate::error::{AppError, SceneError};
use crate::geometry::{Mesh, Triangle};
use crate::shader::Program;
use crate::window::App;

pub const DEFAULT_TITLE: &str = "Particle Simulator";

/// Index of a program inside the scene that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub(crate) usize);

impl ProgramId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed window parameters, set once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: DEFAULT_TITLE.to_string(),
            resizable: true,
        }
    }
}

impl WindowConfig {
    pub fn attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height))
            .with_resizable(self.resizable)
    }
}

/// One bind-then-draw step of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub program: ProgramId,
    pub mesh: usize,
    pub vertices: std::ops::Range<u32>,
}

/// Everything the renderer does in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear_color: Vec4,
    pub clear_depth: Option<f32>,
    pub draws: Vec<DrawCommand>,
}

/// A window, its programs and the triangles drawn every frame.
///
/// Use method chaining to configure, then call `.run()` to start.
#[derive(Debug, Clone)]
pub struct Scene {
    window: WindowConfig,
    clear_color: Vec4,
    depth_test: bool,
    exit_key: Option<KeyCode>,
    report_backend: bool,
    programs: Vec<Program>,
    meshes: Vec<Mesh>,
}

impl Scene {
    /// Create an empty scene with an 800x600 window.
    pub fn new() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            depth_test: false,
            exit_key: None,
            report_backend: false,
            programs: Vec::new(),
            meshes: Vec::new(),
        }
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set the window size in physical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn with_clear_color(mut self, color: Vec4) -> Self {
        self.clear_color = color;
        self
    }

    /// Enable a depth buffer cleared to 1.0 and tested with `Less`.
    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test = enabled;
        self
    }

    /// Key that closes the window when pressed.
    pub fn with_exit_key(mut self, key: KeyCode) -> Self {
        self.exit_key = Some(key);
        self
    }

    /// Print the graphics backend and driver to stdout once the device is up.
    pub fn with_backend_report(mut self, enabled: bool) -> Self {
        self.report_backend = enabled;
        self
    }

    pub fn add_program(&mut self, program: Program) -> ProgramId {
        self.programs.push(program);
        ProgramId(self.programs.len() - 1)
    }

    /// Add a triangle drawn by `program`. Returns the mesh index.
    pub fn add_triangle(&mut self, triangle: Triangle, program: ProgramId) -> usize {
        self.meshes.push(Mesh { triangle, program });
        self.meshes.len() - 1
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn exit_key(&self) -> Option<KeyCode> {
        self.exit_key
    }

    pub fn report_backend(&self) -> bool {
        self.report_backend
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Check that every program color is finite and every mesh is drawn by a
    /// program of this scene.
    pub fn validate(&self) -> Result<(), SceneError> {
        if let Some(program) = self.programs.iter().position(|p| !p.color.is_finite()) {
            return Err(SceneError::NonFiniteColor { program });
        }
        for (mesh, m) in self.meshes.iter().enumerate() {
            if m.program.0 >= self.programs.len() {
                return Err(SceneError::UnknownProgram {
                    mesh,
                    program: m.program.0,
                });
            }
        }
        Ok(())
    }

    /// The per-frame sequence: clear once, then one draw per mesh in order.
    pub fn frame_plan(&self) -> FramePlan {
        FramePlan {
            clear_color: self.clear_color,
            clear_depth: self.depth_test.then_some(1.0),
            draws: self
                .meshes
                .iter()
                .enumerate()
                .map(|(mesh, m)| DrawCommand {
                    program: m.program,
                    mesh,
                    vertices: 0..m.triangle.vertex_count(),
                })
                .collect(),
        }
    }

    /// Run the scene. This blocks until the window is closed.
    ///
    /// Any setup failure (event loop, window, GPU, shaders) is returned
    /// instead of aborting the process.
    pub fn run(self) -> Result<(), AppError> {
        self.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.into_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{ORANGE, YELLOW};

    fn unit_triangle() -> Triangle {
        Triangle::from_positions([[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]])
    }

    #[test]
    fn test_program_ids_are_sequential() {
        let mut scene = Scene::new();
        let a = scene.add_program(Program::new("a", ORANGE));
        let b = scene.add_program(Program::new("b", YELLOW));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn test_validate_rejects_unknown_program() {
        let mut scene = Scene::new();
        scene.add_triangle(unit_triangle(), ProgramId(3));
        assert_eq!(
            scene.validate(),
            Err(SceneError::UnknownProgram { mesh: 0, program: 3 })
        );
    }

    #[test]
    fn test_validate_rejects_non_finite_color() {
        let mut scene = Scene::new();
        scene.add_program(Program::new("ok", ORANGE));
        let bad = scene.add_program(Program::new("bad", Vec4::new(1.0, f32::NAN, 0.0, 1.0)));
        scene.add_triangle(unit_triangle(), bad);
        assert_eq!(
            scene.validate(),
            Err(SceneError::NonFiniteColor { program: 1 })
        );

        let mut scene = Scene::new();
        scene.add_program(Program::new("inf", Vec4::splat(f32::INFINITY)));
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_empty_scene_plans_clear_only() {
        let scene = Scene::new().with_depth_test(true);
        let plan = scene.frame_plan();
        assert!(plan.draws.is_empty());
        assert_eq!(plan.clear_depth, Some(1.0));
    }

    #[test]
    fn test_frame_plan_draws_in_mesh_order() {
        let mut scene = Scene::new();
        let p = scene.add_program(Program::new("p", ORANGE));
        scene.add_triangle(unit_triangle(), p);
        scene.add_triangle(unit_triangle(), p);

        let plan = scene.frame_plan();
        assert_eq!(plan.clear_depth, None);
        let meshes: Vec<usize> = plan.draws.iter().map(|d| d.mesh).collect();
        assert_eq!(meshes, vec![0, 1]);
        assert!(plan.draws.iter().all(|d| d.vertices == (0..3)));
    }

    #[test]
    fn test_window_attributes() {
        let attrs = Scene::new().with_size(1024, 768).window().attributes();
        assert_eq!(attrs.title, DEFAULT_TITLE);
        assert_eq!(attrs.inner_size, Some(PhysicalSize::new(1024u32, 768u32).into()));
        assert!(attrs.resizable);
    }
}
