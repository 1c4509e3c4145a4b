//! # psim - Particle Simulator bootstrap
//!
//! Opens a window, binds a GPU to it, builds a few constant-color programs and
//! redraws a fixed set of triangles every frame until the window is closed.
//!
//! ## Quick Start
//!
//! ```ignore
//! use psim::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let mut scene = Scene::new()
//!         .with_size(800, 600)
//!         .with_clear_color(Vec4::new(0.2, 0.3, 0.3, 1.0))
//!         .with_exit_key(KeyCode::Escape);
//!
//!     let orange = scene.add_program(Program::new("Orange", ORANGE));
//!     scene.add_triangle(
//!         Triangle::new(
//!             Vec3::new(-0.5, -0.5, 0.0),
//!             Vec3::new(0.5, -0.5, 0.0),
//!             Vec3::new(0.0, 0.5, 0.0),
//!         ),
//!         orange,
//!     );
//!
//!     scene.run()
//! }
//! ```
//!
//! ## Lifecycle
//!
//! [`Scene::run`] validates the scene, creates the event loop on the calling
//! thread (which must be the main thread), then on the first `resumed` event
//! creates the window and the GPU state: surface, adapter, device, one render
//! pipeline per [`Program`] and one vertex buffer per [`Triangle`]. Each
//! redraw executes the scene's [`FramePlan`]. The loop ends when the window
//! is closed or the exit key is pressed. GPU resources are dropped before the
//! window on exit.
//!
//! Every setup failure comes back as an [`AppError`]; shader compilation and
//! pipeline linking are checked, not assumed.

pub mod error;
pub mod geometry;
mod gpu;
pub mod input;
pub mod scene;
pub mod shader;
pub mod variants;
mod window;

pub use error::{AppError, GpuError, SceneError};
pub use geometry::{Mesh, Triangle};
pub use glam::{Vec3, Vec4};
pub use input::{CloseFlag, Input, RunState};
pub use scene::{DrawCommand, FramePlan, ProgramId, Scene, WindowConfig, DEFAULT_TITLE};
pub use shader::{Program, Vertex, ORANGE, YELLOW};
pub use winit::keyboard::KeyCode;

/// Run a scene from a binary entry point.
///
/// Initializes logging (default level `info`, overridable with `RUST_LOG`),
/// runs the scene, and exits the process with status 1 on failure.
pub fn run_or_exit(scene: Scene) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = scene.run() {
        log::error!("fatal: {}", e);
        std::process::exit(1);
    }
}

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::error::AppError;
    pub use crate::geometry::Triangle;
    pub use crate::scene::{Scene, WindowConfig};
    pub use crate::shader::{Program, ORANGE, YELLOW};
    pub use glam::{Vec3, Vec4};
    pub use winit::keyboard::KeyCode;
}
