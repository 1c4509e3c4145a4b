//! Error types for psim.
//!
//! Every setup step returns one of these instead of aborting, so the entry
//! point decides what a failure means for the process.

use std::fmt;

/// Errors that can occur while binding the GPU to a window.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the window surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// A shader stage failed validation.
    ShaderCompilation { label: String, message: String },
    /// Vertex and fragment stages could not be linked into a pipeline.
    PipelineLink { label: String, message: String },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter(e) => write!(f, "No compatible GPU adapter found: {}", e),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::ShaderCompilation { label, message } => {
                write!(f, "Failed to compile shader '{}': {}", label, message)
            }
            GpuError::PipelineLink { label, message } => {
                write!(f, "Failed to link program '{}': {}", label, message)
            }
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors found in a scene before any window is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A mesh refers to a program that was never added to the scene.
    UnknownProgram { mesh: usize, program: usize },
    /// A program color has a NaN or infinite channel.
    NonFiniteColor { program: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownProgram { mesh, program } => write!(
                f,
                "Mesh {} uses program {} which is not part of the scene",
                mesh, program
            ),
            SceneError::NonFiniteColor { program } => {
                write!(f, "Program {} has a non-finite color", program)
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Errors that can occur when running a scene.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The scene is inconsistent.
    Scene(SceneError),
    /// The surface failed in a way the render loop cannot recover from.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
            AppError::Scene(e) => write!(f, "Invalid scene: {}", e),
            AppError::Surface(e) => write!(f, "Surface error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
            AppError::Scene(e) => Some(e),
            AppError::Surface(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::Scene(e)
    }
}
