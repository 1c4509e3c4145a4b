use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::error::AppError;
use crate::gpu::GpuState;
use crate::input::{CloseFlag, Input};
use crate::scene::{FramePlan, Scene};

/// What the loop does after a frame failed to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
    Fatal,
}

fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Fatal,
        _ => SurfaceRecovery::Skip,
    }
}

/// Event loop handler for one scene: owns the window and its graphics
/// context from `resumed` until `exiting`.
pub(crate) struct App {
    scene: Scene,
    plan: FramePlan,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    input: Input,
    close: CloseFlag,
    error: Option<AppError>,
}

impl App {
    pub(crate) fn new(scene: Scene) -> Self {
        let plan = scene.frame_plan();
        let close = CloseFlag::new(scene.exit_key());
        Self {
            scene,
            plan,
            window: None,
            gpu_state: None,
            input: Input::new(),
            close,
            error: None,
        }
    }

    /// The setup failure that ended the loop, if any.
    pub(crate) fn into_error(self) -> Option<AppError> {
        self.error
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        self.close.request_close();
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(self.scene.window().attributes())?);
        let size = window.inner_size();
        log::info!(
            "created window '{}' ({}x{})",
            self.scene.window().title,
            size.width,
            size.height
        );

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.scene))?;
        if self.scene.report_backend() {
            println!("{}", gpu_state.backend_report());
        }

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        if let Err(e) = gpu_state.render(&self.plan) {
            match surface_recovery(&e) {
                SurfaceRecovery::Reconfigure => gpu_state.reconfigure(),
                SurfaceRecovery::Skip => log::warn!("Render error: {:?}", e),
                SurfaceRecovery::Fatal => {
                    self.fail(event_loop, AppError::Surface(e));
                    return;
                }
            }
        }
        self.input.begin_frame();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() && !self.close.should_close() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        if self.close.poll(&self.input) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.close.request_close();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surface must go before the window it was created from
        self.gpu_state = None;
        self.window = None;
        log::info!("graphics context released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_surface_is_reconfigured() {
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Lost),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        );
    }

    #[test]
    fn test_timeout_skips_frame() {
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Timeout),
            SurfaceRecovery::Skip
        );
    }

    #[test]
    fn test_out_of_memory_is_fatal() {
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Fatal
        );
        let err = AppError::Surface(wgpu::SurfaceError::OutOfMemory);
        assert!(err.to_string().starts_with("Surface error"));
    }
}
