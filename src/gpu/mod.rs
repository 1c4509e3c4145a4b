mod pipeline;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::scene::{FramePlan, Scene};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The graphics context bound to one window, plus everything uploaded to it.
pub(crate) struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
    pipelines: Vec<wgpu::RenderPipeline>,
    vertex_buffers: Vec<wgpu::Buffer>,
    depth_texture: Option<wgpu::TextureView>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, scene: &Scene) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::debug!("adapter: {:?}", adapter_info);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Clear and fragment colors are written as given, not gamma-encoded
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!(
            "surface configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        let depth_texture = scene
            .depth_test()
            .then(|| create_depth_texture(&device, &config));

        let mut pipelines = Vec::with_capacity(scene.programs().len());
        if !scene.programs().is_empty() {
            let vertex = pipeline::compile_vertex_stage(&device).await?;
            for program in scene.programs() {
                pipelines.push(
                    pipeline::build_program(
                        &device,
                        &vertex,
                        program,
                        config.format,
                        scene.depth_test(),
                    )
                    .await?,
                );
            }
        }

        let vertex_buffers: Vec<wgpu::Buffer> = scene
            .meshes()
            .iter()
            .enumerate()
            .map(|(i, mesh)| {
                let label = format!("Triangle {} Vertex Buffer", i + 1);
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label.as_str()),
                    contents: mesh.triangle.as_bytes(),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();

        log::info!(
            "graphics ready: {} program(s), {} triangle(s)",
            pipelines.len(),
            scene.meshes().len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_info,
            pipelines,
            vertex_buffers,
            depth_texture,
        })
    }

    pub fn backend_report(&self) -> String {
        backend_report(&self.adapter_info)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            if self.depth_texture.is_some() {
                self.depth_texture = Some(create_depth_texture(&self.device, &self.config));
            }
        }
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let c = plan.clear_color.as_dvec4();
            let depth_stencil_attachment = match (&self.depth_texture, plan.clear_depth) {
                (Some(depth), Some(clear)) => Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                _ => None,
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.x,
                            g: c.y,
                            b: c.z,
                            a: c.w,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for draw in &plan.draws {
                let (Some(pipeline), Some(buffer)) = (
                    self.pipelines.get(draw.program.index()),
                    self.vertex_buffers.get(draw.mesh),
                ) else {
                    log::warn!("skipping draw with no uploaded resources: {:?}", draw);
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(draw.vertices.clone(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// One line naming the backend and driver of an adapter.
pub(crate) fn backend_report(info: &wgpu::AdapterInfo) -> String {
    let driver = match (info.driver.is_empty(), info.driver_info.is_empty()) {
        (false, false) => format!("{} {}", info.driver, info.driver_info),
        (false, true) => info.driver.clone(),
        (true, false) => info.driver_info.clone(),
        (true, true) => "unknown driver".to_string(),
    };
    format!(
        "Graphics backend: {:?} ({}) on {}",
        info.backend, driver, info.name
    )
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Adapter on the no-op backend: full validation, no hardware or display.
#[cfg(test)]
pub(crate) fn noop_adapter() -> wgpu::Adapter {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
        .expect("noop adapter")
}

#[cfg(test)]
pub(crate) fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    pollster::block_on(noop_adapter().request_device(&wgpu::DeviceDescriptor::default()))
        .expect("noop device")
}
