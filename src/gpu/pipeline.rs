//! Program compilation with checked compile and link status.
//!
//! wgpu reports shader and pipeline validation failures through error scopes
//! rather than return values, so every module and pipeline is created inside
//! its own scope and the scope is drained before moving on.
//!
//! The vertex stage is compiled once per device and shared by every program.

use crate::error::GpuError;
use crate::shader::{Program, Vertex, FRAGMENT_ENTRY, VERTEX_ENTRY, VERTEX_SOURCE};

use super::DEPTH_FORMAT;

async fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = device.pop_error_scope().await {
        return Err(GpuError::ShaderCompilation {
            label: label.to_string(),
            message: err.to_string(),
        });
    }
    Ok(module)
}

/// Compile the vertex stage every program links against.
pub(crate) async fn compile_vertex_stage(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, GpuError> {
    compile_stage(device, "Shared Vertex", VERTEX_SOURCE).await
}

/// Compile the fragment stage of `program` and link it with `vertex` into a render
/// pipeline.
pub(crate) async fn build_program(
    device: &wgpu::Device,
    vertex: &wgpu::ShaderModule,
    program: &Program,
    format: wgpu::TextureFormat,
    depth_test: bool,
) -> Result<wgpu::RenderPipeline, GpuError> {
    let fragment_label = format!("{} Fragment", program.label);
    let fragment = compile_stage(device, &fragment_label, &program.fragment_source()).await?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(program.label.as_str()),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(program.label.as_str()),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_test.then(|| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = device.pop_error_scope().await {
        return Err(GpuError::PipelineLink {
            label: program.label.clone(),
            message: err.to_string(),
        });
    }

    log::debug!("linked program '{}'", program.label);
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::noop_device;
    use crate::shader::ORANGE;
    use glam::Vec4;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    #[test]
    fn test_valid_program_links() {
        let (device, _queue) = noop_device();
        pollster::block_on(async {
            let vertex = compile_vertex_stage(&device).await.expect("vertex stage compiles");
            let program = Program::new("Orange", ORANGE);

            assert!(build_program(&device, &vertex, &program, FORMAT, false).await.is_ok());
            assert!(build_program(&device, &vertex, &program, FORMAT, true).await.is_ok());
        });
    }

    #[test]
    fn test_broken_fragment_reports_compile_error() {
        let (device, _queue) = noop_device();
        let result = pollster::block_on(async {
            let vertex = compile_vertex_stage(&device).await.expect("vertex stage compiles");
            build_program(&device, &vertex, &Program::new("Nan", Vec4::NAN), FORMAT, false).await
        });

        match result {
            Err(GpuError::ShaderCompilation { label, .. }) => assert_eq!(label, "Nan Fragment"),
            other => panic!("expected a compile error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_depth_color_target_reports_link_error() {
        let (device, _queue) = noop_device();
        let result = pollster::block_on(async {
            let vertex = compile_vertex_stage(&device).await.expect("vertex stage compiles");
            let program = Program::new("Orange", ORANGE);
            build_program(&device, &vertex, &program, DEPTH_FORMAT, false).await
        });

        match result {
            Err(GpuError::PipelineLink { label, .. }) => assert_eq!(label, "Orange"),
            other => panic!("expected a link error, got {:?}", other.map(|_| ())),
        }
    }
}
