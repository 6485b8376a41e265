use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::basic::{RenderState, mk_pipeline_layout, mk_render_pipeline},
};

/// Flat colour pipeline for the point lights, the test box and meshes that
/// kept their exported material.
pub fn mk_color_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Color Pipeline Layout",
        &[camera_bind_group_layout, uniform_bind_group_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Color Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("color.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Color Pipeline",
        &layout,
        RenderState::opaque(color_format, sample_count),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
