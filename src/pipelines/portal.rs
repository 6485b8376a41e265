use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::basic::{RenderState, mk_pipeline_layout, mk_render_pipeline},
};

/// The animated portal surface. Blended and drawn from both sides.
pub fn mk_portal_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Portal Pipeline Layout",
        &[camera_bind_group_layout, uniform_bind_group_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Portal Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("portal.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Portal Pipeline",
        &layout,
        RenderState::opaque(color_format, sample_count)
            .with_blend(wgpu::BlendState::ALPHA_BLENDING)
            .double_sided(),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
