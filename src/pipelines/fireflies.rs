use crate::{
    data_structures::{model::Vertex, particles::ParticleRaw},
    pipelines::basic::{ADDITIVE_BLENDING, DepthMode, RenderState, mk_pipeline_layout, mk_render_pipeline},
};

/// Vertices per firefly quad (two triangles, no index buffer).
pub const VERTICES_PER_FIREFLY: u32 = 6;

/// Additive, depth-tested but not depth-writing sprites.
pub fn mk_fireflies_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Fireflies Pipeline Layout",
        &[camera_bind_group_layout, uniform_bind_group_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Fireflies Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("fireflies.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Fireflies Pipeline",
        &layout,
        RenderState::opaque(color_format, sample_count)
            .with_blend(ADDITIVE_BLENDING)
            .with_depth(DepthMode::READ_ONLY)
            .double_sided(),
        &[ParticleRaw::desc()],
        shader,
    )
}
