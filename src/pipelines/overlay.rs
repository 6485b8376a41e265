use crate::pipelines::basic::{DepthMode, RenderState, mk_pipeline_layout, mk_render_pipeline};

/// Full-screen fade quad. It has no vertex buffer and ignores the camera.
pub fn mk_overlay_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Overlay Pipeline Layout", &[uniform_bind_group_layout]);
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Overlay Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Overlay Pipeline",
        &layout,
        RenderState::opaque(color_format, sample_count)
            .with_blend(wgpu::BlendState::ALPHA_BLENDING)
            .with_depth(DepthMode::IGNORE)
            .double_sided(),
        &[],
        shader,
    )
}
