use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::basic::{RenderState, mk_pipeline_layout, mk_render_pipeline},
};

/// Unlit pipeline for meshes showing the baked lighting texture.
pub fn mk_baked_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Baked Pipeline Layout",
        &[camera_bind_group_layout, texture_bind_group_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Baked Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("baked.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Baked Pipeline",
        &layout,
        RenderState::opaque(color_format, sample_count),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}

/// Bind the baked texture and its sampler for the baked pipeline.
pub fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &crate::data_structures::texture::Texture,
) -> anyhow::Result<wgpu::BindGroup> {
    let sampler = texture
        .sampler
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("baked texture was created without a sampler"))?;
    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("baked texture_bind_group"),
    }))
}
