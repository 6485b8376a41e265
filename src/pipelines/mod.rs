//! Render pipelines and the bind group layouts they share.
//!
//! Group 0 is always the camera. Group 1 is either the baked texture or a
//! single uniform buffer, depending on the material.

use wgpu::util::DeviceExt;

pub mod baked;
pub mod basic;
pub mod color;
pub mod fireflies;
pub mod overlay;
pub mod portal;

pub fn mk_uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

pub fn mk_texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("baked texture_bind_group_layout"),
    })
}

/// A uniform buffer and the bind group exposing it at binding 0.
#[derive(Debug)]
pub struct UniformBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    pub fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        value: &T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            contents: bytemuck::cast_slice(std::slice::from_ref(value)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{} bind_group", label)),
        });
        Self { buffer, bind_group }
    }

    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(std::slice::from_ref(value)));
    }
}

/// Every pipeline the scene draws with, built once after the device exists.
#[derive(Debug)]
pub struct Pipelines {
    pub baked: wgpu::RenderPipeline,
    pub color: wgpu::RenderPipeline,
    pub portal: wgpu::RenderPipeline,
    pub fireflies: wgpu::RenderPipeline,
    pub overlay: wgpu::RenderPipeline,
    pub texture_layout: wgpu::BindGroupLayout,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let texture_layout = mk_texture_layout(device);
        let uniform_layout = mk_uniform_layout(device, "material uniform_bind_group_layout");
        log::info!("Building render pipelines ({}x MSAA)", sample_count);
        Self {
            baked: baked::mk_baked_pipeline(
                device,
                color_format,
                sample_count,
                camera_layout,
                &texture_layout,
            ),
            color: color::mk_color_pipeline(
                device,
                color_format,
                sample_count,
                camera_layout,
                &uniform_layout,
            ),
            portal: portal::mk_portal_pipeline(
                device,
                color_format,
                sample_count,
                camera_layout,
                &uniform_layout,
            ),
            fireflies: fireflies::mk_fireflies_pipeline(
                device,
                color_format,
                sample_count,
                camera_layout,
                &uniform_layout,
            ),
            overlay: overlay::mk_overlay_pipeline(
                device,
                color_format,
                sample_count,
                &uniform_layout,
            ),
            texture_layout,
            uniform_layout,
        }
    }
}
