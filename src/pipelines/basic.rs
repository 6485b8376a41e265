use crate::data_structures::texture::Texture;

/// How a pipeline uses the depth buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthMode {
    pub write: bool,
    pub compare: wgpu::CompareFunction,
}

impl DepthMode {
    pub const OPAQUE: DepthMode = DepthMode {
        write: true,
        compare: wgpu::CompareFunction::Less,
    };
    /// Tested against opaque geometry but never occludes anything itself.
    pub const READ_ONLY: DepthMode = DepthMode {
        write: false,
        compare: wgpu::CompareFunction::Less,
    };
    /// Drawn over everything.
    pub const IGNORE: DepthMode = DepthMode {
        write: false,
        compare: wgpu::CompareFunction::Always,
    };
}

/// Fixed-function state of a pipeline apart from its shader and layouts.
#[derive(Clone, Copy, Debug)]
pub struct RenderState {
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    pub depth: DepthMode,
    pub cull_mode: Option<wgpu::Face>,
    pub sample_count: u32,
}

impl RenderState {
    pub fn opaque(color_format: wgpu::TextureFormat, sample_count: u32) -> Self {
        Self {
            color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth: DepthMode::OPAQUE,
            cull_mode: Some(wgpu::Face::Back),
            sample_count,
        }
    }

    pub fn with_blend(mut self, blend: wgpu::BlendState) -> Self {
        self.blend = Some(blend);
        self
    }

    pub fn with_depth(mut self, depth: DepthMode) -> Self {
        self.depth = depth;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.cull_mode = None;
        self
    }
}

/// `src + dst` on colour, used for glowing particles.
pub const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub fn mk_pipeline_layout(
    device: &wgpu::Device,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    })
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    state: RenderState,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: state.color_format,
                blend: state.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: state.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: state.depth.write,
            depth_compare: state.depth.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: state.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
