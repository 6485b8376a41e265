use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, CameraUniform, OrbitController, Projection},
    config::SceneConfig,
    data_structures::texture,
    viewport::Viewport,
};

/// GPU and window state shared by every part of the renderer.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub(crate) msaa_target: Option<texture::Texture>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub sample_count: u32,
    pub camera: CameraResources,
    pub projection: Projection,
    pub clear_colour: wgpu::Color,
    pub viewport: Viewport,
    max_pixel_ratio: f64,
}

impl Context {
    pub async fn new(window: Arc<Window>, scene: &SceneConfig) -> anyhow::Result<Self> {
        let viewport = Viewport::from_physical(
            window.inner_size(),
            window.scale_factor(),
            scene.max_pixel_ratio,
        );

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter found")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Cannot open the GPU device")?;

        log::info!("Surface");
        let size = viewport.surface_size_within(device.limits().max_texture_dimension_2d);
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface for
        // the encoding.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = supported_sample_count(&adapter, surface_format, scene.sample_count);

        let camera_config = &scene.camera;
        let camera = camera::Camera::new(camera_config.position, camera_config.target);
        let projection = Projection::new(
            viewport.aspect(),
            camera_config.fov_y,
            camera_config.near,
            camera_config.far,
        );
        let mut controller = OrbitController::new(
            camera_config.damping_factor,
            camera_config.rotate_speed,
            camera_config.enable_zoom,
        );
        controller.set_element_height(window.inner_size().height as f32);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
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
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            sample_count,
            "depth_texture",
        );
        let msaa_target = (sample_count > 1)
            .then(|| texture::Texture::create_msaa_target(&device, &config, sample_count));

        Ok(Self {
            window,
            depth_texture,
            msaa_target,
            surface,
            device,
            queue,
            config,
            sample_count,
            camera,
            projection,
            clear_colour: wgpu::Color::BLACK,
            viewport,
            max_pixel_ratio: scene.max_pixel_ratio,
        })
    }

    pub fn max_pixel_ratio(&self) -> f64 {
        self.max_pixel_ratio
    }

    /// Apply a new viewport: projection aspect, surface size and every render
    /// target sized after it. Calling it twice with the same viewport leaves
    /// the same state.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            return false;
        }
        let size = viewport.surface_size_within(self.device.limits().max_texture_dimension_2d);
        self.viewport = viewport;
        self.config.width = size.width;
        self.config.height = size.height;
        self.projection.set_aspect(viewport.aspect());
        self.camera
            .controller
            .set_element_height(self.window.inner_size().height as f32);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            self.sample_count,
            "depth_texture",
        );
        self.msaa_target = (self.sample_count > 1).then(|| {
            texture::Texture::create_msaa_target(&self.device, &self.config, self.sample_count)
        });
        log::debug!(
            "Resized to {}x{} (pixel ratio {})",
            size.width,
            size.height,
            viewport.pixel_ratio
        );
        true
    }

    /// Viewport derived from the window's current size and scale factor.
    pub fn window_viewport(&self) -> Viewport {
        Viewport::from_physical(
            self.window.inner_size(),
            self.window.scale_factor(),
            self.max_pixel_ratio,
        )
    }
}

fn supported_sample_count(adapter: &wgpu::Adapter, format: wgpu::TextureFormat, wanted: u32) -> u32 {
    if wanted <= 1 {
        return 1;
    }
    let flags = adapter.get_texture_format_features(format).flags;
    if flags.sample_count_supported(wanted) {
        wanted
    } else {
        log::warn!("{}x MSAA is not supported for {:?}, rendering without it", wanted, format);
        1
    }
}
