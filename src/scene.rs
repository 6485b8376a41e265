//! The portal scene.
//!
//! [`SceneState`] is everything that changes over time and does not touch
//! the GPU: clear colour, uniform sets, the overlay and the loading
//! sequence. [`PortalScene`] owns the GPU side (pipelines, buffers, bind
//! groups) and mirrors the state into uniform buffers once per frame.

use anyhow::Context as _;
use instant::Duration;
use wgpu::util::DeviceExt;

use crate::{
    config::SceneConfig,
    data_structures::{
        color::Color,
        instance::{Instance, InstanceRaw},
        model::{GpuMesh, box_geometry},
        particles::ParticleField,
        uniforms::{ColorUniformRaw, FireflyUniforms, OverlayUniforms, UniformSet, UniformValue},
    },
    debug_panel::{ColorKey, Tweak},
    materials::{MaterialBinding, MaterialRole, MaterialRules, SharedMaterials, assign_materials},
    pipelines::{Pipelines, UniformBinding, baked::mk_texture_bind_group},
    resources::{LoadedAssets, gltf::LoadedModel, progress::Progress},
    transition::{LoadPhase, LoadingSequence, TransitionEvent},
};

#[derive(Debug)]
pub struct SceneState {
    pub clear_color: Color,
    pub box_tint: Color,
    pub materials: SharedMaterials,
    pub fireflies: FireflyUniforms,
    /// `None` once the fade has finished and the overlay is gone.
    pub overlay: Option<OverlayUniforms>,
    sequence: LoadingSequence,
    overlay_removals: usize,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> anyhow::Result<Self> {
        let palette = config.palette.resolve()?;
        let firefly_color =
            Color::from_hex(&config.fireflies.color).context("firefly colour")?;
        Ok(Self {
            clear_color: palette.clear_color,
            box_tint: palette.clear_color,
            materials: SharedMaterials::new(
                &config.assets.baked_texture,
                palette.point_light,
                palette.portal_color_start,
                palette.portal_color_end,
            ),
            fireflies: FireflyUniforms::new(config.fireflies.size, firefly_color),
            overlay: Some(OverlayUniforms::opaque()),
            sequence: LoadingSequence::new(config.fade.clone()),
            overlay_removals: 0,
        })
    }

    pub fn phase(&self) -> LoadPhase {
        self.sequence.phase()
    }

    pub fn on_progress(&mut self, progress: Progress) {
        log::debug!("Progress {}/{}", progress.loaded, progress.total);
        self.sequence.on_progress(progress.ratio());
    }

    /// Step the loading sequence and apply its overlay changes. The returned
    /// events still carry the bar changes for the page.
    pub fn advance(&mut self, dt: Duration) -> Vec<TransitionEvent> {
        let events = self.sequence.advance(dt);
        for event in &events {
            match *event {
                TransitionEvent::OverlayAlpha(alpha) => {
                    if let Some(overlay) = self.overlay.as_mut() {
                        if let Err(e) = overlay.set("uAlpha", UniformValue::Float(alpha)) {
                            log::error!("{}", e);
                        }
                    }
                }
                TransitionEvent::OverlayRemoved => {
                    if self.overlay.take().is_some() {
                        self.overlay_removals += 1;
                        log::info!("Overlay removed from the scene");
                    }
                }
                _ => (),
            }
        }
        events
    }

    /// Write the clock into every time-driven uniform.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        let t = UniformValue::Float(elapsed.as_secs_f32());
        let results = [
            self.materials.portal.uniforms.set("uTime", t),
            self.fireflies.set("uTime", t),
        ];
        for result in results {
            if let Err(e) = result {
                log::error!("{}", e);
            }
        }
    }

    pub fn apply_tweak(&mut self, tweak: Tweak) {
        let portal = &mut self.materials.portal.uniforms;
        let result = match tweak.key {
            ColorKey::ClearColor => {
                self.clear_color = tweak.color;
                self.box_tint = tweak.color;
                Ok(())
            }
            ColorKey::PortalColorStart => portal.set("uColorStart", UniformValue::Color(tweak.color)),
            ColorKey::PortalColorEnd => portal.set("uColorEnd", UniformValue::Color(tweak.color)),
        };
        match result {
            Ok(()) => log::debug!("{} set to {}", tweak.key.label(), tweak.color.to_hex()),
            Err(e) => log::error!("{}", e),
        }
    }

    pub fn overlay_alpha(&self) -> Option<f32> {
        self.overlay.as_ref().map(|overlay| overlay.alpha)
    }

    /// How often the overlay has been taken out of the scene (0 or 1).
    pub fn overlay_removals(&self) -> usize {
        self.overlay_removals
    }
}

/// What a model primitive is drawn with.
#[derive(Debug)]
pub enum DrawMaterial {
    Baked,
    PointLight,
    Portal,
    /// Exported material, drawn unlit in its base colour.
    Original(UniformBinding),
}

impl DrawMaterial {
    fn role(binding: MaterialBinding) -> Option<MaterialRole> {
        match binding {
            MaterialBinding::Shared(role) => Some(role),
            MaterialBinding::Original => None,
        }
    }
}

#[derive(Debug)]
pub struct ModelDraw {
    pub mesh: usize,
    pub instance: wgpu::Buffer,
    pub material: DrawMaterial,
}

#[derive(Debug)]
pub struct ModelDraws {
    pub model: LoadedModel,
    pub baked: wgpu::BindGroup,
    pub draws: Vec<ModelDraw>,
}

impl ModelDraws {
    pub fn mesh(&self, draw: &ModelDraw) -> Option<&GpuMesh> {
        self.model.meshes.get(draw.mesh)
    }
}

#[derive(Debug)]
pub struct PortalScene {
    pub pipelines: Pipelines,
    pub state: SceneState,
    pub test_box: GpuMesh,
    pub box_instance: wgpu::Buffer,
    pub box_color: UniformBinding,
    pub point_light: UniformBinding,
    pub portal: UniformBinding,
    pub firefly_instances: wgpu::Buffer,
    pub firefly_count: u32,
    pub fireflies: UniformBinding,
    pub overlay: UniformBinding,
    pub model: Option<ModelDraws>,
    rules: MaterialRules,
    placement: Instance,
}

impl PortalScene {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        camera_layout: &wgpu::BindGroupLayout,
        config: &SceneConfig,
    ) -> anyhow::Result<Self> {
        let state = SceneState::new(config)?;
        let pipelines = Pipelines::new(device, color_format, sample_count, camera_layout);
        let layout = &pipelines.uniform_layout;

        let [w, h, d] = config.test_box.size;
        let (vertices, indices) = box_geometry(w, h, d);
        let test_box = GpuMesh::new(device, "test box", &vertices, &indices, None);
        let box_instance = mk_instance_buffer(
            device,
            "test box",
            &Instance::from(cgmath::Vector3::from(config.test_box.position)),
        );
        let box_color = UniformBinding::new(
            device,
            layout,
            "test box",
            &ColorUniformRaw::from(state.box_tint),
        );
        let point_light = UniformBinding::new(
            device,
            layout,
            "point light",
            &ColorUniformRaw::from(state.materials.point_light),
        );
        let portal = UniformBinding::new(
            device,
            layout,
            "portal",
            &state.materials.portal.uniforms.to_raw(),
        );

        let field = ParticleField::random(config.fireflies.count, &config.fireflies.bounds);
        log::info!("Generated {} fireflies", field.len());
        let firefly_instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Instance Buffer"),
            contents: bytemuck::cast_slice(&field.to_raw()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let fireflies = UniformBinding::new(device, layout, "fireflies", &state.fireflies.to_raw());
        let overlay = UniformBinding::new(
            device,
            layout,
            "overlay",
            &OverlayUniforms::opaque().to_raw(),
        );

        Ok(Self {
            pipelines,
            state,
            test_box,
            box_instance,
            box_color,
            point_light,
            portal,
            firefly_instances,
            firefly_count: field.len() as u32,
            fireflies,
            overlay,
            model: None,
            rules: config.materials.clone(),
            placement: Instance::scaled_and_turned(config.model.scale, config.model.yaw),
        })
    }

    /// Place the loaded model, bind the shared materials by mesh name and
    /// build one draw per primitive.
    pub fn attach_model(&mut self, device: &wgpu::Device, assets: LoadedAssets) -> anyhow::Result<()> {
        let LoadedAssets { mut model, baked } = assets;
        model.root.set_local_transform(self.placement.clone());
        model.root.update_world_transform_all();
        assign_materials(&mut model.root, &self.rules);

        let baked = mk_texture_bind_group(device, &self.pipelines.texture_layout, &baked)?;

        let mut draws = Vec::new();
        for node in model.root.collect_meshes() {
            let instance = InstanceRaw::from(*node.world);
            for &mesh in node.primitives {
                let Some(gpu_mesh) = model.meshes.get(mesh) else {
                    log::warn!("Node {:?} refers to missing primitive {}", node.name, mesh);
                    continue;
                };
                let material = match DrawMaterial::role(node.material) {
                    Some(MaterialRole::Baked) => DrawMaterial::Baked,
                    Some(MaterialRole::PointLight) => DrawMaterial::PointLight,
                    Some(MaterialRole::Portal) => DrawMaterial::Portal,
                    None => DrawMaterial::Original(UniformBinding::new(
                        device,
                        &self.pipelines.uniform_layout,
                        node.name,
                        &ColorUniformRaw::from(model.base_color(gpu_mesh)),
                    )),
                };
                draws.push(ModelDraw {
                    mesh,
                    instance: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{:?} Instance Buffer", node.name)),
                        contents: bytemuck::cast_slice(&[instance]),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    material,
                });
            }
        }
        log::info!("Model attached with {} draws", draws.len());
        self.model = Some(ModelDraws {
            model,
            baked,
            draws,
        });
        Ok(())
    }

    /// Upload every uniform that may have changed this frame.
    pub fn sync(&self, queue: &wgpu::Queue) {
        self.box_color
            .write(queue, &ColorUniformRaw::from(self.state.box_tint));
        self.portal
            .write(queue, &self.state.materials.portal.uniforms.to_raw());
        self.fireflies.write(queue, &self.state.fireflies.to_raw());
        if let Some(overlay) = &self.state.overlay {
            self.overlay.write(queue, &overlay.to_raw());
        }
    }
}

fn mk_instance_buffer(device: &wgpu::Device, label: &str, instance: &Instance) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Instance Buffer", label)),
        contents: bytemuck::cast_slice(&[instance.to_raw()]),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
