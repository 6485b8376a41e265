//! Frame composition.
//!
//! The scene is flattened into a list of [`Render`] items, grouped by
//! [`Stage`] so opaque geometry is drawn before the blended portal, the
//! additive fireflies and finally the overlay. One render pass per frame.

use std::iter;

use crate::{
    context::Context,
    data_structures::model::{DrawMesh, GpuMesh},
    pipelines::fireflies::VERTICES_PER_FIREFLY,
    scene::{DrawMaterial, PortalScene},
};

/// A mesh with the buffer holding its single instance.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a GpuMesh,
}

/// Pipeline batches in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Baked,
    Colored,
    Portal,
    Fireflies,
    Overlay,
}

pub enum Render<'a> {
    Baked(Instanced<'a>),
    Colored(Instanced<'a>, &'a wgpu::BindGroup),
    Portal(Instanced<'a>),
    Fireflies { instances: &'a wgpu::Buffer, amount: u32 },
    Overlay,
}

impl Render<'_> {
    pub fn stage(&self) -> Stage {
        match self {
            Render::Baked(_) => Stage::Baked,
            Render::Colored(..) => Stage::Colored,
            Render::Portal(_) => Stage::Portal,
            Render::Fireflies { .. } => Stage::Fireflies,
            Render::Overlay => Stage::Overlay,
        }
    }
}

/// Everything to draw this frame, sorted by stage.
pub fn collect(scene: &PortalScene) -> Vec<Render<'_>> {
    let mut renders = vec![Render::Colored(
        Instanced {
            instance: &scene.box_instance,
            mesh: &scene.test_box,
        },
        &scene.box_color.bind_group,
    )];

    if let Some(model) = &scene.model {
        for draw in &model.draws {
            let Some(mesh) = model.mesh(draw) else {
                continue;
            };
            let instanced = Instanced {
                instance: &draw.instance,
                mesh,
            };
            renders.push(match &draw.material {
                DrawMaterial::Baked => Render::Baked(instanced),
                DrawMaterial::PointLight => {
                    Render::Colored(instanced, &scene.point_light.bind_group)
                }
                DrawMaterial::Portal => Render::Portal(instanced),
                DrawMaterial::Original(binding) => Render::Colored(instanced, &binding.bind_group),
            });
        }
    }

    if scene.firefly_count > 0 {
        renders.push(Render::Fireflies {
            instances: &scene.firefly_instances,
            amount: scene.firefly_count,
        });
    }
    if scene.state.overlay.is_some() {
        renders.push(Render::Overlay);
    }
    // stable, so draws keep their traversal order within a stage
    renders.sort_by_key(|render| render.stage());
    renders
}

pub fn draw_frame(ctx: &Context, scene: &PortalScene) -> Result<(), wgpu::SurfaceError> {
    let output = ctx.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let (target, resolve_target) = match &ctx.msaa_target {
        Some(msaa) => (&msaa.view, Some(&view)),
        None => (&view, None),
    };

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &ctx.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let pipelines = &scene.pipelines;
        let baked = scene.model.as_ref().map(|model| &model.baked);
        let mut current = None;
        for render in collect(scene) {
            let stage = render.stage();
            if current != Some(stage) {
                current = Some(stage);
                render_pass.set_pipeline(match stage {
                    Stage::Baked => &pipelines.baked,
                    Stage::Colored => &pipelines.color,
                    Stage::Portal => &pipelines.portal,
                    Stage::Fireflies => &pipelines.fireflies,
                    Stage::Overlay => &pipelines.overlay,
                });
            }
            match render {
                Render::Baked(instanced) => {
                    let Some(baked) = baked else {
                        continue;
                    };
                    render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, baked, &[]);
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_mesh_instanced(instanced.mesh, 0..1);
                }
                Render::Colored(instanced, material) => {
                    render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, material, &[]);
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_mesh_instanced(instanced.mesh, 0..1);
                }
                Render::Portal(instanced) => {
                    render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, &scene.portal.bind_group, &[]);
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_mesh_instanced(instanced.mesh, 0..1);
                }
                Render::Fireflies { instances, amount } => {
                    render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, &scene.fireflies.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, instances.slice(..));
                    render_pass.draw(0..VERTICES_PER_FIREFLY, 0..amount);
                }
                Render::Overlay => {
                    render_pass.set_bind_group(0, &scene.overlay.bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }
        }
    }

    ctx.queue.submit(iter::once(encoder.finish()));
    output.present();
    Ok(())
}
