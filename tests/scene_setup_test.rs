use cgmath::{Deg, Matrix4, Point3, Quaternion, Rotation3, Transform, Vector3};
use common::test_utils::{assert_close, portal_like_tree};
use portal_scene::{
    config::{Palette, SceneConfig},
    data_structures::{
        instance::Instance,
        model::box_geometry,
        particles::{FIREFLY_COUNT, ParticleBounds, ParticleField},
        scene_graph::SceneNode,
        uniforms::PortalUniforms,
    },
    materials::{MaterialBinding, MaterialRole, MaterialRules, assign_materials},
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

fn bindings(root: &SceneNode) -> Vec<(String, MaterialBinding)> {
    let mut out = Vec::new();
    root.traverse(&mut |node| out.push((node.name.clone(), node.material)));
    out
}

#[test]
fn should_bind_listed_meshes_to_shared_materials() {
    let mut root = portal_like_tree();
    let bound = assign_materials(&mut root, &MaterialRules::default());
    assert_eq!(bound, 4);

    let material = |name: &str| root.find(name).unwrap().material;
    assert_eq!(material("Plane003"), MaterialBinding::Shared(MaterialRole::Baked));
    assert_eq!(material("Cube012"), MaterialBinding::Shared(MaterialRole::PointLight));
    assert_eq!(material("Cube015"), MaterialBinding::Shared(MaterialRole::PointLight));
    assert_eq!(material("Circle"), MaterialBinding::Shared(MaterialRole::Portal));
    assert_eq!(material("Bench"), MaterialBinding::Original);
    assert_eq!(material("Props"), MaterialBinding::Original);
}

#[test]
fn should_leave_bindings_unchanged_when_assigned_twice() {
    let mut root = portal_like_tree();
    let rules = MaterialRules::default();
    assign_materials(&mut root, &rules);
    let once = bindings(&root);
    assign_materials(&mut root, &rules);
    assert_eq!(bindings(&root), once);
}

#[test]
fn should_not_bind_group_nodes_by_name() {
    let mut root = SceneNode::group("Scene");
    root.add_child(SceneNode::group("Circle"));
    assert_eq!(assign_materials(&mut root, &MaterialRules::default()), 0);
}

#[test]
fn should_let_the_last_rule_win() {
    let rules = MaterialRules::default().with(MaterialRole::Baked, &["Circle"]);
    assert_eq!(rules.role_for("Circle"), Some(MaterialRole::Baked));
    assert_eq!(rules.role_for("Cube012"), Some(MaterialRole::PointLight));
    assert_eq!(rules.role_for("Bench"), None);
}

#[test]
fn should_expose_portal_uniform_names() {
    assert_eq!(PortalUniforms::NAMES, &["uTime", "uColorStart", "uColorEnd"]);
}

#[test]
fn should_scatter_fireflies_inside_bounds() {
    let bounds = ParticleBounds::default();
    let mut rng = StdRng::seed_from_u64(7);
    let field = ParticleField::generate(FIREFLY_COUNT, &bounds, &mut rng);

    assert_eq!(field.len(), 50);
    assert_eq!(field.phases.len(), 50);
    assert!(field.positions.iter().all(|p| bounds.contains(*p)));
    assert!(field.phases.iter().all(|phase| (0.0..1.0).contains(phase)));

    let raw = field.to_raw();
    assert_eq!(raw.len(), 50);
    assert_eq!(raw[3].position, field.positions[3]);
    assert_eq!(raw[3].phase, field.phases[3]);
}

#[test]
fn should_reproduce_fireflies_from_the_same_seed() {
    let bounds = ParticleBounds::default();
    let a = ParticleField::generate(10, &bounds, &mut StdRng::seed_from_u64(42));
    let b = ParticleField::generate(10, &bounds, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn should_allow_an_empty_firefly_field() {
    let field = ParticleField::random(0, &ParticleBounds::default());
    assert!(field.is_empty());
    assert!(field.to_raw().is_empty());
}

#[test]
fn should_compose_world_transforms_down_the_tree() {
    let mut root = SceneNode::group("Scene").with_local_transform(Instance {
        scale: Vector3::new(2.0, 2.0, 2.0),
        ..Instance::from(Vector3::new(1.0, 0.0, 0.0))
    });
    root.add_child(
        SceneNode::mesh("Child", vec![0]).with_local_transform(Instance::from(Vector3::new(1.0, 0.0, 0.0))),
    );
    root.update_world_transform_all();

    let child = root.find("Child").unwrap().get_world_transform();
    assert_close(child.w.x, 3.0, 1e-6);
    assert_close(child.y.y, 2.0, 1e-6);
}

#[test]
fn should_shear_rotated_children_under_a_stretched_parent() {
    let mut root = SceneNode::group("Stretched").with_local_transform(Instance {
        scale: Vector3::new(2.0, 1.0, 1.0),
        ..Instance::new()
    });
    let turned = Instance {
        rotation: Quaternion::from_angle_z(Deg(90.0)),
        ..Instance::new()
    };
    root.add_child(SceneNode::mesh("Child", vec![0]).with_local_transform(turned.clone()));
    root.update_world_transform_all();

    // +x turns to +y before the parent stretches x, so y stays 1
    let world = root.find("Child").unwrap().get_world_transform();
    let p = world.transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_close(p.x, 0.0, 1e-6);
    assert_close(p.y, 1.0, 1e-6);
    assert_close(p.z, 0.0, 1e-6);

    let expected = Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0) * turned.to_matrix();
    let got: [[f32; 4]; 4] = (*world).into();
    let want: [[f32; 4]; 4] = expected.into();
    for (g, w) in got.iter().flatten().zip(want.iter().flatten()) {
        assert_close(*g, *w, 1e-6);
    }
}

#[test]
fn should_turn_children_with_the_model_placement() {
    let mut root = SceneNode::group("Scene");
    root.add_child(
        SceneNode::mesh("Child", vec![0]).with_local_transform(Instance::from(Vector3::new(0.0, 0.0, 1.0))),
    );
    root.set_local_transform(Instance::scaled_and_turned(2.5, Deg(90.0).into()));
    root.update_world_transform_all();

    // a quarter turn about y sends +z to +x
    let world = root.find("Child").unwrap().get_world_transform();
    assert_close(world.w.x, 2.5, 1e-5);
    assert_close(world.w.z, 0.0, 1e-5);
    let expected = Matrix4::from(Quaternion::from_angle_y(Deg(90.0))) * 2.5;
    assert_close(world.x.z, expected.x.z, 1e-5);
    assert_close(world.z.x, expected.z.x, 1e-5);
}

#[test]
fn should_collect_only_drawable_meshes() {
    let mut root = portal_like_tree();
    root.add_child(SceneNode::mesh("Empty", vec![]));
    root.update_world_transform_all();

    let meshes = root.collect_meshes();
    let names: Vec<&str> = meshes.iter().map(|mesh| mesh.name).collect();
    assert_eq!(names, vec!["Plane003", "Cube012", "Cube015", "Circle", "Bench"]);
    assert_close(meshes[1].world.w.y, 1.0, 1e-6);
}

#[test]
fn should_build_a_closed_box() {
    let (vertices, indices) = box_geometry(10.0, 0.5, 10.0);
    assert_eq!(vertices.len(), 24);
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    for vertex in &vertices {
        assert_close(vertex.position[0].abs(), 5.0, 1e-6);
        assert_close(vertex.position[1].abs(), 0.25, 1e-6);
        assert_close(vertex.position[2].abs(), 5.0, 1e-6);
    }
}

#[test]
fn should_resolve_the_default_palette() {
    let palette = Palette::default().resolve().unwrap();
    assert_eq!(palette.clear_color.to_hex(), "#191b1f");
    assert_eq!(palette.portal_color_start.to_hex(), "#383838");
    assert_eq!(palette.portal_color_end.to_hex(), "#b4b4fe");
    assert_eq!(palette.point_light.to_hex(), "#ffffe5");
}

#[test]
fn should_reject_a_malformed_palette() {
    let palette = Palette {
        clear_color: "#19".to_string(),
        ..Palette::default()
    };
    assert!(palette.resolve().is_err());
}

#[test]
fn should_default_to_the_portal_scene_setup() {
    let config = SceneConfig::default();
    assert_eq!(config.fireflies.count, FIREFLY_COUNT);
    assert_eq!(config.max_pixel_ratio, 2.0);
    assert_eq!(config.model.scale, 2.5);
    assert_eq!(config.assets.model, "models/baked/portal.glb");
}
