use common::test_utils::{TRIANGLE_GLTF, assert_close, triangle_buffer};
use portal_scene::{
    data_structures::scene_graph::NodeKind,
    materials::{MaterialBinding, MaterialRole, MaterialRules, assign_materials},
    resources::gltf::{ensure_decodable, parse_document},
};

mod common;

#[test]
fn should_read_triangle_without_indices_or_uvs() {
    let gltf = gltf::Gltf::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
    let data = parse_document(&gltf.document, &[triangle_buffer()]).unwrap();

    assert_eq!(data.meshes.len(), 1);
    let mesh = &data.meshes[0];
    assert_eq!(mesh.name, "PortalMesh");
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.material, None);
    assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    assert!(mesh.vertices.iter().all(|v| v.tex_coords == [0.0, 0.0]));
    assert!(data.base_colors.is_empty());
}

#[test]
fn should_mirror_the_node_tree_under_a_scene_root() {
    let gltf = gltf::Gltf::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
    let data = parse_document(&gltf.document, &[triangle_buffer()]).unwrap();

    assert_eq!(data.root.name, "Scene");
    assert_eq!(data.root.count(), 4);
    let circle = data.root.find("Circle").unwrap();
    assert_eq!(circle.kind, NodeKind::Mesh(vec![0]));
    assert_close(circle.get_world_transform().w.x, 1.0, 1e-6);

    // unnamed nodes are known by their mesh
    assert!(data.root.find("PortalMesh").unwrap().is_mesh());
    assert_eq!(data.root.find("Root").unwrap().kind, NodeKind::Group);
}

#[test]
fn should_bind_parsed_nodes_by_name() {
    let gltf = gltf::Gltf::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
    let mut data = parse_document(&gltf.document, &[triangle_buffer()]).unwrap();

    assert_eq!(assign_materials(&mut data.root, &MaterialRules::default()), 1);
    assert_eq!(
        data.root.find("Circle").unwrap().material,
        MaterialBinding::Shared(MaterialRole::Portal)
    );
    assert_eq!(data.root.find("PortalMesh").unwrap().material, MaterialBinding::Original);
}

#[test]
fn should_refuse_draco_compressed_models() {
    let json = draco_gltf();
    let result = gltf::Gltf::from_slice(json.as_bytes())
        .map_err(anyhow::Error::from)
        .and_then(|gltf| parse_document(&gltf.document, &[triangle_buffer()]));
    assert!(result.is_err());
}

#[test]
fn should_name_the_decoder_path_when_refusing_draco() {
    let json = draco_gltf();
    let err = ensure_decodable(json.as_bytes(), "models/baked/portal.glb", "draco/").unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("portal.glb"), "{}", message);
    assert!(message.contains("KHR_draco_mesh_compression"), "{}", message);
    assert!(message.contains("\"draco/\""), "{}", message);

    ensure_decodable(TRIANGLE_GLTF.as_bytes(), "triangle.gltf", "draco/").unwrap();
}

fn draco_gltf() -> String {
    TRIANGLE_GLTF.replacen(
        "\"asset\"",
        "\"extensionsUsed\": [\"KHR_draco_mesh_compression\"],\n    \"extensionsRequired\": [\"KHR_draco_mesh_compression\"],\n    \"asset\"",
        1,
    )
}

#[test]
fn should_skip_primitives_without_buffer_data() {
    let gltf = gltf::Gltf::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
    let data = parse_document(&gltf.document, &[]).unwrap();
    // the primitive cannot be read, so it is skipped rather than drawn garbled
    assert!(data.meshes.is_empty());
    assert_eq!(data.root.find("Circle").unwrap().kind, NodeKind::Mesh(vec![]));
}
